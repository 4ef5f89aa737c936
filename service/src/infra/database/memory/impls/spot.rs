//! [`Spot`]-related [`Database`] implementations.

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::{spot, Spot},
    infra::{
        database::{self, InMemory},
        Database,
    },
    read,
};

impl Database<Select<By<Vec<Spot>, read::spot::Catalog>>> for InMemory {
    type Ok = Vec<Spot>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Spot>, read::spot::Catalog>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.0.catalog.clone())
    }
}

impl Database<Select<By<Option<Spot>, spot::Id>>> for InMemory {
    type Ok = Option<Spot>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Spot>, spot::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.0.catalog.iter().find(|s| s.id == id).cloned())
    }
}
