//! [`Query`] collection related to multiple [`Spot`]s.

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::{
        filter::{Criteria, Visible},
        Spot,
    },
    infra::{database, Database},
    read, Service,
};

use super::Query;

/// Queries the [`Spot`] catalog narrowed down by the provided [`Criteria`].
#[derive(Clone, Debug, Default)]
pub struct List(pub Criteria);

impl<Db, Pay> Query<List> for Service<Db, Pay>
where
    Db: Database<
        Select<By<Vec<Spot>, read::spot::Catalog>>,
        Ok = Vec<Spot>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Visible;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        List(criteria): List,
    ) -> Result<Self::Ok, Self::Err> {
        let catalog = self
            .database()
            .execute(Select(By::new(read::spot::Catalog)))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(criteria.apply(catalog))
    }
}
