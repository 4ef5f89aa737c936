//! [`Query`] for the owner earnings [`Summary`].

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::Booking,
    infra::{database, Database},
    read::{booking::list, earnings},
    Service,
};

use super::Query;

/// [`Query`] summing up the whole [`Booking`] ledger into an
/// [`earnings::Summary`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Summary;

impl<Db, Pay> Query<Summary> for Service<Db, Pay>
where
    Db: Database<
        Select<By<Vec<Booking>, list::Filter>>,
        Ok = Vec<Booking>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = earnings::Summary;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Summary) -> Result<Self::Ok, Self::Err> {
        let bookings = self
            .database()
            .execute(Select(By::new(list::Filter::default())))
            .await
            .map_err(tracerr::wrap!())?;
        Ok(earnings::Summary::of(&bookings))
    }
}
