//! [`Booking`]-related [`Database`] implementations.

use std::sync::Arc;

use common::operations::{By, Insert, Lock, Select};
use tokio::sync::Mutex;
use tracerr::Traced;

use crate::{
    domain::{
        booking::{self, Submission},
        Booking,
    },
    infra::{
        database::{self, InMemory, Locked},
        Database,
    },
    read,
};

use super::super::{read as read_table, write};

impl InMemory {
    /// Returns the shared cell of the [`Booking`] with the provided ID, if
    /// any.
    fn booking(
        &self,
        id: booking::Id,
    ) -> Result<Option<Arc<Mutex<Booking>>>, Traced<database::Error>> {
        Ok(read_table(&self.0.bookings)?
            .iter()
            .find_map(|(i, cell)| (*i == id).then(|| Arc::clone(cell))))
    }
}

impl Database<Insert<Submission>> for InMemory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(submission): Insert<Submission>,
    ) -> Result<Self::Ok, Self::Err> {
        // Only the `Booking` is kept, the card details are dropped here.
        let Submission { booking, card: _ } = submission;
        write(&self.0.bookings)?
            .push((booking.id, Arc::new(Mutex::new(booking))));
        Ok(())
    }
}

impl Database<Select<By<Option<Booking>, booking::Id>>> for InMemory {
    type Ok = Option<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Booking>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let Some(cell) = self.booking(by.into_inner())? else {
            return Ok(None);
        };
        let booking = cell.lock().await.clone();
        Ok(Some(booking))
    }
}

impl Database<Select<By<Vec<Booking>, read::booking::list::Filter>>>
    for InMemory
{
    type Ok = Vec<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Booking>, read::booking::list::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let filter = by.into_inner();
        let cells = read_table(&self.0.bookings)?.clone();

        let mut bookings = Vec::new();
        // Newest first.
        for (_, cell) in cells.iter().rev() {
            let booking = cell.lock().await;
            if filter.matches(&booking) {
                bookings.push(booking.clone());
            }
        }
        Ok(bookings)
    }
}

impl Database<Lock<By<Option<Locked<Booking>>, booking::Id>>> for InMemory {
    type Ok = Option<Locked<Booking>>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Option<Locked<Booking>>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let Some(cell) = self.booking(by.into_inner())? else {
            return Ok(None);
        };
        Ok(Some(cell.lock_owned().await))
    }
}
