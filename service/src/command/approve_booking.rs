//! [`Command`] for approving a pending [`Booking`].

use common::operations::{By, Insert, Lock};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        booking::{self, NotPending},
        notification, Booking, Notification,
    },
    infra::{database, database::Locked, Database},
    Service,
};

use super::Command;

/// [`Command`] for approving a pending [`Booking`] on behalf of the spot
/// owner.
#[derive(Clone, Copy, Debug)]
pub struct ApproveBooking {
    /// ID of the [`Booking`] to approve.
    pub booking_id: booking::Id,
}

impl<Db, Pay> Command<ApproveBooking> for Service<Db, Pay>
where
    Db: Database<
            Lock<By<Option<Locked<Booking>>, booking::Id>>,
            Ok = Option<Locked<Booking>>,
            Err = Traced<database::Error>,
        > + Database<Insert<Notification>, Err = Traced<database::Error>>,
{
    type Ok = Booking;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ApproveBooking,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ApproveBooking { booking_id } = cmd;

        let mut booking = self
            .database()
            .execute(Lock(By::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::BookingNotExists(booking_id))
            .map_err(tracerr::wrap!())?;
        booking.approve().map_err(tracerr::from_and_wrap!(=> E))?;
        self.database()
            .execute(Insert(Notification::about(
                notification::Kind::Confirmed,
                &booking,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::info!(booking.id = %booking_id, "booking approved");

        Ok(booking.clone())
    }
}

/// Error of [`ApproveBooking`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Booking`] with the provided ID does not exist.
    #[display("`Booking(id: {_0})` does not exist")]
    BookingNotExists(#[error(not(source))] booking::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Booking`] is resolved already.
    #[display("{_0}")]
    #[from]
    NotPending(NotPending),
}
