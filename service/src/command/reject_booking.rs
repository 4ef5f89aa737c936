//! [`Command`] for rejecting a pending [`Booking`].

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

/// [`Command`] for rejecting a pending [`Booking`] on behalf of the spot
/// owner.
#[derive(Clone, Copy, Debug)]
pub struct RejectBooking {
    /// ID of the [`Booking`] to reject.
    pub booking_id: booking::Id,
}

impl<Db, Pay> Command<RejectBooking> for Service<Db, Pay>
where
    Db: Database<
            Lock<By<Option<Locked<Booking>>, booking::Id>>,
            Ok = Option<Locked<Booking>>,
            Err = Traced<database::Error>,
        > + Database<Insert<Notification>, Err = Traced<database::Error>>,
{
    type Ok = Booking;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: RejectBooking) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RejectBooking { booking_id } = cmd;

        let mut booking = self
            .database()
            .execute(Lock(By::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::BookingNotExists(booking_id))
            .map_err(tracerr::wrap!())?;
        booking.reject().map_err(tracerr::from_and_wrap!(=> E))?;
        self.database()
            .execute(Insert(Notification::about(
                notification::Kind::Cancelled,
                &booking,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::info!(booking.id = %booking_id, "booking rejected");

        Ok(booking.clone())
    }
}

/// Error of [`RejectBooking`] [`Command`] execution.
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

#[cfg(test)]
mod spec {
    use crate::{
        command::ApproveBooking,
        domain::{
            booking::{self, Status},
            notification::Kind,
        },
        query::notifications::Inbox,
        read::notification::list::Filter,
        test::{service, submitted_booking, Scripted},
        Command as _,
    };

    use super::{ExecutionError, RejectBooking};

    #[tokio::test]
    async fn rejects_pending_booking() {
        let svc = service(Scripted::default());
        let booking_id = submitted_booking(&svc).await;

        let booking = svc.execute(RejectBooking { booking_id }).await.unwrap();

        assert_eq!(booking.id, booking_id);
        assert_eq!(booking.status, Status::Cancelled);
    }

    #[tokio::test]
    async fn notifies_about_cancellation() {
        let svc = service(Scripted::default());
        let booking_id = submitted_booking(&svc).await;

        _ = svc.execute(RejectBooking { booking_id }).await.unwrap();

        let inbox = svc.execute(Inbox::by(Filter::default())).await.unwrap();
        let latest = &inbox.notifications[0];
        assert_eq!(latest.kind, Kind::Cancelled);
        assert_eq!(latest.booking_id, booking_id);
        assert_eq!(inbox.unread, 2);
    }

    #[tokio::test]
    async fn fails_for_resolved_booking() {
        let svc = service(Scripted::default());
        let booking_id = submitted_booking(&svc).await;
        _ = svc.execute(ApproveBooking { booking_id }).await.unwrap();

        let err = svc.execute(RejectBooking { booking_id }).await.unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::NotPending(booking::NotPending(Status::Confirmed)),
        ));
    }

    #[tokio::test]
    async fn fails_for_unknown_booking() {
        let svc = service(Scripted::default());

        let err = svc
            .execute(RejectBooking {
                booking_id: booking::Id::new(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::BookingNotExists(_)));
    }
}
