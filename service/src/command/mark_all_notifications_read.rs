//! [`Command`] for marking every [`Notification`] as read.

use common::operations::{By, Select, Update};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::Notification,
    infra::{database, Database},
    read::{self, notification::list},
    Service,
};

use super::Command;

/// [`Command`] for marking every unread [`Notification`] as read, returning
/// how many of them were marked.
#[derive(Clone, Copy, Debug, Default)]
pub struct MarkAllNotificationsRead;

impl<Db, Pay> Command<MarkAllNotificationsRead> for Service<Db, Pay>
where
    Db: Database<
            Select<By<read::notification::Inbox, list::Filter>>,
            Ok = read::notification::Inbox,
            Err = Traced<database::Error>,
        > + Database<Update<Notification>, Err = Traced<database::Error>>,
{
    type Ok = usize;
    type Err = ExecutionError;

    async fn execute(
        &self,
        _: MarkAllNotificationsRead,
    ) -> Result<Self::Ok, Self::Err> {
        let unread = self
            .database()
            .execute(Select(By::new(list::Filter { unread_only: true })))
            .await
            .map_err(tracerr::wrap!())?
            .notifications;

        let mut marked = 0;
        for mut notification in unread {
            if notification.mark_read() {
                self.database()
                    .execute(Update(notification))
                    .await
                    .map_err(tracerr::wrap!())?;
                marked += 1;
            }
        }

        log::debug!(count = marked, "notifications marked as read");

        Ok(marked)
    }
}

/// Error of [`MarkAllNotificationsRead`] [`Command`] execution.
pub type ExecutionError = Traced<database::Error>;

#[cfg(test)]
mod spec {
    use crate::{
        command::ApproveBooking,
        query::notifications::Inbox,
        read::notification::list::Filter,
        test::{service, submitted_booking, Scripted},
        Command as _,
    };

    use super::MarkAllNotificationsRead;

    #[tokio::test]
    async fn marks_every_unread_notification() {
        let svc = service(Scripted::default());
        let booking_id = submitted_booking(&svc).await;
        _ = svc.execute(ApproveBooking { booking_id }).await.unwrap();
        _ = submitted_booking(&svc).await;

        let marked = svc.execute(MarkAllNotificationsRead).await.unwrap();
        assert_eq!(marked, 3);

        let inbox = svc.execute(Inbox::by(Filter::default())).await.unwrap();
        assert_eq!(inbox.unread, 0);
        assert_eq!(inbox.notifications.len(), 3);
        assert_eq!(svc.execute(MarkAllNotificationsRead).await.unwrap(), 0);
    }
}
