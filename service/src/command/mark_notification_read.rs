//! [`Command`] for marking a [`Notification`] as read.

use common::operations::{By, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{notification, Notification},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for marking a single [`Notification`] as read.
///
/// Marking an already read [`Notification`] changes nothing.
#[derive(Clone, Copy, Debug)]
pub struct MarkNotificationRead {
    /// ID of the [`Notification`] to mark.
    pub notification_id: notification::Id,
}

impl<Db, Pay> Command<MarkNotificationRead> for Service<Db, Pay>
where
    Db: Database<
            Select<By<Option<Notification>, notification::Id>>,
            Ok = Option<Notification>,
            Err = Traced<database::Error>,
        > + Database<Update<Notification>, Err = Traced<database::Error>>,
{
    type Ok = Notification;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: MarkNotificationRead,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let MarkNotificationRead { notification_id } = cmd;

        let mut notification = self
            .database()
            .execute(Select(By::new(notification_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::NotificationNotExists(notification_id))
            .map_err(tracerr::wrap!())?;

        if notification.mark_read() {
            self.database()
                .execute(Update(notification.clone()))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }

        Ok(notification)
    }
}

/// Error of [`MarkNotificationRead`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Notification`] with the provided ID does not exist.
    #[display("`Notification(id: {_0})` does not exist")]
    NotificationNotExists(#[error(not(source))] notification::Id),
}
