//! [`Notification`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{notification, Notification},
    infra::{
        database::{self, InMemory},
        Database,
    },
    read::{self, notification::list},
};

use super::super::{read as read_table, write};

impl Database<Insert<Notification>> for InMemory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(notification): Insert<Notification>,
    ) -> Result<Self::Ok, Self::Err> {
        write(&self.0.notifications)?.push(notification);
        Ok(())
    }
}

impl Database<Select<By<Option<Notification>, notification::Id>>>
    for InMemory
{
    type Ok = Option<Notification>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Notification>, notification::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(read_table(&self.0.notifications)?
            .iter()
            .find(|n| n.id == id)
            .cloned())
    }
}

impl Database<Select<By<read::notification::Inbox, list::Filter>>>
    for InMemory
{
    type Ok = read::notification::Inbox;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::notification::Inbox, list::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let filter = by.into_inner();
        let table = read_table(&self.0.notifications)?;

        Ok(read::notification::Inbox {
            // Newest first.
            notifications: table
                .iter()
                .rev()
                .filter(|n| filter.matches(n))
                .cloned()
                .collect(),
            unread: table.iter().filter(|n| !n.is_read()).count(),
        })
    }
}

impl Database<Update<Notification>> for InMemory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(notification): Update<Notification>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut table = write(&self.0.notifications)?;
        if let Some(stored) =
            table.iter_mut().find(|n| n.id == notification.id)
        {
            *stored = notification;
        }
        Ok(())
    }
}
