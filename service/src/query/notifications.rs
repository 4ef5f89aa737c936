//! [`Query`] collection related to the [`Notification`] inbox.

use common::operations::By;

#[cfg(doc)]
use crate::{domain::Notification, Query};
use crate::read::{self, notification::list};

use super::DatabaseQuery;

/// Queries the [`Notification`]s matching a [`list::Filter`], newest first,
/// along with the unread count.
pub type Inbox = DatabaseQuery<By<read::notification::Inbox, list::Filter>>;
