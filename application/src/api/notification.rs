//! [`Notification`]-related definitions.

use common::{Date, DateTime};
use derive_more::{Display, From, Into};
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, read};
use uuid::Uuid;

use crate::{api, Context};

/// Notice about a `Booking` changing its status.
#[derive(Clone, Debug, From)]
pub struct Notification(domain::Notification);

/// Notice about a `Booking` changing its status.
#[graphql_object(context = Context)]
impl Notification {
    /// Unique identifier of this `Notification`.
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Kind of this `Notification`.
    pub fn kind(&self) -> Kind {
        self.0.kind.into()
    }

    /// ID of the `Booking` this `Notification` is about.
    pub fn booking_id(&self) -> api::booking::Id {
        self.0.booking_id.into()
    }

    /// Name of the booked `Spot`.
    pub fn spot_name(&self) -> &str {
        self.0.spot_name.as_ref()
    }

    /// `Date` the `Spot` is booked for.
    pub fn date(&self) -> Date {
        self.0.date
    }

    /// Short human-readable title.
    pub fn title(&self) -> &str {
        self.0.title()
    }

    /// Human-readable message.
    pub fn message(&self) -> String {
        self.0.message()
    }

    /// `DateTime` when this `Notification` was created.
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }

    /// Indicator whether this `Notification` was read.
    pub fn read(&self) -> bool {
        self.0.is_read()
    }
}

/// Unique identifier of a `Notification`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::notification::Id)]
#[into(domain::notification::Id)]
#[graphql(name = "NotificationId", transparent)]
pub struct Id(Uuid);

/// Kind of a `Notification`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "NotificationKind")]
pub enum Kind {
    /// A new `Booking` awaits a decision.
    Requested,

    /// A `Booking` was approved.
    Confirmed,

    /// A `Booking` was rejected.
    Cancelled,

    /// A `Booking` took place.
    Completed,
}

impl From<domain::notification::Kind> for Kind {
    fn from(kind: domain::notification::Kind) -> Self {
        use domain::notification::Kind as K;
        match kind {
            K::Requested => Self::Requested,
            K::Confirmed => Self::Confirmed,
            K::Cancelled => Self::Cancelled,
            K::Completed => Self::Completed,
        }
    }
}

/// `Notification`s of the owner's inbox.
#[derive(Clone, Debug, From)]
pub struct Inbox(read::notification::Inbox);

/// `Notification`s of the owner's inbox.
#[graphql_object(name = "NotificationInbox", context = Context)]
impl Inbox {
    /// Listed `Notification`s, newest first.
    pub fn notifications(&self) -> Vec<Notification> {
        self.0.notifications.iter().cloned().map(Into::into).collect()
    }

    /// Number of unread `Notification`s in the whole inbox.
    pub fn unread_count(&self) -> i32 {
        i32::try_from(self.0.unread).unwrap_or(i32::MAX)
    }
}
