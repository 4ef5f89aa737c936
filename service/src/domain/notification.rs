//! [`Notification`] definitions.

use common::{define_kind, unit, Date, DateTimeOf};
use derive_more::{Display, From, FromStr, Into};
use uuid::Uuid;

use crate::domain::{booking, spot, Booking};

/// Notice about a [`Booking`] changing its [`booking::Status`], shown in the
/// owner's inbox until read.
#[derive(Clone, Debug)]
pub struct Notification {
    /// ID of this [`Notification`].
    pub id: Id,

    /// [`Kind`] of this [`Notification`].
    pub kind: Kind,

    /// ID of the [`Booking`] this [`Notification`] is about.
    pub booking_id: booking::Id,

    /// Name of the booked [`Spot`].
    ///
    /// [`Spot`]: crate::domain::Spot
    pub spot_name: spot::Name,

    /// [`Date`] the [`Spot`] is booked for.
    ///
    /// [`Spot`]: crate::domain::Spot
    pub date: Date,

    /// [`CreationDateTime`] of this [`Notification`].
    pub created_at: CreationDateTime,

    /// Indicator whether this [`Notification`] was read.
    read: bool,
}

impl Notification {
    /// Creates a new unread [`Notification`] of the provided [`Kind`] about
    /// the provided [`Booking`].
    #[must_use]
    pub fn about(kind: Kind, booking: &Booking) -> Self {
        Self {
            id: Id::new(),
            kind,
            booking_id: booking.id,
            spot_name: booking.spot_name.clone(),
            date: booking.date,
            created_at: CreationDateTime::now(),
            read: false,
        }
    }

    /// Indicates whether this [`Notification`] was read.
    #[must_use]
    pub fn is_read(&self) -> bool {
        self.read
    }

    /// Marks this [`Notification`] as read, returning `false` if it was read
    /// already.
    pub fn mark_read(&mut self) -> bool {
        !std::mem::replace(&mut self.read, true)
    }

    /// Returns the human-readable title of this [`Notification`].
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self.kind {
            Kind::Requested => "New Booking Request",
            Kind::Confirmed => "Booking Confirmed",
            Kind::Cancelled => "Booking Cancelled",
            Kind::Completed => "Booking Completed",
        }
    }

    /// Returns the human-readable message of this [`Notification`].
    #[must_use]
    pub fn message(&self) -> String {
        let Self {
            spot_name, date, ..
        } = self;
        match self.kind {
            Kind::Requested => {
                format!("{spot_name} is requested for {date}.")
            }
            Kind::Confirmed => {
                format!("Booking of {spot_name} for {date} is confirmed.")
            }
            Kind::Cancelled => {
                format!("Booking of {spot_name} for {date} is cancelled.")
            }
            Kind::Completed => {
                format!("Booking of {spot_name} for {date} took place.")
            }
        }
    }
}

/// ID of a [`Notification`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
)]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

define_kind! {
    #[doc = "Kind of a [`Notification`]."]
    enum Kind {
        #[doc = "[`Booking`] is submitted and awaits a decision."]
        Requested = 1,

        #[doc = "[`Booking`] is approved."]
        Confirmed = 2,

        #[doc = "[`Booking`] is rejected."]
        Cancelled = 3,

        #[doc = "[`Booking`] took place."]
        Completed = 4,
    }
}

/// [`DateTimeOf`] a [`Notification`] creation.
pub type CreationDateTime = DateTimeOf<(Notification, unit::Creation)>;

#[cfg(test)]
mod spec {
    use crate::domain::booking::{fixture::booking, Status};

    use super::{Kind, Notification};

    #[test]
    fn describes_booking() {
        let booking = booking("spot-1", "", Status::Pending);

        let notification = Notification::about(Kind::Requested, &booking);

        assert_eq!(notification.booking_id, booking.id);
        assert_eq!(notification.title(), "New Booking Request");
        assert_eq!(
            notification.message(),
            "Spot spot-1 is requested for 2026-10-19.",
        );
        assert!(!notification.is_read());
    }

    #[test]
    fn marks_read_once() {
        let booking = booking("spot-1", "", Status::Confirmed);
        let mut notification = Notification::about(Kind::Confirmed, &booking);

        assert!(notification.mark_read());
        assert!(notification.is_read());
        assert!(!notification.mark_read());
    }
}
