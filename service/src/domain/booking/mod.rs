//! [`Booking`] definitions.

pub mod flow;

use common::{define_kind, unit, Date, DateTimeOf, Money, TimeOfDay};
use derive_more::{AsRef, Display, Error, From, FromStr, Into};
use time::macros::time;
use uuid::Uuid;

#[cfg(doc)]
use common::DateTime;

#[cfg(doc)]
use crate::domain::Spot;
use crate::domain::{driver, payment, spot};

pub use self::flow::Flow;

/// Booking of a [`Spot`] submitted by a driver.
#[derive(Clone, Debug)]
pub struct Booking {
    /// ID of this [`Booking`].
    pub id: Id,

    /// ID of the booked [`Spot`].
    pub spot_id: spot::Id,

    /// Name of the booked [`Spot`] at the moment of submission.
    pub spot_name: spot::Name,

    /// ID of the driver who submitted this [`Booking`], if known.
    pub driver_id: Option<driver::Id>,

    /// [`Date`] the [`Spot`] is booked for.
    pub date: Date,

    /// [`TimeOfDay`] the booking starts at.
    pub start_time: TimeOfDay,

    /// [`Duration`] of this [`Booking`].
    pub duration: Duration,

    /// [`VehicleType`] to be parked.
    pub vehicle_type: VehicleType,

    /// [`LicensePlate`] of the vehicle to be parked.
    pub license_plate: LicensePlate,

    /// Total price of this [`Booking`].
    pub total: Money,

    /// Name of the card holder who paid for this [`Booking`].
    pub cardholder: payment::Cardholder,

    /// Masked number of the card this [`Booking`] was paid with.
    pub card: payment::MaskedCard,

    /// [`Status`] of this [`Booking`].
    pub status: Status,

    /// [`DateTime`] when this [`Booking`] was submitted.
    pub submitted_at: SubmissionDateTime,
}

impl Booking {
    /// Confirms this [`Booking`] on behalf of the [`Spot`] owner.
    ///
    /// # Errors
    ///
    /// If this [`Booking`] is not [`Status::Pending`].
    pub fn approve(&mut self) -> Result<(), NotPending> {
        self.resolve(Status::Confirmed)
    }

    /// Cancels this [`Booking`] on behalf of the [`Spot`] owner.
    ///
    /// # Errors
    ///
    /// If this [`Booking`] is not [`Status::Pending`].
    pub fn reject(&mut self) -> Result<(), NotPending> {
        self.resolve(Status::Cancelled)
    }

    /// Marks this confirmed [`Booking`] as took place, once the owner sees
    /// the parking is over.
    ///
    /// # Errors
    ///
    /// If this [`Booking`] is not [`Status::Confirmed`].
    pub fn complete(&mut self) -> Result<(), NotConfirmed> {
        if self.status != Status::Confirmed {
            return Err(NotConfirmed(self.status));
        }
        self.status = Status::Completed;
        Ok(())
    }

    /// Moves this [`Booking`] out of [`Status::Pending`] into the provided
    /// [`Status`].
    fn resolve(&mut self, status: Status) -> Result<(), NotPending> {
        if self.status != Status::Pending {
            return Err(NotPending(self.status));
        }
        self.status = status;
        Ok(())
    }
}

/// Error of resolving a [`Booking`] which is not [`Status::Pending`] anymore.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("`Booking` is already {_0}")]
pub struct NotPending(#[error(not(source))] pub Status);

/// Error of completing a [`Booking`] which is not [`Status::Confirmed`].
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("`Booking` is {_0}, not confirmed")]
pub struct NotConfirmed(#[error(not(source))] pub Status);

/// ID of a [`Booking`].
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
    Ord,
    PartialEq,
    PartialOrd,
)]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Details of a [`Booking`] entered by a driver before paying.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Details {
    /// [`Date`] to book the [`Spot`] for.
    ///
    /// [`None`] until picked by the driver.
    pub date: Option<Date>,

    /// [`TimeOfDay`] the booking starts at.
    pub start_time: TimeOfDay,

    /// [`Duration`] of the booking.
    pub duration: Duration,

    /// [`VehicleType`] to be parked.
    pub vehicle_type: VehicleType,

    /// [`LicensePlate`] of the vehicle to be parked.
    pub license_plate: LicensePlate,
}

impl Default for Details {
    fn default() -> Self {
        Self {
            date: None,
            start_time: time!(9:00).into(),
            duration: Duration::default(),
            vehicle_type: VehicleType::default(),
            license_plate: LicensePlate::default(),
        }
    }
}

define_kind! {
    #[doc = "Duration of a [`Booking`] in hours."]
    enum Duration {
        #[doc = "1 hour."]
        OneHour = 1,

        #[doc = "2 hours."]
        TwoHours = 2,

        #[doc = "3 hours."]
        ThreeHours = 3,

        #[doc = "4 hours."]
        FourHours = 4,

        #[doc = "5 hours."]
        FiveHours = 5,

        #[doc = "6 hours."]
        SixHours = 6,

        #[doc = "8 hours."]
        EightHours = 8,

        #[doc = "12 hours."]
        TwelveHours = 12,

        #[doc = "24 hours."]
        TwentyFourHours = 24,
    }
}

impl Duration {
    /// Returns the number of hours in this [`Duration`].
    #[must_use]
    pub const fn hours(self) -> u8 {
        self.u8()
    }
}

impl Default for Duration {
    fn default() -> Self {
        Self::OneHour
    }
}

define_kind! {
    #[doc = "Type of a vehicle to be parked."]
    enum VehicleType {
        #[doc = "Sedan."]
        Sedan = 1,

        #[doc = "Sport utility vehicle."]
        Suv = 2,

        #[doc = "Truck."]
        Truck = 3,

        #[doc = "Compact car."]
        Compact = 4,

        #[doc = "Motorcycle."]
        Motorcycle = 5,
    }
}

impl Default for VehicleType {
    fn default() -> Self {
        Self::Sedan
    }
}

/// License plate of a vehicle.
///
/// Free text, and may be empty: drivers are allowed to skip it.
#[derive(AsRef, Clone, Debug, Default, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct LicensePlate(String);

impl LicensePlate {
    /// Creates a new [`LicensePlate`] out of the provided `plate`, trimming
    /// surrounding whitespace.
    ///
    /// [`None`] is returned if the `plate` is unreasonably long.
    #[must_use]
    pub fn new(plate: impl AsRef<str>) -> Option<Self> {
        let plate = plate.as_ref().trim();
        (plate.len() <= 32).then(|| Self(plate.to_owned()))
    }
}

define_kind! {
    #[doc = "Status of a [`Booking`]."]
    enum Status {
        #[doc = "Awaiting an owner's decision."]
        Pending = 1,

        #[doc = "Confirmed by the owner."]
        Confirmed = 2,

        #[doc = "Rejected by the owner."]
        Cancelled = 3,

        #[doc = "Already took place, as marked by the owner."]
        Completed = 4,
    }
}

/// [`DateTime`] when a [`Booking`] was submitted.
pub type SubmissionDateTime = DateTimeOf<(Booking, unit::Submission)>;

/// Combined booking and payment record emitted once a [`Flow`] is paid.
#[derive(Debug)]
pub struct Submission {
    /// Submitted [`Booking`].
    pub booking: Booking,

    /// [`payment::Card`] the [`Booking`] was paid with.
    pub card: payment::Card,
}

#[cfg(test)]
pub(crate) mod fixture {
    //! [`Booking`]s used across tests.

    use std::str::FromStr as _;

    use common::{Date, DateTime, Money, TimeOfDay};
    use rust_decimal::Decimal;

    use crate::domain::{payment, spot};

    use super::{Booking, Duration, Id, LicensePlate, Status, VehicleType};

    /// Creates a [`Booking`] of the provided `spot_id` in the provided
    /// [`Status`].
    pub(crate) fn booking(
        spot_id: &str,
        plate: &str,
        status: Status,
    ) -> Booking {
        Booking {
            id: Id::new(),
            spot_id: spot::Id::new(spot_id).unwrap(),
            spot_name: spot::Name::new(format!("Spot {spot_id}")).unwrap(),
            driver_id: None,
            date: Date::from_str("2026-10-19").unwrap(),
            start_time: TimeOfDay::from_hm(9, 0).unwrap(),
            duration: Duration::TwoHours,
            vehicle_type: VehicleType::Sedan,
            license_plate: LicensePlate::new(plate).unwrap(),
            total: Money::usd(Decimal::from(30)),
            cardholder: payment::Cardholder::new("Jane Doe").unwrap(),
            card: payment::MaskedCard::new("4111111111111111").unwrap(),
            status,
            submitted_at: DateTime::now().coerce(),
        }
    }
}
