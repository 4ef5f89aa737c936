//! [`Booking`]-related definitions.

use common::{Date, DateTime, Money, TimeOfDay};
use derive_more::{Display, From, Into};
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::domain;
use uuid::Uuid;

use crate::{api, Context};

/// A submitted booking of a `Spot`.
#[derive(Clone, Debug, From)]
pub struct Booking(domain::Booking);

/// A submitted booking of a `Spot`.
#[graphql_object(context = Context)]
impl Booking {
    /// Unique identifier of this `Booking`.
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// ID of the booked `Spot`.
    pub fn spot_id(&self) -> api::spot::Id {
        self.0.spot_id.clone().into()
    }

    /// Name of the booked `Spot` at the moment of booking.
    pub fn spot_name(&self) -> &str {
        self.0.spot_name.as_ref()
    }

    /// `Date` the `Spot` is booked for.
    pub fn date(&self) -> Date {
        self.0.date
    }

    /// `TimeOfDay` this `Booking` starts at.
    pub fn start_time(&self) -> TimeOfDay {
        self.0.start_time
    }

    /// Duration of this `Booking`.
    pub fn duration(&self) -> Duration {
        self.0.duration.into()
    }

    /// Type of the vehicle to be parked.
    pub fn vehicle_type(&self) -> VehicleType {
        self.0.vehicle_type.into()
    }

    /// License plate of the vehicle to be parked, if provided.
    pub fn license_plate(&self) -> &str {
        self.0.license_plate.as_ref()
    }

    /// Total price paid for this `Booking`.
    pub fn total(&self) -> Money {
        self.0.total
    }

    /// Name of the card holder this `Booking` was paid by.
    pub fn cardholder(&self) -> &str {
        self.0.cardholder.as_ref()
    }

    /// Masked number of the card this `Booking` was paid with.
    pub fn card(&self) -> String {
        self.0.card.to_string()
    }

    /// Status of this `Booking`.
    pub fn status(&self) -> Status {
        self.0.status.into()
    }

    /// `DateTime` when this `Booking` was submitted.
    pub fn submitted_at(&self) -> DateTime {
        self.0.submitted_at.coerce()
    }
}

/// Unique identifier of a `Booking`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::booking::Id)]
#[into(domain::booking::Id)]
#[graphql(name = "BookingId", transparent)]
pub struct Id(Uuid);

/// Duration of a `Booking`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "BookingDuration")]
pub enum Duration {
    /// 1 hour.
    OneHour,

    /// 2 hours.
    TwoHours,

    /// 3 hours.
    ThreeHours,

    /// 4 hours.
    FourHours,

    /// 5 hours.
    FiveHours,

    /// 6 hours.
    SixHours,

    /// 8 hours.
    EightHours,

    /// 12 hours.
    TwelveHours,

    /// 24 hours.
    TwentyFourHours,
}

impl From<domain::booking::Duration> for Duration {
    fn from(duration: domain::booking::Duration) -> Self {
        use domain::booking::Duration as D;
        match duration {
            D::OneHour => Self::OneHour,
            D::TwoHours => Self::TwoHours,
            D::ThreeHours => Self::ThreeHours,
            D::FourHours => Self::FourHours,
            D::FiveHours => Self::FiveHours,
            D::SixHours => Self::SixHours,
            D::EightHours => Self::EightHours,
            D::TwelveHours => Self::TwelveHours,
            D::TwentyFourHours => Self::TwentyFourHours,
        }
    }
}

impl From<Duration> for domain::booking::Duration {
    fn from(duration: Duration) -> Self {
        use Duration as D;
        match duration {
            D::OneHour => Self::OneHour,
            D::TwoHours => Self::TwoHours,
            D::ThreeHours => Self::ThreeHours,
            D::FourHours => Self::FourHours,
            D::FiveHours => Self::FiveHours,
            D::SixHours => Self::SixHours,
            D::EightHours => Self::EightHours,
            D::TwelveHours => Self::TwelveHours,
            D::TwentyFourHours => Self::TwentyFourHours,
        }
    }
}

/// Type of a vehicle to be parked.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
pub enum VehicleType {
    /// Sedan.
    Sedan,

    /// Sport utility vehicle.
    Suv,

    /// Truck.
    Truck,

    /// Compact car.
    Compact,

    /// Motorcycle.
    Motorcycle,
}

impl From<domain::booking::VehicleType> for VehicleType {
    fn from(ty: domain::booking::VehicleType) -> Self {
        use domain::booking::VehicleType as V;
        match ty {
            V::Sedan => Self::Sedan,
            V::Suv => Self::Suv,
            V::Truck => Self::Truck,
            V::Compact => Self::Compact,
            V::Motorcycle => Self::Motorcycle,
        }
    }
}

impl From<VehicleType> for domain::booking::VehicleType {
    fn from(ty: VehicleType) -> Self {
        use VehicleType as V;
        match ty {
            V::Sedan => Self::Sedan,
            V::Suv => Self::Suv,
            V::Truck => Self::Truck,
            V::Compact => Self::Compact,
            V::Motorcycle => Self::Motorcycle,
        }
    }
}

/// Status of a `Booking`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "BookingStatus")]
pub enum Status {
    /// Awaiting the `Spot` owner's decision.
    Pending,

    /// Confirmed by the `Spot` owner.
    Confirmed,

    /// Rejected by the `Spot` owner.
    Cancelled,

    /// Already took place.
    Completed,
}

impl From<domain::booking::Status> for Status {
    fn from(status: domain::booking::Status) -> Self {
        use domain::booking::Status as S;
        match status {
            S::Pending => Self::Pending,
            S::Confirmed => Self::Confirmed,
            S::Cancelled => Self::Cancelled,
            S::Completed => Self::Completed,
        }
    }
}

impl From<Status> for domain::booking::Status {
    fn from(status: Status) -> Self {
        use Status as S;
        match status {
            S::Pending => Self::Pending,
            S::Confirmed => Self::Confirmed,
            S::Cancelled => Self::Cancelled,
            S::Completed => Self::Completed,
        }
    }
}
