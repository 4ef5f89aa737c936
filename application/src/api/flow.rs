//! [`BookingFlow`]-related definitions.

use common::{Date, Money, TimeOfDay};
use derive_more::{Debug, Display, From, Into};
use juniper::{graphql_object, GraphQLEnum, GraphQLInputObject, GraphQLScalar};
use secrecy::SecretBox;
use service::domain::{self, booking::flow, payment};
use uuid::Uuid;

use crate::{api, define_error, AsError, Context, Error};

/// An ongoing booking of a `Spot` by a driver.
#[derive(Clone, Debug, From)]
pub struct BookingFlow(domain::booking::Flow);

/// An ongoing booking of a `Spot` by a driver.
///
/// Goes through `DETAILS` and `PAYMENT` stages and ends up `SUBMITTED`.
#[graphql_object(context = Context)]
impl BookingFlow {
    /// Unique identifier of this `BookingFlow`.
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// ID of the `Spot` being booked.
    pub fn spot_id(&self) -> api::spot::Id {
        self.0.spot_id.clone().into()
    }

    /// Current stage of this `BookingFlow`.
    pub fn stage(&self) -> Stage {
        self.0.stage().kind().into()
    }

    /// Booking details entered so far.
    ///
    /// Kept when returning from the `PAYMENT` stage, and dropped once the
    /// `Booking` is submitted.
    pub fn details(&self) -> Option<Details> {
        self.0.details().cloned().map(Into::into)
    }

    /// Total price to be paid, once the details are submitted.
    pub fn total(&self) -> Option<Money> {
        self.0.payment_terms().map(|(_, total)| total)
    }

    /// Indicator whether a payment is being processed right now.
    pub fn processing(&self) -> bool {
        self.0.is_processing()
    }

    /// Reason the last payment was declined for, if any.
    pub fn decline_reason(&self) -> Option<String> {
        match self.0.stage() {
            flow::Stage::Payment { declined, .. } => {
                declined.as_ref().map(ToString::to_string)
            }
            flow::Stage::Details | flow::Stage::Submitted { .. } => None,
        }
    }

    /// ID of the submitted `Booking`, once this `BookingFlow` is finished.
    pub fn booking_id(&self) -> Option<api::booking::Id> {
        match self.0.stage() {
            flow::Stage::Submitted { booking_id } => {
                Some((*booking_id).into())
            }
            flow::Stage::Details | flow::Stage::Payment { .. } => None,
        }
    }
}

/// Unique identifier of a `BookingFlow`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(flow::Id)]
#[into(flow::Id)]
#[graphql(name = "BookingFlowId", transparent)]
pub struct Id(Uuid);

/// Stage of a `BookingFlow`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "BookingFlowStage")]
pub enum Stage {
    /// Driver enters booking details.
    Details,

    /// Driver enters payment details.
    Payment,

    /// `Booking` is submitted.
    Submitted,
}

impl From<flow::StageKind> for Stage {
    fn from(kind: flow::StageKind) -> Self {
        use flow::StageKind as K;
        match kind {
            K::Details => Self::Details,
            K::Payment => Self::Payment,
            K::Submitted => Self::Submitted,
        }
    }
}

/// Booking details entered by a driver.
#[derive(Clone, Debug, From)]
pub struct Details(domain::booking::Details);

/// Booking details entered by a driver.
#[graphql_object(name = "BookingDetails", context = Context)]
impl Details {
    /// `Date` to book the `Spot` for, if picked.
    pub fn date(&self) -> Option<Date> {
        self.0.date
    }

    /// `TimeOfDay` the booking starts at.
    pub fn start_time(&self) -> TimeOfDay {
        self.0.start_time
    }

    /// Duration of the booking.
    pub fn duration(&self) -> api::booking::Duration {
        self.0.duration.into()
    }

    /// Type of the vehicle to be parked.
    pub fn vehicle_type(&self) -> api::booking::VehicleType {
        self.0.vehicle_type.into()
    }

    /// License plate of the vehicle to be parked.
    pub fn license_plate(&self) -> &str {
        self.0.license_plate.as_ref()
    }
}

/// Booking details to be submitted.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "BookingDetailsInput")]
pub struct DetailsInput {
    /// `Date` to book the `Spot` for. Must not be in the past.
    pub date: Option<Date>,

    /// `TimeOfDay` the booking starts at.
    pub start_time: TimeOfDay,

    /// Duration of the booking.
    pub duration: api::booking::Duration,

    /// Type of the vehicle to be parked.
    pub vehicle_type: api::booking::VehicleType,

    /// License plate of the vehicle to be parked. May be empty.
    #[graphql(default)]
    pub license_plate: String,
}

impl TryFrom<DetailsInput> for domain::booking::Details {
    type Error = Error;

    fn try_from(input: DetailsInput) -> Result<Self, Self::Error> {
        let DetailsInput {
            date,
            start_time,
            duration,
            vehicle_type,
            license_plate,
        } = input;

        Ok(Self {
            date,
            start_time,
            duration: duration.into(),
            vehicle_type: vehicle_type.into(),
            license_plate: domain::booking::LicensePlate::new(license_plate)
                .ok_or(Error::from(FlowError::InvalidLicensePlate))?,
        })
    }
}

/// Payment details entered by a driver.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "PaymentInput")]
pub struct PaymentInput {
    /// Number of the card to pay with, at least 16 digits.
    #[debug(skip)]
    pub card_number: String,

    /// Name of the card holder.
    pub cardholder: String,

    /// Card expiry in `MM/YY` format.
    pub expiry: String,

    /// Security code of the card, at least 3 digits.
    #[debug(skip)]
    pub cvv: String,
}

impl From<PaymentInput> for payment::Draft {
    fn from(input: PaymentInput) -> Self {
        let PaymentInput {
            card_number,
            cardholder,
            expiry,
            cvv,
        } = input;

        Self {
            card_number: SecretBox::init_with(move || card_number.into()),
            cardholder,
            expiry,
            cvv: SecretBox::init_with(move || cvv.into()),
        }
    }
}

impl AsError for flow::TransitionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "WRONG_FLOW_STAGE"]
                #[status = CONFLICT]
                #[message = "`BookingFlow` is not at the required stage"]
                WrongStage,

                #[code = "DATE_REQUIRED"]
                #[status = BAD_REQUEST]
                #[message = "Booking date is required"]
                DateMissing,

                #[code = "DATE_IN_PAST"]
                #[status = BAD_REQUEST]
                #[message = "Booking date is in the past"]
                DateInPast,

                #[code = "TOTAL_TOO_LARGE"]
                #[status = BAD_REQUEST]
                #[message = "Total price is too large"]
                TotalOverflow,

                #[code = "PAYMENT_PROCESSING"]
                #[status = CONFLICT]
                #[message = "Payment is being processed already"]
                AlreadyProcessing,
            }
        }

        match self {
            Self::WrongStage { .. } => Some(Error::WrongStage.into()),
            Self::DateMissing => Some(Error::DateMissing.into()),
            Self::DateInPast(_) => Some(Error::DateInPast.into()),
            Self::TotalOverflow => Some(Error::TotalOverflow.into()),
            Self::InvalidPayment(violations) => Some(crate::Error::new(
                "INVALID_PAYMENT",
                http::StatusCode::BAD_REQUEST,
                violations,
            )),
            Self::AlreadyProcessing => Some(Error::AlreadyProcessing.into()),
            Self::NotProcessing => None,
        }
    }
}

define_error! {
    enum FlowError {
        #[code = "INVALID_LICENSE_PLATE"]
        #[status = BAD_REQUEST]
        #[message = "License plate must not exceed 32 characters"]
        InvalidLicensePlate,
    }
}
