//! [`Spot`]-related definitions.

use common::{Date, Money};
use derive_more::{AsRef, Display, From, Into};
use juniper::{
    graphql_object, GraphQLEnum, GraphQLInputObject, GraphQLScalar,
    InputValue, ScalarValue, Value,
};
use rust_decimal::{prelude::ToPrimitive as _, Decimal};
use service::domain::{self, filter};

use crate::{define_error, Context, Error};

/// A parking spot.
#[derive(Clone, Debug, From)]
pub struct Spot(domain::Spot);

/// A parking spot.
#[graphql_object(context = Context)]
impl Spot {
    /// Unique identifier of this `Spot`.
    pub fn id(&self) -> Id {
        self.0.id.clone().into()
    }

    /// Name of this `Spot`.
    pub fn name(&self) -> &str {
        self.0.name.as_ref()
    }

    /// Street address of this `Spot`.
    pub fn address(&self) -> &str {
        self.0.address.as_ref()
    }

    /// Free-form description of this `Spot`.
    pub fn description(&self) -> &str {
        self.0.description.as_ref()
    }

    /// Latitude of this `Spot` in degrees.
    pub fn latitude(&self) -> f64 {
        self.0.location.lat()
    }

    /// Longitude of this `Spot` in degrees.
    pub fn longitude(&self) -> f64 {
        self.0.location.lng()
    }

    /// Price of a single hour at this `Spot`.
    ///
    /// The catalog is filtered by this price.
    pub fn hourly_rate(&self) -> Money {
        self.0.rates.hourly
    }

    /// Price of a single day at this `Spot`.
    pub fn daily_rate(&self) -> Money {
        self.0.rates.daily
    }

    /// Price of a single month at this `Spot`.
    pub fn monthly_rate(&self) -> Money {
        self.0.rates.monthly
    }

    /// Pricing class of this `Spot`.
    pub fn kind(&self) -> Kind {
        self.0.kind.into()
    }

    /// Physical facility this `Spot` is located in.
    pub fn facility(&self) -> Facility {
        self.0.facility.into()
    }

    /// Amenities this `Spot` offers.
    pub fn amenities(&self) -> Vec<Amenity> {
        self.0.amenities.iter().copied().map(Into::into).collect()
    }

    /// Weekdays this `Spot` can be booked on.
    pub fn availability(&self) -> Vec<Weekday> {
        self.0.availability.days().map(Into::into).collect()
    }

    /// Indicator whether this `Spot` is open for booking at all.
    pub fn available(&self) -> bool {
        self.0.available
    }

    /// Indicator whether this `Spot` can be booked on the provided `Date`.
    pub fn is_open_on(&self, date: Date) -> bool {
        self.0.is_open_on(date)
    }

    /// URLs of this `Spot` images, in display order.
    pub fn images(&self) -> Vec<String> {
        self.0.images.iter().map(ToString::to_string).collect()
    }

    /// Average review rating of this `Spot`, from `0` to `5`.
    pub fn rating(&self) -> f64 {
        self.0.rating.value().to_f64().unwrap_or_default()
    }

    /// Number of reviews the `rating` is based on.
    pub fn review_count(&self) -> i32 {
        i32::try_from(self.0.review_count).unwrap_or(i32::MAX)
    }
}

/// Unique identifier of a `Spot`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "SpotId",
    to_output_with = Self::to_output,
    from_input_with = Self::from_input,
    parse_token(String),
)]
pub struct Id(domain::spot::Id);

impl Id {
    /// Outputs this [`Id`] as a string [`Value`].
    fn to_output<S: ScalarValue>(&self) -> Value<S> {
        Value::scalar(self.0.to_string())
    }

    /// Parses an [`Id`] out of a string [`InputValue`].
    fn from_input<S: ScalarValue>(
        input: &InputValue<S>,
    ) -> Result<Self, String> {
        input
            .as_string_value()
            .ok_or_else(|| format!("Expected `SpotId` string, found: {input}"))?
            .parse()
            .map(Self)
            .map_err(|e| format!("Cannot parse `SpotId`: {e}"))
    }
}

/// Pricing class of a `Spot`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "SpotKind")]
pub enum Kind {
    /// Regular parking spot.
    Standard,

    /// Premium parking spot.
    Premium,

    /// Parking spot reserved for disabled drivers.
    Handicap,
}

impl From<domain::spot::Kind> for Kind {
    fn from(kind: domain::spot::Kind) -> Self {
        use domain::spot::Kind as K;
        match kind {
            K::Standard => Self::Standard,
            K::Premium => Self::Premium,
            K::Handicap => Self::Handicap,
        }
    }
}

/// Physical facility a `Spot` is located in.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "SpotFacility")]
pub enum Facility {
    /// On-street parking.
    Street,

    /// Parking garage.
    Garage,

    /// Open parking lot.
    Lot,

    /// Private driveway.
    Private,
}

impl From<domain::spot::Facility> for Facility {
    fn from(facility: domain::spot::Facility) -> Self {
        use domain::spot::Facility as F;
        match facility {
            F::Street => Self::Street,
            F::Garage => Self::Garage,
            F::Lot => Self::Lot,
            F::Private => Self::Private,
        }
    }
}

/// Amenity offered by a `Spot`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "SpotAmenity")]
pub enum Amenity {
    /// Covered from the weather.
    Covered,

    /// Guarded or watched by security cameras.
    Security,

    /// Equipped with an electric vehicle charger.
    EvCharging,

    /// Accessible for disabled drivers.
    Handicap,

    /// Accessible 24/7.
    AroundTheClock,

    /// Well lit at night.
    WellLit,
}

impl From<domain::spot::Amenity> for Amenity {
    fn from(amenity: domain::spot::Amenity) -> Self {
        use domain::spot::Amenity as A;
        match amenity {
            A::Covered => Self::Covered,
            A::Security => Self::Security,
            A::EvCharging => Self::EvCharging,
            A::Handicap => Self::Handicap,
            A::AroundTheClock => Self::AroundTheClock,
            A::WellLit => Self::WellLit,
        }
    }
}

impl From<Amenity> for domain::spot::Amenity {
    fn from(amenity: Amenity) -> Self {
        use Amenity as A;
        match amenity {
            A::Covered => Self::Covered,
            A::Security => Self::Security,
            A::EvCharging => Self::EvCharging,
            A::Handicap => Self::Handicap,
            A::AroundTheClock => Self::AroundTheClock,
            A::WellLit => Self::WellLit,
        }
    }
}

/// Day of a week.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
pub enum Weekday {
    /// Monday.
    Monday,

    /// Tuesday.
    Tuesday,

    /// Wednesday.
    Wednesday,

    /// Thursday.
    Thursday,

    /// Friday.
    Friday,

    /// Saturday.
    Saturday,

    /// Sunday.
    Sunday,
}

impl From<domain::spot::Weekday> for Weekday {
    fn from(day: domain::spot::Weekday) -> Self {
        use domain::spot::Weekday as W;
        match day {
            W::Monday => Self::Monday,
            W::Tuesday => Self::Tuesday,
            W::Wednesday => Self::Wednesday,
            W::Thursday => Self::Thursday,
            W::Friday => Self::Friday,
            W::Saturday => Self::Saturday,
            W::Sunday => Self::Sunday,
        }
    }
}

/// Rental period a driver is looking for.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
pub enum DurationBucket {
    /// Per hour.
    Hourly,

    /// Per day.
    Daily,

    /// Per week.
    Weekly,

    /// Per month.
    Monthly,
}

impl From<DurationBucket> for filter::DurationBucket {
    fn from(bucket: DurationBucket) -> Self {
        use DurationBucket as D;
        match bucket {
            D::Hourly => Self::Hourly,
            D::Daily => Self::Daily,
            D::Weekly => Self::Weekly,
            D::Monthly => Self::Monthly,
        }
    }
}

/// Parking type the `Spot` catalog is narrowed to.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
pub enum ParkingType {
    /// Any facility.
    All,

    /// On-street parking only.
    Street,

    /// Parking garages only.
    Garage,

    /// Open parking lots only.
    Lot,

    /// Private driveways only.
    Private,
}

impl From<ParkingType> for filter::ParkingType {
    fn from(ty: ParkingType) -> Self {
        use ParkingType as P;
        match ty {
            P::All => Self::All,
            P::Street => Self::Street,
            P::Garage => Self::Garage,
            P::Lot => Self::Lot,
            P::Private => Self::Private,
        }
    }
}

/// Criteria narrowing the `Spot` catalog.
///
/// Omitted fields don't narrow anything.
#[derive(Clone, Debug, Default, GraphQLInputObject)]
#[graphql(name = "SpotFilter")]
pub struct Filter {
    /// Lowest hourly rate, from `0` to `100`. Defaults to `0`.
    pub min_price: Option<i32>,

    /// Highest hourly rate, from `0` to `100`. Defaults to `50`.
    pub max_price: Option<i32>,

    /// Rental period a driver is looking for.
    pub duration: Option<DurationBucket>,

    /// Amenities a `Spot` must offer all of.
    pub amenities: Option<Vec<Amenity>>,

    /// Parking type a `Spot` must be of.
    pub parking_type: Option<ParkingType>,
}

impl TryFrom<Filter> for filter::Criteria {
    type Error = Error;

    fn try_from(filter: Filter) -> Result<Self, Self::Error> {
        let Filter {
            min_price,
            max_price,
            duration,
            amenities,
            parking_type,
        } = filter;

        let defaults = filter::PriceRange::default();
        let price_range = filter::PriceRange::new(
            min_price.map_or(defaults.min(), Decimal::from),
            max_price.map_or(defaults.max(), Decimal::from),
        )
        .ok_or(Error::from(SpotError::InvalidPriceRange))?;
        let duration = duration.map(Into::into).unwrap_or_default();
        let parking_type = parking_type.map(Into::into).unwrap_or_default();

        Ok(amenities
            .into_iter()
            .flatten()
            .fold(Self::default(), |c, a| c.toggle_amenity(a.into()))
            .with_price_range(price_range)
            .with_duration(duration)
            .with_parking_type(parking_type))
    }
}

pub mod list {
    //! Definitions related to the [`Spot`] list.

    use derive_more::From;
    use juniper::graphql_object;
    use service::domain::filter::Visible;

    use super::Spot;

    /// Visible part of the [`Spot`] catalog.
    #[derive(Clone, Debug, From)]
    pub struct List(Visible);

    /// Visible part of the `Spot` catalog.
    #[graphql_object(name = "SpotList", context = crate::Context)]
    impl List {
        /// `Spot`s matching the filter, in catalog order.
        pub fn spots(&self) -> Vec<Spot> {
            self.0.spots.iter().cloned().map(Into::into).collect()
        }

        /// Number of `Spot`s matching the filter.
        pub fn count(&self) -> i32 {
            i32::try_from(self.0.spots.len()).unwrap_or(i32::MAX)
        }

        /// Number of `Spot`s in the whole catalog.
        pub fn total(&self) -> i32 {
            i32::try_from(self.0.total).unwrap_or(i32::MAX)
        }

        /// Indicator whether the filter differs from the initial one
        /// (hourly rate within `0..=50`, any parking type, no amenities).
        ///
        /// Tells "nothing matches the filter" apart from "nothing to show".
        pub fn filtered(&self) -> bool {
            self.0.filtered
        }
    }
}

define_error! {
    enum SpotError {
        #[code = "INVALID_PRICE_RANGE"]
        #[status = BAD_REQUEST]
        #[message = "Price range must be within 0..=100 with min <= max"]
        InvalidPriceRange,
    }
}
