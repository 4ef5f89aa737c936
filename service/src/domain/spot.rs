//! [`Spot`] definitions.

use std::{collections::BTreeSet, str::FromStr, sync::LazyLock};

use common::{define_kind, Date, Money};
use derive_more::{AsRef, Display};
use regex::Regex;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Rentable parking location.
///
/// [`Spot`]s are provided by the catalog and never mutated afterwards.
#[derive(Clone, Debug, Deserialize)]
pub struct Spot {
    /// ID of this [`Spot`].
    pub id: Id,

    /// [`Name`] of this [`Spot`].
    pub name: Name,

    /// [`Address`] of this [`Spot`].
    pub address: Address,

    /// [`Description`] of this [`Spot`].
    #[serde(default)]
    pub description: Description,

    /// Geographic [`Location`] of this [`Spot`].
    pub location: Location,

    /// [`Rates`] of this [`Spot`].
    pub rates: Rates,

    /// [`Kind`] of this [`Spot`].
    pub kind: Kind,

    /// [`Facility`] this [`Spot`] is located in.
    pub facility: Facility,

    /// [`Amenity`]s this [`Spot`] offers.
    #[serde(default)]
    pub amenities: BTreeSet<Amenity>,

    /// Weekdays this [`Spot`] can be booked on.
    pub availability: Availability,

    /// Indicator whether this [`Spot`] is currently open for booking at all.
    pub available: bool,

    /// Images of this [`Spot`], in display order.
    #[serde(default)]
    pub images: Vec<ImageUrl>,

    /// Average [`Rating`] of this [`Spot`].
    pub rating: Rating,

    /// Number of reviews the [`Rating`] is based on.
    #[serde(default)]
    pub review_count: u32,
}

impl Spot {
    /// Returns the price of this [`Spot`] the catalog is filtered by.
    #[must_use]
    pub fn price(&self) -> Money {
        self.rates.hourly
    }

    /// Indicates whether this [`Spot`] can be booked on the provided [`Date`].
    #[must_use]
    pub fn is_open_on(&self, date: Date) -> bool {
        self.available && self.availability.includes(date.weekday().into())
    }
}

/// ID of a [`Spot`].
#[derive(
    AsRef,
    Clone,
    Debug,
    Deserialize,
    Display,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
)]
#[as_ref(str, String)]
#[serde(try_from = "String")]
pub struct Id(String);

impl Id {
    /// Creates a new [`Id`] if the given `id` is valid.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        Self::check(&id).then_some(Self(id))
    }

    /// Checks whether the given `id` is a valid [`Id`].
    fn check(id: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Id`] format: a letter or digit
        /// followed by up to 63 letters, digits, underscores or dashes.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]{0,63}$")
                .expect("valid regex")
        });

        REGEX.is_match(id.as_ref())
    }
}

impl FromStr for Id {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `spot::Id`")
    }
}

impl TryFrom<String> for Id {
    type Error = &'static str;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s).ok_or("invalid `spot::Id`")
    }
}

/// Name of a [`Spot`].
#[derive(AsRef, Clone, Debug, Deserialize, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[serde(try_from = "String")]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        is_single_line(&name, 256).then_some(Self(name))
    }
}

impl TryFrom<String> for Name {
    type Error = &'static str;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s).ok_or("invalid `spot::Name`")
    }
}

/// Street address of a [`Spot`].
#[derive(AsRef, Clone, Debug, Deserialize, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[serde(try_from = "String")]
pub struct Address(String);

impl Address {
    /// Creates a new [`Address`] if the given `address` is valid.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        is_single_line(&address, 512).then_some(Self(address))
    }
}

impl TryFrom<String> for Address {
    type Error = &'static str;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s).ok_or("invalid `spot::Address`")
    }
}

/// Free-form description of a [`Spot`]. May be empty.
#[derive(AsRef, Clone, Debug, Default, Deserialize, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[serde(try_from = "String")]
pub struct Description(String);

impl Description {
    /// Creates a new [`Description`] if the given `text` is not too long.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        (text.len() <= 4096).then_some(Self(text))
    }
}

impl TryFrom<String> for Description {
    type Error = &'static str;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s).ok_or("`spot::Description` is too long")
    }
}

/// Checks the `text` is non-empty, trimmed, single-line and at most `max`
/// bytes long.
fn is_single_line(text: &str, max: usize) -> bool {
    text.trim() == text
        && !text.is_empty()
        && text.len() <= max
        && !text.contains(['\n', '\r'])
}

/// Geographic coordinates of a [`Spot`].
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(try_from = "LocationRepr")]
pub struct Location {
    /// Latitude in degrees.
    lat: f64,

    /// Longitude in degrees.
    lng: f64,
}

impl Location {
    /// Creates a new [`Location`] if the coordinates are within range.
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Option<Self> {
        ((-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng))
            .then_some(Self { lat, lng })
    }

    /// Returns the latitude of this [`Location`].
    #[must_use]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Returns the longitude of this [`Location`].
    #[must_use]
    pub fn lng(&self) -> f64 {
        self.lng
    }
}

/// Unchecked [`Location`] representation.
#[derive(Deserialize)]
struct LocationRepr {
    /// Latitude in degrees.
    lat: f64,

    /// Longitude in degrees.
    lng: f64,
}

impl TryFrom<LocationRepr> for Location {
    type Error = &'static str;

    fn try_from(
        LocationRepr { lat, lng }: LocationRepr,
    ) -> Result<Self, Self::Error> {
        Self::new(lat, lng).ok_or("`spot::Location` is out of range")
    }
}

/// Rental rates of a [`Spot`].
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(try_from = "RatesRepr")]
pub struct Rates {
    /// Price of a single hour.
    pub hourly: Money,

    /// Price of a single day.
    pub daily: Money,

    /// Price of a single month.
    pub monthly: Money,
}

impl Rates {
    /// Creates new [`Rates`] if none of them is negative.
    #[must_use]
    pub fn new(hourly: Money, daily: Money, monthly: Money) -> Option<Self> {
        [hourly, daily, monthly]
            .iter()
            .all(|m| !m.is_negative())
            .then_some(Self {
                hourly,
                daily,
                monthly,
            })
    }
}

/// Unchecked [`Rates`] representation.
#[derive(Deserialize)]
struct RatesRepr {
    /// Price of a single hour.
    hourly: Money,

    /// Price of a single day.
    daily: Money,

    /// Price of a single month.
    monthly: Money,
}

impl TryFrom<RatesRepr> for Rates {
    type Error = &'static str;

    fn try_from(r: RatesRepr) -> Result<Self, Self::Error> {
        Self::new(r.hourly, r.daily, r.monthly)
            .ok_or("`spot::Rates` must not be negative")
    }
}

/// Average review rating of a [`Spot`], from `0` to `5`.
#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq)]
#[serde(try_from = "Decimal")]
pub struct Rating(Decimal);

impl Rating {
    /// Creates a new [`Rating`] if the `value` is within `0..=5`.
    #[must_use]
    pub fn new(value: Decimal) -> Option<Self> {
        (value >= Decimal::ZERO && value <= Decimal::from(5))
            .then_some(Self(value))
    }

    /// Returns the underlying [`Decimal`] value.
    #[must_use]
    pub fn value(self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Rating {
    type Error = &'static str;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value).ok_or("`spot::Rating` must be within 0..=5")
    }
}

/// URL of a [`Spot`] image.
#[derive(AsRef, Clone, Debug, Deserialize, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[serde(try_from = "String")]
pub struct ImageUrl(String);

impl ImageUrl {
    /// Creates a new [`ImageUrl`] if the given `url` is an HTTP(S) URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Option<Self> {
        let url = url.into();
        ((url.starts_with("https://") || url.starts_with("http://"))
            && is_single_line(&url, 2048))
        .then_some(Self(url))
    }
}

impl TryFrom<String> for ImageUrl {
    type Error = &'static str;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s).ok_or("invalid `spot::ImageUrl`")
    }
}

/// Weekdays a [`Spot`] is bookable on.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(transparent)]
pub struct Availability(BTreeSet<Weekday>);

impl Availability {
    /// Creates a new [`Availability`] out of the provided weekdays.
    #[must_use]
    pub fn new(days: impl IntoIterator<Item = Weekday>) -> Self {
        Self(days.into_iter().collect())
    }

    /// Creates a new [`Availability`] covering the whole week.
    #[must_use]
    pub fn always() -> Self {
        Self::new(Weekday::ALL.iter().copied())
    }

    /// Indicates whether the provided [`Weekday`] is included.
    #[must_use]
    pub fn includes(&self, day: Weekday) -> bool {
        self.0.contains(&day)
    }

    /// Iterates over the included [`Weekday`]s, from Monday to Sunday.
    pub fn days(&self) -> impl Iterator<Item = Weekday> + '_ {
        self.0.iter().copied()
    }
}

define_kind! {
    #[doc = "Day of a week."]
    enum Weekday {
        #[doc = "Monday."]
        Monday = 1,

        #[doc = "Tuesday."]
        Tuesday = 2,

        #[doc = "Wednesday."]
        Wednesday = 3,

        #[doc = "Thursday."]
        Thursday = 4,

        #[doc = "Friday."]
        Friday = 5,

        #[doc = "Saturday."]
        Saturday = 6,

        #[doc = "Sunday."]
        Sunday = 7,
    }
}

impl From<time::Weekday> for Weekday {
    fn from(day: time::Weekday) -> Self {
        use time::Weekday as W;

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

define_kind! {
    #[doc = "Pricing class of a [`Spot`]."]
    enum Kind {
        #[doc = "Regular parking spot."]
        Standard = 1,

        #[doc = "Premium parking spot."]
        Premium = 2,

        #[doc = "Parking spot reserved for disabled drivers."]
        Handicap = 3,
    }
}

define_kind! {
    #[doc = "Physical facility a [`Spot`] is located in."]
    enum Facility {
        #[doc = "On-street parking."]
        Street = 1,

        #[doc = "Parking garage."]
        Garage = 2,

        #[doc = "Open parking lot."]
        Lot = 3,

        #[doc = "Private driveway."]
        Private = 4,
    }
}

define_kind! {
    #[doc = "Amenity offered by a [`Spot`]."]
    enum Amenity {
        #[doc = "Covered from the weather."]
        Covered = 1,

        #[doc = "Guarded or watched by security cameras."]
        Security = 2,

        #[doc = "Equipped with an electric vehicle charger."]
        EvCharging = 3,

        #[doc = "Accessible for disabled drivers."]
        Handicap = 4,

        #[doc = "Accessible 24/7."]
        AroundTheClock = 5,

        #[doc = "Well lit at night."]
        WellLit = 6,
    }
}

#[cfg(test)]
pub(crate) mod fixture {
    //! [`Spot`]s used across tests.

    use std::collections::BTreeSet;

    use common::Money;
    use rust_decimal::Decimal;

    use super::{
        Address, Amenity, Availability, Description, Facility, Id, Kind,
        Location, Name, Rates, Rating, Spot,
    };

    /// Creates a [`Spot`] with the provided `id`, hourly `price`, `facility`
    /// and `amenities`.
    pub(crate) fn spot(
        id: &str,
        price: u32,
        facility: Facility,
        amenities: &[Amenity],
    ) -> Spot {
        let hourly = Money::usd(Decimal::from(price));
        Spot {
            id: Id::new(id).unwrap(),
            name: Name::new(format!("Spot {id}")).unwrap(),
            address: Address::new("123 Market St, San Francisco").unwrap(),
            description: Description::default(),
            location: Location::new(37.7749, -122.4194).unwrap(),
            rates: Rates::new(
                hourly,
                hourly.checked_times(8).unwrap(),
                hourly.checked_times(160).unwrap(),
            )
            .unwrap(),
            kind: Kind::Standard,
            facility,
            amenities: amenities.iter().copied().collect::<BTreeSet<_>>(),
            availability: Availability::always(),
            available: true,
            images: vec![],
            rating: Rating::new(Decimal::from(4)).unwrap(),
            review_count: 0,
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use common::Date;

    use super::{
        fixture, Amenity, Availability, Facility, Id, Location, Weekday,
    };

    #[test]
    fn validates_ids() {
        assert!(Id::new("spot-1").is_some());
        assert!(Id::new("A_12").is_some());
        assert!(Id::new("").is_none());
        assert!(Id::new("-spot").is_none());
        assert!(Id::new("spot 1").is_none());
    }

    #[test]
    fn validates_locations() {
        assert!(Location::new(37.7749, -122.4194).is_some());
        assert!(Location::new(91.0, 0.0).is_none());
        assert!(Location::new(0.0, -180.5).is_none());
    }

    #[test]
    fn parses_kebab_case_kinds() {
        assert_eq!(Amenity::from_str("ev-charging"), Ok(Amenity::EvCharging));
        assert_eq!(Amenity::WellLit.to_string(), "well-lit");
        assert_eq!(Facility::from_str("garage"), Ok(Facility::Garage));
        assert!(Facility::from_str("all").is_err());
    }

    #[test]
    fn checks_weekday_availability() {
        let mut spot = fixture::spot("spot-1", 15, Facility::Lot, &[]);
        spot.availability =
            Availability::new([Weekday::Monday, Weekday::Friday]);
        // 2026-10-19 is a Monday.
        let monday = Date::from_str("2026-10-19").unwrap();
        let tuesday = monday.next_day().unwrap();

        assert!(spot.is_open_on(monday));
        assert!(!spot.is_open_on(tuesday));

        spot.available = false;
        assert!(!spot.is_open_on(monday));
    }
}
