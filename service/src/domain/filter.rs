//! Catalog filtering [`Criteria`].

use std::{borrow::Borrow, collections::BTreeSet};

use common::define_kind;
use rust_decimal::Decimal;

use crate::domain::{
    spot::{Amenity, Facility},
    Spot,
};

/// Constraints narrowing the visible part of a [`Spot`] catalog.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Criteria {
    /// [`PriceRange`] the hourly rate of a [`Spot`] must fit into.
    pub price_range: PriceRange,

    /// [`DurationBucket`] the driver is looking for.
    ///
    /// Doesn't narrow the catalog: every [`Spot`] has all its rates.
    pub duration: DurationBucket,

    /// [`Amenity`]s a [`Spot`] must offer all of.
    pub amenities: BTreeSet<Amenity>,

    /// [`ParkingType`] a [`Spot`] must be of.
    pub parking_type: ParkingType,
}

impl Criteria {
    /// Adds the provided [`Amenity`] to these [`Criteria`] if it's absent, or
    /// removes it otherwise.
    #[must_use]
    pub fn toggle_amenity(mut self, amenity: Amenity) -> Self {
        if !self.amenities.remove(&amenity) {
            _ = self.amenities.insert(amenity);
        }
        self
    }

    /// Replaces the [`PriceRange`] of these [`Criteria`].
    #[must_use]
    pub fn with_price_range(self, price_range: PriceRange) -> Self {
        Self {
            price_range,
            ..self
        }
    }

    /// Replaces the [`DurationBucket`] of these [`Criteria`].
    #[must_use]
    pub fn with_duration(self, duration: DurationBucket) -> Self {
        Self { duration, ..self }
    }

    /// Replaces the [`ParkingType`] of these [`Criteria`].
    #[must_use]
    pub fn with_parking_type(self, parking_type: ParkingType) -> Self {
        Self {
            parking_type,
            ..self
        }
    }

    /// Indicates whether these [`Criteria`] are still the initial ones,
    /// i.e. the driver hasn't narrowed the catalog yet.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.price_range == PriceRange::default()
            && self.parking_type == ParkingType::All
            && self.amenities.is_empty()
    }

    /// Checks whether the provided [`Spot`] satisfies these [`Criteria`].
    #[must_use]
    pub fn matches(&self, spot: &Spot) -> bool {
        self.price_range.contains(spot.price().amount)
            && self.parking_type.matches(spot.facility)
            && self.amenities.is_subset(&spot.amenities)
    }

    /// Applies these [`Criteria`] to the provided `spots`, preserving their
    /// order.
    pub fn apply<S, I>(&self, spots: I) -> Visible<S>
    where
        S: Borrow<Spot>,
        I: IntoIterator<Item = S>,
    {
        let mut total = 0;
        let spots = spots
            .into_iter()
            .inspect(|_| total += 1)
            .filter(|s| self.matches(s.borrow()))
            .collect();

        Visible {
            spots,
            total,
            filtered: !self.is_unconstrained(),
        }
    }
}

/// Result of applying [`Criteria`] to a catalog.
#[derive(Clone, Debug)]
pub struct Visible<S = Spot> {
    /// [`Spot`]s satisfying the [`Criteria`], in catalog order.
    pub spots: Vec<S>,

    /// Number of [`Spot`]s in the whole catalog.
    pub total: usize,

    /// Indicator whether the [`Criteria`] differ from the initial ones.
    ///
    /// Distinguishes "nothing matches your filters" from "nothing to show".
    pub filtered: bool,
}

/// Inclusive range of hourly prices within `0..=100`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PriceRange {
    /// Lower bound.
    min: Decimal,

    /// Upper bound.
    max: Decimal,
}

impl PriceRange {
    /// Lowest allowed bound.
    pub const LOWEST: Decimal = Decimal::ZERO;

    /// Highest allowed bound.
    pub const HIGHEST: Decimal = Decimal::ONE_HUNDRED;

    /// [`PriceRange`] covering every allowed price.
    pub const FULL: Self = Self {
        min: Self::LOWEST,
        max: Self::HIGHEST,
    };

    /// Creates a new [`PriceRange`] if `min <= max` and both are within
    /// bounds.
    #[must_use]
    pub fn new(min: Decimal, max: Decimal) -> Option<Self> {
        (Self::LOWEST <= min && min <= max && max <= Self::HIGHEST)
            .then_some(Self { min, max })
    }

    /// Returns the lower bound of this [`PriceRange`].
    #[must_use]
    pub fn min(&self) -> Decimal {
        self.min
    }

    /// Returns the upper bound of this [`PriceRange`].
    #[must_use]
    pub fn max(&self) -> Decimal {
        self.max
    }

    /// Checks whether the `price` is within this [`PriceRange`].
    #[must_use]
    pub fn contains(&self, price: Decimal) -> bool {
        self.min <= price && price <= self.max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            min: Decimal::ZERO,
            max: Decimal::from(50),
        }
    }
}

define_kind! {
    #[doc = "Rental period a driver is looking for."]
    enum DurationBucket {
        #[doc = "Per hour."]
        Hourly = 1,

        #[doc = "Per day."]
        Daily = 2,

        #[doc = "Per week."]
        Weekly = 3,

        #[doc = "Per month."]
        Monthly = 4,
    }
}

impl Default for DurationBucket {
    fn default() -> Self {
        Self::Hourly
    }
}

define_kind! {
    #[doc = "Parking type a catalog is narrowed to."]
    enum ParkingType {
        #[doc = "Any [`Facility`]."]
        All = 0,

        #[doc = "[`Facility::Street`] only."]
        Street = 1,

        #[doc = "[`Facility::Garage`] only."]
        Garage = 2,

        #[doc = "[`Facility::Lot`] only."]
        Lot = 3,

        #[doc = "[`Facility::Private`] only."]
        Private = 4,
    }
}

impl ParkingType {
    /// Checks whether the provided [`Facility`] is of this [`ParkingType`].
    #[must_use]
    pub fn matches(self, facility: Facility) -> bool {
        match self {
            Self::All => true,
            Self::Street => facility == Facility::Street,
            Self::Garage => facility == Facility::Garage,
            Self::Lot => facility == Facility::Lot,
            Self::Private => facility == Facility::Private,
        }
    }
}

impl Default for ParkingType {
    fn default() -> Self {
        Self::All
    }
}

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;

    use crate::domain::{
        spot::{fixture::spot, Amenity, Facility},
        Spot,
    };

    use super::{Criteria, ParkingType, PriceRange};

    fn range(min: u32, max: u32) -> PriceRange {
        PriceRange::new(Decimal::from(min), Decimal::from(max)).unwrap()
    }

    fn ids(spots: &[&Spot]) -> Vec<String> {
        spots.iter().map(|s| s.id.to_string()).collect()
    }

    #[test]
    fn price_range_bounds_spots() {
        let spots = [spot("spot-1", 20, Facility::Street, &[])];

        let narrow = Criteria::default().with_price_range(range(0, 15));
        assert!(narrow.apply(&spots).spots.is_empty());

        let wide = Criteria::default().with_price_range(range(0, 25));
        assert_eq!(ids(&wide.apply(&spots).spots), ["spot-1"]);
    }

    #[test]
    fn price_range_is_inclusive() {
        let spots = [
            spot("low", 10, Facility::Lot, &[]),
            spot("high", 30, Facility::Lot, &[]),
        ];

        let visible = Criteria::default().with_price_range(range(10, 30));

        assert_eq!(ids(&visible.apply(&spots).spots), ["low", "high"]);
    }

    #[test]
    fn rejects_invalid_price_ranges() {
        let range = |min: i32, max: i32| {
            PriceRange::new(Decimal::from(min), Decimal::from(max))
        };

        assert!(range(30, 10).is_none());
        assert!(range(-1, 10).is_none());
        assert!(range(0, 101).is_none());
        assert!(range(7, 7).is_some());
    }

    #[test]
    fn parking_type_matches_facility() {
        let spots = [
            spot("street", 5, Facility::Street, &[]),
            spot("garage", 5, Facility::Garage, &[]),
            spot("lot", 5, Facility::Lot, &[]),
        ];

        let garages =
            Criteria::default().with_parking_type(ParkingType::Garage);
        assert_eq!(ids(&garages.apply(&spots).spots), ["garage"]);

        let all = Criteria::default().with_parking_type(ParkingType::All);
        assert_eq!(all.apply(&spots).spots.len(), 3);
    }

    #[test]
    fn requires_every_selected_amenity() {
        let spots = [
            spot("covered", 5, Facility::Garage, &[Amenity::Covered]),
            spot(
                "both",
                5,
                Facility::Garage,
                &[Amenity::Covered, Amenity::EvCharging],
            ),
            spot("none", 5, Facility::Garage, &[]),
        ];

        let criteria = Criteria::default()
            .toggle_amenity(Amenity::Covered)
            .toggle_amenity(Amenity::EvCharging);

        assert_eq!(ids(&criteria.apply(&spots).spots), ["both"]);
    }

    #[test]
    fn returns_ordered_subsequence_satisfying_predicates() {
        let spots = [
            spot("a", 40, Facility::Street, &[Amenity::Security]),
            spot("b", 12, Facility::Garage, &[Amenity::Security]),
            spot("c", 8, Facility::Street, &[]),
            spot("d", 25, Facility::Street, &[Amenity::Security]),
            spot("e", 30, Facility::Street, &[Amenity::Security]),
        ];
        let criteria = Criteria::default()
            .with_price_range(range(10, 30))
            .with_parking_type(ParkingType::Street)
            .toggle_amenity(Amenity::Security);

        let visible = criteria.apply(&spots);

        assert_eq!(ids(&visible.spots), ["d", "e"]);
        assert!(visible.spots.iter().all(|s| criteria.matches(s)));
        let positions = visible
            .spots
            .iter()
            .map(|v| spots.iter().position(|s| s.id == v.id).unwrap())
            .collect::<Vec<_>>();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(visible.total, 5);
    }

    #[test]
    fn applying_is_idempotent() {
        let spots = [
            spot("a", 40, Facility::Street, &[]),
            spot("b", 12, Facility::Garage, &[Amenity::WellLit]),
            spot("c", 8, Facility::Lot, &[Amenity::WellLit]),
        ];
        let criteria = Criteria::default().toggle_amenity(Amenity::WellLit);

        let once = criteria.apply(spots.iter().cloned()).spots;
        let twice = criteria.apply(once.iter()).spots;

        assert_eq!(
            ids(&twice),
            once.iter().map(|s| s.id.to_string()).collect::<Vec<_>>(),
        );
    }

    #[test]
    fn toggling_amenity_twice_is_noop() {
        let initial = Criteria::default().toggle_amenity(Amenity::Handicap);

        for amenity in Amenity::ALL.iter().copied() {
            assert_eq!(
                initial.clone().toggle_amenity(amenity).toggle_amenity(amenity),
                initial,
            );
        }
    }

    #[test]
    fn distinguishes_empty_result_from_no_filters() {
        let spots = [spot("a", 70, Facility::Street, &[])];

        let initial = Criteria::default();
        assert!(initial.is_unconstrained());
        let visible = initial.apply(&spots);
        assert!(visible.spots.is_empty());
        assert!(!visible.filtered);

        let widened = initial.clone().with_price_range(PriceRange::FULL);
        let visible = widened.apply(&spots);
        assert_eq!(visible.spots.len(), 1);
        assert!(visible.filtered);

        let narrowed = initial.clone().toggle_amenity(Amenity::Covered);
        let visible = narrowed.apply(&spots);
        assert!(visible.spots.is_empty());
        assert!(visible.filtered);

        let empty = initial.apply(Vec::<Spot>::new());
        assert!(empty.spots.is_empty());
        assert!(!empty.filtered);
        assert_eq!(empty.total, 0);
    }
}
