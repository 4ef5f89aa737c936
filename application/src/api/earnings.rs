//! Owner earnings definitions.

use common::Money;
use derive_more::From;
use juniper::graphql_object;
use service::read::earnings;

use crate::{api, Context};

/// Earnings over the whole `Booking` ledger.
#[derive(Clone, Debug, From)]
pub struct Summary(earnings::Summary);

/// Earnings over the whole `Booking` ledger.
///
/// Amounts are summed up per currency.
#[graphql_object(name = "EarningsSummary", context = Context)]
impl Summary {
    /// Revenue of `CONFIRMED` and `COMPLETED` `Booking`s.
    pub fn earned(&self) -> Vec<Money> {
        self.0.earned.amounts()
    }

    /// Revenue of `PENDING` `Booking`s.
    pub fn expected(&self) -> Vec<Money> {
        self.0.expected.amounts()
    }

    /// Number of all `Booking`s.
    pub fn total_bookings(&self) -> i32 {
        count(self.0.bookings.total)
    }

    /// Number of `PENDING` `Booking`s.
    pub fn pending_bookings(&self) -> i32 {
        count(self.0.bookings.pending)
    }

    /// Number of `CONFIRMED` `Booking`s yet to take place.
    pub fn upcoming_bookings(&self) -> i32 {
        count(self.0.bookings.upcoming)
    }

    /// Number of `COMPLETED` `Booking`s.
    pub fn completed_bookings(&self) -> i32 {
        count(self.0.bookings.completed)
    }

    /// Number of `CANCELLED` `Booking`s.
    pub fn cancelled_bookings(&self) -> i32 {
        count(self.0.bookings.cancelled)
    }

    /// Earning `Spot`s, the most booked first.
    pub fn spots(&self) -> Vec<SpotEarnings> {
        self.0.spots.iter().cloned().map(SpotEarnings).collect()
    }
}

/// Earnings of a single `Spot`.
#[derive(Clone, Debug)]
pub struct SpotEarnings(earnings::SpotEarnings);

/// Earnings of a single `Spot`.
#[graphql_object(context = Context)]
impl SpotEarnings {
    /// ID of the `Spot`.
    pub fn spot_id(&self) -> api::spot::Id {
        self.0.spot_id.clone().into()
    }

    /// Name of the `Spot`.
    pub fn spot_name(&self) -> &str {
        self.0.spot_name.as_ref()
    }

    /// Revenue of the earning `Booking`s of the `Spot`.
    pub fn revenue(&self) -> Vec<Money> {
        self.0.revenue.amounts()
    }

    /// Number of the earning `Booking`s of the `Spot`.
    pub fn bookings(&self) -> i32 {
        count(self.0.bookings)
    }
}

/// Converts the provided `n` into a GraphQL `Int`, saturating.
fn count(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}
