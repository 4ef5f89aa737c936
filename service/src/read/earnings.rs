//! Owner earnings read definitions.

use std::collections::BTreeMap;

use common::{money::Currency, Money};
use rust_decimal::Decimal;

use crate::domain::{booking::Status, spot, Booking};

/// Earnings of the [`Booking`] ledger.
///
/// Confirmed and completed [`Booking`]s are earned, while pending ones are
/// only expected. Cancelled ones are counted but earn nothing.
#[derive(Clone, Debug, Default)]
pub struct Summary {
    /// [`Revenue`] of confirmed and completed [`Booking`]s.
    pub earned: Revenue,

    /// [`Revenue`] of pending [`Booking`]s.
    pub expected: Revenue,

    /// Number of [`Booking`]s per [`Status`].
    pub bookings: Counts,

    /// Earning [`Spot`]s, the most booked first.
    ///
    /// [`Spot`]: crate::domain::Spot
    pub spots: Vec<SpotEarnings>,
}

impl Summary {
    /// Sums up the provided [`Booking`]s into a [`Summary`].
    pub fn of<'b>(bookings: impl IntoIterator<Item = &'b Booking>) -> Self {
        let mut summary = Self::default();

        for booking in bookings {
            summary.bookings.total += 1;
            match booking.status {
                Status::Pending => {
                    summary.bookings.pending += 1;
                    summary.expected.add(booking.total);
                }
                Status::Confirmed => {
                    summary.bookings.upcoming += 1;
                    summary.earn(booking);
                }
                Status::Completed => {
                    summary.bookings.completed += 1;
                    summary.earn(booking);
                }
                Status::Cancelled => summary.bookings.cancelled += 1,
            }
        }

        // Stable, so equally booked `Spot`s keep their first-seen order.
        summary.spots.sort_by(|a, b| b.bookings.cmp(&a.bookings));
        summary
    }

    /// Accounts the provided earning [`Booking`], both overall and for its
    /// [`Spot`].
    ///
    /// [`Spot`]: crate::domain::Spot
    fn earn(&mut self, booking: &Booking) {
        self.earned.add(booking.total);

        let found =
            self.spots.iter().position(|s| s.spot_id == booking.spot_id);
        let idx = found.unwrap_or_else(|| {
            self.spots.push(SpotEarnings {
                spot_id: booking.spot_id.clone(),
                spot_name: booking.spot_name.clone(),
                revenue: Revenue::default(),
                bookings: 0,
            });
            self.spots.len() - 1
        });
        let spot = &mut self.spots[idx];
        spot.bookings += 1;
        spot.revenue.add(booking.total);
    }
}

/// Number of [`Booking`]s per [`Status`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Counts {
    /// All [`Booking`]s.
    pub total: usize,

    /// [`Status::Pending`] ones.
    pub pending: usize,

    /// [`Status::Confirmed`] ones, yet to take place.
    pub upcoming: usize,

    /// [`Status::Completed`] ones.
    pub completed: usize,

    /// [`Status::Cancelled`] ones.
    pub cancelled: usize,
}

/// Earnings of a single [`Spot`].
///
/// [`Spot`]: crate::domain::Spot
#[derive(Clone, Debug)]
pub struct SpotEarnings {
    /// ID of the [`Spot`].
    ///
    /// [`Spot`]: crate::domain::Spot
    pub spot_id: spot::Id,

    /// Name of the [`Spot`] as of its first earning [`Booking`].
    ///
    /// [`Spot`]: crate::domain::Spot
    pub spot_name: spot::Name,

    /// [`Revenue`] of the earning [`Booking`]s.
    pub revenue: Revenue,

    /// Number of the earning [`Booking`]s.
    pub bookings: usize,
}

/// Amounts of [`Money`] summed up per [`Currency`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Revenue(BTreeMap<Currency, Decimal>);

impl Revenue {
    /// Returns the summed up amounts, one per [`Currency`].
    #[must_use]
    pub fn amounts(&self) -> Vec<Money> {
        self.0
            .iter()
            .map(|(&currency, &amount)| Money { amount, currency })
            .collect()
    }

    /// Adds the provided [`Money`] to this [`Revenue`].
    fn add(&mut self, money: Money) {
        let sum = self.0.entry(money.currency).or_default();
        *sum = sum.saturating_add(money.amount);
    }
}

#[cfg(test)]
mod spec {
    use std::iter;

    use common::Money;
    use rust_decimal::Decimal;

    use crate::domain::booking::{fixture::booking, Status};

    use super::{Counts, Summary};

    fn usd(amount: u32) -> Vec<Money> {
        vec![Money::usd(Decimal::from(amount))]
    }

    #[test]
    fn sums_up_ledger_by_status() {
        let bookings = [
            booking("spot-1", "", Status::Pending),
            booking("spot-1", "", Status::Confirmed),
            booking("spot-2", "", Status::Completed),
            booking("spot-2", "", Status::Confirmed),
            booking("spot-2", "", Status::Cancelled),
        ];

        let summary = Summary::of(&bookings);

        assert_eq!(summary.earned.amounts(), usd(90));
        assert_eq!(summary.expected.amounts(), usd(30));
        assert_eq!(
            summary.bookings,
            Counts {
                total: 5,
                pending: 1,
                upcoming: 2,
                completed: 1,
                cancelled: 1,
            },
        );
    }

    #[test]
    fn ranks_spots_by_earning_bookings() {
        let bookings = [
            booking("spot-1", "", Status::Confirmed),
            booking("spot-2", "", Status::Completed),
            booking("spot-2", "", Status::Confirmed),
            booking("spot-3", "", Status::Pending),
        ];

        let summary = Summary::of(&bookings);

        let spots = summary
            .spots
            .iter()
            .map(|s| (s.spot_id.to_string(), s.bookings))
            .collect::<Vec<_>>();
        assert_eq!(spots, [("spot-2".into(), 2), ("spot-1".into(), 1)]);
        assert_eq!(summary.spots[0].revenue.amounts(), usd(60));
    }

    #[test]
    fn empty_ledger_earns_nothing() {
        let summary = Summary::of(iter::empty());

        assert!(summary.earned.amounts().is_empty());
        assert!(summary.spots.is_empty());
        assert_eq!(summary.bookings, Counts::default());
    }
}
