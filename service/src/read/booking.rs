//! [`Booking`]-related read definitions.

#[cfg(doc)]
use crate::domain::Booking;

pub mod list {
    //! [`Booking`] list definitions.

    use crate::domain::{booking, Booking};
    #[cfg(doc)]
    use crate::domain::spot;

    /// Filter of a [`Booking`] list.
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// [`booking::Status`] to narrow the list to.
        ///
        /// [`None`] means all of them.
        pub status: Option<booking::Status>,

        /// Text to search for, case-insensitively, in a [`spot::Name`],
        /// [`spot::Id`] or [`booking::LicensePlate`].
        pub search: Option<String>,
    }

    impl Filter {
        /// Checks whether the provided [`Booking`] passes this [`Filter`].
        #[must_use]
        pub fn matches(&self, booking: &Booking) -> bool {
            if self.status.is_some_and(|s| s != booking.status) {
                return false;
            }
            let Some(search) = self
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
            else {
                return true;
            };

            let needle = search.to_lowercase();
            let haystacks: [&str; 3] = [
                booking.spot_name.as_ref(),
                booking.spot_id.as_ref(),
                booking.license_plate.as_ref(),
            ];
            haystacks
                .into_iter()
                .any(|hay| hay.to_lowercase().contains(&needle))
        }
    }

    #[cfg(test)]
    mod spec {
        use crate::domain::booking::{fixture::booking, Status};

        use super::Filter;

        #[test]
        fn filters_by_status() {
            let pending = booking("spot-1", "", Status::Pending);
            let confirmed = booking("spot-1", "", Status::Confirmed);
            let filter = Filter {
                status: Some(Status::Pending),
                search: None,
            };

            assert!(filter.matches(&pending));
            assert!(!filter.matches(&confirmed));
            assert!(Filter::default().matches(&confirmed));
        }

        #[test]
        fn searches_case_insensitively() {
            let b = booking("spot-7", "7ABC123", Status::Pending);
            let search = |s: &str| Filter {
                status: None,
                search: Some(s.into()),
            };

            assert!(search("SPOT-7").matches(&b));
            assert!(search("abc").matches(&b));
            assert!(search("  ").matches(&b));
            assert!(!search("garage").matches(&b));
        }
    }
}
