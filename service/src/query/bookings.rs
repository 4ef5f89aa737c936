//! [`Query`] collection related to multiple [`Booking`]s.

use common::operations::By;

use crate::{domain::Booking, read::booking::list};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries [`Booking`]s matching a [`list::Filter`], newest first.
pub type List = DatabaseQuery<By<Vec<Booking>, list::Filter>>;

#[cfg(test)]
mod spec {
    use crate::{
        command::ApproveBooking,
        domain::booking::Status,
        read::booking::list::Filter,
        test::{service, submitted_booking, Scripted},
        Command as _,
    };

    use super::List;

    #[tokio::test]
    async fn lists_newest_first() {
        let svc = service(Scripted::default());
        let older = submitted_booking(&svc).await;
        let newer = submitted_booking(&svc).await;

        let bookings = svc.execute(List::by(Filter::default())).await.unwrap();

        let ids = bookings.iter().map(|b| b.id).collect::<Vec<_>>();
        assert_eq!(ids, [newer, older]);
    }

    #[tokio::test]
    async fn filters_by_status() {
        let svc = service(Scripted::default());
        let approved = submitted_booking(&svc).await;
        _ = submitted_booking(&svc).await;
        _ = svc
            .execute(ApproveBooking {
                booking_id: approved,
            })
            .await
            .unwrap();

        let bookings = svc
            .execute(List::by(Filter {
                status: Some(Status::Confirmed),
                search: None,
            }))
            .await
            .unwrap();

        assert_eq!(bookings.len(), 1);
        assert_eq!(bookings[0].id, approved);
    }
}
