//! GraphQL [`Query`]s definitions.

use juniper::graphql_object;
use service::{query, read, Query as _};

use crate::{api, define_error, AsError, Context, Error};

use super::mutation::{BookingError, FlowError};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the `Spot` catalog narrowed down by the provided `filter`.
    ///
    /// Without a `filter`, the initial one is used: the hourly rate is
    /// limited to `0..=50`, and the result isn't reported as `filtered`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_PRICE_RANGE` - the price range of the `filter` is invalid.
    #[tracing::instrument(
        skip_all,
        fields(
            filter = ?filter,
            gql.name = "spots",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn spots(
        filter: Option<api::spot::Filter>,
        ctx: &Context,
    ) -> Result<api::spot::list::List, Error> {
        let criteria = filter
            .unwrap_or_default()
            .try_into()
            .map_err(ctx.error())?;

        ctx.service()
            .execute(query::spots::List(criteria))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Spot` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `SPOT_NOT_EXISTS` - the `Spot` with the specified ID does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "spot",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn spot(
        id: api::spot::Id,
        ctx: &Context,
    ) -> Result<api::Spot, Error> {
        ctx.service()
            .execute(query::spot::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| SpotError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `BookingFlow` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BOOKING_FLOW_NOT_EXISTS` - the `BookingFlow` with the specified ID
    ///                               does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "bookingFlow",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn booking_flow(
        id: api::flow::Id,
        ctx: &Context,
    ) -> Result<api::BookingFlow, Error> {
        ctx.service()
            .execute(query::booking_flow::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| FlowError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns submitted `Booking`s, newest first.
    ///
    /// `search` is matched case-insensitively against the `Spot` name, the
    /// `Spot` ID and the license plate.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "bookings",
            otel.name = Self::SPAN_NAME,
            search = ?search,
            status = ?status,
        ),
    )]
    pub async fn bookings(
        status: Option<api::booking::Status>,
        search: Option<String>,
        ctx: &Context,
    ) -> Result<Vec<api::Booking>, Error> {
        ctx.service()
            .execute(query::bookings::List::by(read::booking::list::Filter {
                status: status.map(Into::into),
                search,
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|bookings| bookings.into_iter().map(Into::into).collect())
    }

    /// Returns the `Booking` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BOOKING_NOT_EXISTS` - the `Booking` with the specified ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "booking",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn booking(
        id: api::booking::Id,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        ctx.service()
            .execute(query::booking::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| BookingError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the owner's `Notification`s, newest first, along with the
    /// number of unread ones.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "notifications",
            otel.name = Self::SPAN_NAME,
            unread_only = ?unread_only,
        ),
    )]
    pub async fn notifications(
        unread_only: Option<bool>,
        ctx: &Context,
    ) -> Result<api::notification::Inbox, Error> {
        ctx.service()
            .execute(query::notifications::Inbox::by(
                read::notification::list::Filter {
                    unread_only: unread_only.unwrap_or_default(),
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the owner's earnings over all the submitted `Booking`s.
    #[tracing::instrument(
        skip_all,
        fields(gql.name = "earnings", otel.name = Self::SPAN_NAME),
    )]
    pub async fn earnings(
        ctx: &Context,
    ) -> Result<api::earnings::Summary, Error> {
        ctx.service()
            .execute(query::earnings::Summary)
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

define_error! {
    enum SpotError {
        #[code = "SPOT_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Spot` with the specified ID does not exist"]
        NotExists,
    }
}
