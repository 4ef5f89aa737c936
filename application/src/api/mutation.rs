//! GraphQL [`Mutation`]s definitions.

use juniper::graphql_object;
use service::{command, Command as _};
use tracing::{self as log, Instrument as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Opens a new `BookingFlow` for the `Spot` with the specified ID.
    ///
    /// Authorization is optional: if provided, the `BookingFlow` is bound to
    /// the authorized driver.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `SPOT_NOT_EXISTS` - the `Spot` with the specified ID does not exist;
    /// - `SPOT_UNAVAILABLE` - the `Spot` is not available for booking;
    /// - `INVALID_TOKEN` - the provided authorization token is invalid.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "openBookingFlow",
            otel.name = Self::SPAN_NAME,
            spot_id = %spot_id,
        ),
    )]
    pub async fn open_booking_flow(
        spot_id: api::spot::Id,
        ctx: &Context,
    ) -> Result<api::BookingFlow, Error> {
        let driver_id = ctx.try_current_session().await?.map(|s| s.driver_id);

        ctx.service()
            .execute(command::OpenBookingFlow {
                spot_id: spot_id.into(),
                driver_id,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Submits the booking `details` of the `BookingFlow`, advancing it to
    /// the `PAYMENT` stage.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BOOKING_FLOW_NOT_EXISTS` - the `BookingFlow` with the specified ID
    ///                               does not exist;
    /// - `WRONG_FLOW_STAGE` - the `BookingFlow` is not at the `DETAILS`
    ///                        stage;
    /// - `DATE_REQUIRED` - no booking date is picked;
    /// - `DATE_IN_PAST` - the picked booking date is in the past;
    /// - `SPOT_CLOSED` - the `Spot` is closed on the picked date;
    /// - `INVALID_LICENSE_PLATE` - the license plate is too long.
    #[tracing::instrument(
        skip_all,
        fields(
            details = ?details,
            flow_id = %flow_id,
            gql.name = "submitBookingDetails",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn submit_booking_details(
        flow_id: api::flow::Id,
        details: api::flow::DetailsInput,
        ctx: &Context,
    ) -> Result<api::BookingFlow, Error> {
        let details = details.try_into().map_err(ctx.error())?;

        ctx.service()
            .execute(command::SubmitBookingDetails {
                flow_id: flow_id.into(),
                details,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Submits the `payment` of the `BookingFlow`.
    ///
    /// Returns the `BookingFlow` being processed: the payment is authorized
    /// in background, so its result should be polled via the `bookingFlow`
    /// query.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BOOKING_FLOW_NOT_EXISTS` - the `BookingFlow` with the specified ID
    ///                               does not exist;
    /// - `WRONG_FLOW_STAGE` - the `BookingFlow` is not at the `PAYMENT`
    ///                        stage;
    /// - `INVALID_PAYMENT` - the `payment` details are malformed;
    /// - `PAYMENT_PROCESSING` - a previous payment is still being processed.
    #[tracing::instrument(
        skip_all,
        fields(
            flow_id = %flow_id,
            gql.name = "submitPayment",
            otel.name = Self::SPAN_NAME,
            payment = ?payment,
        ),
    )]
    pub async fn submit_payment(
        flow_id: api::flow::Id,
        payment: api::flow::PaymentInput,
        ctx: &Context,
    ) -> Result<api::BookingFlow, Error> {
        let pending = ctx
            .service()
            .execute(command::SubmitPayment {
                flow_id: flow_id.into(),
                payment: payment.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        let service = ctx.service().clone();
        let completion = pending.completion;
        drop(tokio::spawn(
            async move {
                match service.execute(completion).await {
                    Ok(Some(_)) => {}
                    Ok(None) => log::debug!("payment outlived its flow"),
                    Err(e) => log::error!("failed to complete payment: {e}"),
                }
            }
            .in_current_span(),
        ));

        Ok(pending.flow.into())
    }

    /// Returns the `BookingFlow` from the `PAYMENT` stage back to the
    /// `DETAILS` stage, keeping the entered details.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BOOKING_FLOW_NOT_EXISTS` - the `BookingFlow` with the specified ID
    ///                               does not exist;
    /// - `WRONG_FLOW_STAGE` - the `BookingFlow` is not at the `PAYMENT`
    ///                        stage;
    /// - `PAYMENT_PROCESSING` - the payment is being processed.
    #[tracing::instrument(
        skip_all,
        fields(
            flow_id = %flow_id,
            gql.name = "returnToDetails",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn return_to_details(
        flow_id: api::flow::Id,
        ctx: &Context,
    ) -> Result<api::BookingFlow, Error> {
        ctx.service()
            .execute(command::ReturnToDetails {
                flow_id: flow_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Closes the `BookingFlow` at any stage, discarding everything entered
    /// in it.
    ///
    /// A payment being processed is not cancelled: once authorized, it still
    /// submits the `Booking`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BOOKING_FLOW_NOT_EXISTS` - the `BookingFlow` with the specified ID
    ///                               does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            flow_id = %flow_id,
            gql.name = "closeBookingFlow",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn close_booking_flow(
        flow_id: api::flow::Id,
        ctx: &Context,
    ) -> Result<api::flow::Id, Error> {
        ctx.service()
            .execute(command::CloseBookingFlow {
                flow_id: flow_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Approves the pending `Booking` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BOOKING_NOT_EXISTS` - the `Booking` with the specified ID does not
    ///                          exist;
    /// - `BOOKING_NOT_PENDING` - the `Booking` is resolved already.
    #[tracing::instrument(
        skip_all,
        fields(
            booking_id = %booking_id,
            gql.name = "approveBooking",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn approve_booking(
        booking_id: api::booking::Id,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        ctx.service()
            .execute(command::ApproveBooking {
                booking_id: booking_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Rejects the pending `Booking` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BOOKING_NOT_EXISTS` - the `Booking` with the specified ID does not
    ///                          exist;
    /// - `BOOKING_NOT_PENDING` - the `Booking` is resolved already.
    #[tracing::instrument(
        skip_all,
        fields(
            booking_id = %booking_id,
            gql.name = "rejectBooking",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn reject_booking(
        booking_id: api::booking::Id,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        ctx.service()
            .execute(command::RejectBooking {
                booking_id: booking_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Marks the confirmed `Booking` with the specified ID as took place.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BOOKING_NOT_EXISTS` - the `Booking` with the specified ID does not
    ///                          exist;
    /// - `BOOKING_NOT_CONFIRMED` - the `Booking` is not confirmed.
    #[tracing::instrument(
        skip_all,
        fields(
            booking_id = %booking_id,
            gql.name = "completeBooking",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn complete_booking(
        booking_id: api::booking::Id,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        ctx.service()
            .execute(command::CompleteBooking {
                booking_id: booking_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Marks the `Notification` with the specified ID as read.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOTIFICATION_NOT_EXISTS` - the `Notification` with the specified ID
    ///                               does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "markNotificationRead",
            notification_id = %notification_id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn mark_notification_read(
        notification_id: api::notification::Id,
        ctx: &Context,
    ) -> Result<api::Notification, Error> {
        ctx.service()
            .execute(command::MarkNotificationRead {
                notification_id: notification_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Marks every unread `Notification` as read, returning how many of them
    /// were marked.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "markAllNotificationsRead",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn mark_all_notifications_read(
        ctx: &Context,
    ) -> Result<i32, Error> {
        ctx.service()
            .execute(command::MarkAllNotificationsRead)
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|marked| i32::try_from(marked).unwrap_or(i32::MAX))
    }
}

define_error! {
    enum FlowError {
        #[code = "BOOKING_FLOW_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`BookingFlow` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum BookingError {
        #[code = "BOOKING_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Booking` with the specified ID does not exist"]
        NotExists,

        #[code = "BOOKING_NOT_PENDING"]
        #[status = CONFLICT]
        #[message = "`Booking` is resolved already"]
        NotPending,

        #[code = "BOOKING_NOT_CONFIRMED"]
        #[status = CONFLICT]
        #[message = "`Booking` is not confirmed"]
        NotConfirmed,
    }
}

define_error! {
    enum NotificationError {
        #[code = "NOTIFICATION_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Notification` with the specified ID does not exist"]
        NotExists,
    }
}

impl AsError for command::open_booking_flow::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "SPOT_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Spot` with the specified ID does not exist"]
                SpotNotExists,

                #[code = "SPOT_UNAVAILABLE"]
                #[status = CONFLICT]
                #[message = "`Spot` is not available for booking"]
                SpotUnavailable,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::SpotNotExists(_) => Some(Error::SpotNotExists.into()),
            Self::SpotUnavailable(_) => Some(Error::SpotUnavailable.into()),
        }
    }
}

impl AsError for command::submit_booking_details::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "SPOT_CLOSED"]
                #[status = BAD_REQUEST]
                #[message = "`Spot` is closed on the picked date"]
                SpotClosed,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::FlowNotExists(_) => Some(FlowError::NotExists.into()),
            Self::SpotClosed(_) => Some(Error::SpotClosed.into()),
            Self::SpotNotExists(_) => None,
            Self::Transition(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::submit_payment::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::FlowNotExists(_) => Some(FlowError::NotExists.into()),
            Self::Transition(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::return_to_details::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::FlowNotExists(_) => Some(FlowError::NotExists.into()),
            Self::Transition(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::close_booking_flow::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::FlowNotExists(_) => Some(FlowError::NotExists.into()),
        }
    }
}

impl AsError for command::approve_booking::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::BookingNotExists(_) => Some(BookingError::NotExists.into()),
            Self::Db(e) => e.try_as_error(),
            Self::NotPending(_) => Some(BookingError::NotPending.into()),
        }
    }
}

impl AsError for command::reject_booking::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::BookingNotExists(_) => Some(BookingError::NotExists.into()),
            Self::Db(e) => e.try_as_error(),
            Self::NotPending(_) => Some(BookingError::NotPending.into()),
        }
    }
}

impl AsError for command::complete_booking::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::BookingNotExists(_) => Some(BookingError::NotExists.into()),
            Self::Db(e) => e.try_as_error(),
            Self::NotConfirmed(_) => Some(BookingError::NotConfirmed.into()),
        }
    }
}

impl AsError for command::mark_notification_read::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::NotificationNotExists(_) => {
                Some(NotificationError::NotExists.into())
            }
        }
    }
}

#[cfg(test)]
mod spec {
    use service::{
        command::{
            approve_booking, complete_booking, mark_notification_read,
            open_booking_flow, submit_booking_details,
        },
        domain::{booking, notification, spot},
    };

    use crate::AsError as _;

    #[test]
    fn unknown_spot_is_not_found() {
        let err = open_booking_flow::ExecutionError::SpotNotExists(
            spot::Id::new("spot-404").unwrap(),
        )
        .into_error();

        assert_eq!(err.code, "SPOT_NOT_EXISTS");
        assert_eq!(err.status_code, http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn resolved_booking_conflicts() {
        let err = approve_booking::ExecutionError::NotPending(
            booking::NotPending(booking::Status::Cancelled),
        )
        .into_error();

        assert_eq!(err.code, "BOOKING_NOT_PENDING");
        assert_eq!(err.status_code, http::StatusCode::CONFLICT);
    }

    #[test]
    fn missing_spot_of_flow_is_internal() {
        let err = submit_booking_details::ExecutionError::SpotNotExists(
            spot::Id::new("spot-1").unwrap(),
        )
        .into_error();

        assert_eq!(err.code, "INTERNAL_SERVER_ERROR");
    }

    #[test]
    fn unconfirmed_booking_cannot_complete() {
        let err = complete_booking::ExecutionError::NotConfirmed(
            booking::NotConfirmed(booking::Status::Pending),
        )
        .into_error();

        assert_eq!(err.code, "BOOKING_NOT_CONFIRMED");
        assert_eq!(err.status_code, http::StatusCode::CONFLICT);
    }

    #[test]
    fn unknown_notification_is_not_found() {
        let err = mark_notification_read::ExecutionError::NotificationNotExists(
            notification::Id::new(),
        )
        .into_error();

        assert_eq!(err.code, "NOTIFICATION_NOT_EXISTS");
        assert_eq!(err.status_code, http::StatusCode::NOT_FOUND);
    }
}
