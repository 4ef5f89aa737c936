//! [`Command`] definition.

pub mod approve_booking;
pub mod authorize_session;
pub mod close_booking_flow;
pub mod complete_booking;
pub mod complete_payment;
pub mod mark_all_notifications_read;
pub mod mark_notification_read;
pub mod open_booking_flow;
pub mod reject_booking;
pub mod return_to_details;
pub mod submit_booking_details;
pub mod submit_payment;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    approve_booking::ApproveBooking, authorize_session::AuthorizeSession,
    close_booking_flow::CloseBookingFlow, complete_booking::CompleteBooking,
    complete_payment::CompletePayment,
    mark_all_notifications_read::MarkAllNotificationsRead,
    mark_notification_read::MarkNotificationRead,
    open_booking_flow::OpenBookingFlow, reject_booking::RejectBooking,
    return_to_details::ReturnToDetails,
    submit_booking_details::SubmitBookingDetails,
    submit_payment::SubmitPayment,
};
