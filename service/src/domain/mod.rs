//! Domain definitions.

pub mod booking;
pub mod driver;
pub mod filter;
pub mod notification;
pub mod payment;
pub mod spot;

pub use self::{
    booking::Booking, notification::Notification, spot::Spot,
};
