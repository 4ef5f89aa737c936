//! Read entities definitions.

pub mod booking;
pub mod earnings;
pub mod notification;
pub mod spot;
