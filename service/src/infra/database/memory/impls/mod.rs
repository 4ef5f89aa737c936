//! [`InMemory`] database implementations.

#[cfg(doc)]
use super::InMemory;

mod booking;
mod flow;
mod notification;
mod spot;
