//! Infrastructure layer.

pub mod database;
pub mod payment;

pub use self::{
    database::{Database, InMemory},
    payment::{Gateway, Simulated},
};
