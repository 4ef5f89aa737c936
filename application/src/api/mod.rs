//! GraphQL API definitions.

pub mod booking;
pub mod earnings;
pub mod flow;
mod mutation;
pub mod notification;
mod query;
pub mod spot;

use juniper::EmptySubscription;

use crate::Context;

pub use self::{
    booking::Booking, flow::BookingFlow, mutation::Mutation,
    notification::Notification, query::Query, spot::Spot,
};

/// GraphQL schema.
pub type Schema =
    juniper::RootNode<'static, Query, Mutation, EmptySubscription<Context>>;

/// Creates a new [`Schema`].
#[must_use]
pub fn schema() -> Schema {
    Schema::new(Query, Mutation, EmptySubscription::new())
}
