//! [`Handler`] abstractions.

use std::future::Future;

/// Asynchronous handler of an operation described by `Args`.
///
/// Commands, queries, database operations and payment authorizations are all
/// expressed as [`Handler`]s of different argument types.
pub trait Handler<Args = ()> {
    /// Type of successful [`Handler`] result.
    type Ok;

    /// Type of this [`Handler`] error.
    type Err;

    /// Executes this [`Handler`] with the provided `args`.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}
