//! Payment [`Gateway`] implementations.

pub mod simulated;

use derive_more::{Display, Error as StdError};

#[cfg(doc)]
use crate::domain::payment;

pub use self::simulated::Simulated;

/// Payment gateway operation.
///
/// Authorizes a [`payment::Charge`] into a [`payment::Outcome`]. A declined
/// payment is a successful [`payment::Outcome`], while an [`Error`] means the
/// gateway couldn't decide at all.
pub use common::Handler as Gateway;

/// [`Gateway`] error.
#[derive(Debug, Display, StdError)]
pub enum Error {
    /// [`Gateway`] is unreachable.
    #[display("Payment gateway is unavailable: {_0}")]
    Unavailable(#[error(not(source))] String),
}
