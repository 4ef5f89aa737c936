//! [`Database`]-related implementations.

pub mod memory;

use derive_more::{Display, Error as StdError, From};

pub use self::memory::InMemory;

/// Database operation.
pub use common::Handler as Database;

/// Exclusive access to a `T` value stored in a [`Database`].
///
/// Other [`Lock`]s of the same value wait until this one is dropped.
///
/// [`Lock`]: common::operations::Lock
pub type Locked<T> = tokio::sync::OwnedMutexGuard<T>;

/// [`Database`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// [`InMemory`] error.
    #[display("`InMemory` database error: {_0}")]
    InMemory(memory::Error),
}
