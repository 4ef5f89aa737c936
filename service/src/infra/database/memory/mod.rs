//! In-memory [`Database`] implementation.

mod impls;

use std::{
    collections::HashMap,
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use derive_more::{Display, Error as StdError};
use tokio::sync::Mutex;
use tracerr::Traced;

#[cfg(doc)]
use crate::infra::Database;
use crate::{
    domain::{booking, Booking, Notification, Spot},
    infra::database,
};

/// In-memory [`Database`] keeping the ledger for the lifetime of the
/// process.
///
/// Clones share the same storage.
#[derive(Clone, Debug, Default)]
pub struct InMemory(Arc<Storage>);

impl InMemory {
    /// Creates a new [`InMemory`] database serving the provided [`Spot`]
    /// catalog.
    #[must_use]
    pub fn new(catalog: Vec<Spot>) -> Self {
        Self(Arc::new(Storage {
            catalog,
            ..Storage::default()
        }))
    }
}

/// Storage of an [`InMemory`] database.
#[derive(Debug, Default)]
struct Storage {
    /// [`Spot`] catalog, never mutated.
    catalog: Vec<Spot>,

    /// Open [`booking::Flow`]s, each behind its own lock, until closed or
    /// evicted as stale.
    flows: RwLock<HashMap<booking::flow::Id, Arc<Mutex<booking::Flow>>>>,

    /// Submitted [`Booking`]s, in submission order, each behind its own
    /// lock.
    bookings: RwLock<Vec<(booking::Id, Arc<Mutex<Booking>>)>>,

    /// [`Notification`]s of the owner's inbox, in creation order.
    notifications: RwLock<Vec<Notification>>,
}

/// Acquires a read access to the provided `table`.
fn read<T>(
    table: &RwLock<T>,
) -> Result<RwLockReadGuard<'_, T>, Traced<database::Error>> {
    table
        .read()
        .map_err(|_| tracerr::new!(Error::Poisoned))
        .map_err(tracerr::map_from)
}

/// Acquires a write access to the provided `table`.
fn write<T>(
    table: &RwLock<T>,
) -> Result<RwLockWriteGuard<'_, T>, Traced<database::Error>> {
    table
        .write()
        .map_err(|_| tracerr::new!(Error::Poisoned))
        .map_err(tracerr::map_from)
}

/// [`InMemory`] database error.
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// Some thread panicked while modifying a table.
    #[display("Table is poisoned by a panicked thread")]
    Poisoned,
}
