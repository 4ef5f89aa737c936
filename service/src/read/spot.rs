//! [`Spot`]-related read definitions.

#[cfg(doc)]
use crate::domain::Spot;

/// Selector of the whole [`Spot`] catalog, in its original order.
#[derive(Clone, Copy, Debug, Default)]
pub struct Catalog;
