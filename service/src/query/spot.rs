//! [`Query`] collection related to a single [`Spot`].

use common::operations::By;

use crate::domain::{spot, Spot};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Spot`] by its [`spot::Id`].
pub type ById = DatabaseQuery<By<Option<Spot>, spot::Id>>;
