//! [`Query`] collection related to a single booking [`Flow`].

use common::operations::By;

use crate::domain::booking::{flow, Flow};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a snapshot of a [`Flow`] by its [`flow::Id`].
pub type ById = DatabaseQuery<By<Option<Flow>, flow::Id>>;
