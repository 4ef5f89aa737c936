//! Driver identity definitions.
//!
//! Drivers are registered by an external identity provider, so only their IDs
//! and [`Session`]s are known here.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// ID of a driver.
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
pub struct Id(Uuid);

/// Driver session issued by the identity provider.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct Session {
    /// ID of the driver this [`Session`] belongs to.
    #[serde(rename = "sub")]
    pub driver_id: Id,

    /// [`DateTime`] when this [`Session`] expires.
    #[serde(rename = "exp", with = "common::datetime::serde::unix_timestamp")]
    pub expires_at: ExpirationDateTime,
}

/// Access token of a [`Session`].
///
/// Opaque until decoded, so any string is a [`Token`].
#[derive(AsRef, Clone, Debug, Display, From, FromStr)]
#[as_ref(str)]
pub struct Token(String);

/// [`DateTime`] of a [`Session`] expiration.
pub type ExpirationDateTime = DateTimeOf<(Session, unit::Expiration)>;
