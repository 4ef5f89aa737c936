//! Marker types.

/// Marker type describing an entity submission.
#[derive(Clone, Copy, Debug)]
pub struct Submission;

/// Marker type describing an expiration.
#[derive(Clone, Copy, Debug)]
pub struct Expiration;

/// Marker type describing the last activity of an entity.
#[derive(Clone, Copy, Debug)]
pub struct Activity;

/// Marker type describing an entity creation.
#[derive(Clone, Copy, Debug)]
pub struct Creation;
