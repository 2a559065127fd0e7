//! Marker types.

/// Marker type describing an entity creation.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Marker type describing a moment something expires.
#[derive(Clone, Copy, Debug)]
pub struct Expiration;

/// Marker type describing a moment something is picked up.
#[derive(Clone, Copy, Debug)]
pub struct Pickup;

/// Marker type describing a moment something is returned.
#[derive(Clone, Copy, Debug)]
pub struct Return;
