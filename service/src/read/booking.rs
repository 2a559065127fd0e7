//! [`Booking`] read model definition.

use crate::domain::{Booking, Car};

/// [`Booking`] joined with the booked [`Car`].
#[derive(Clone, Debug)]
pub struct WithCar {
    /// [`Booking`] itself.
    pub booking: Booking,

    /// [`Car`] referenced by the [`Booking`].
    pub car: Car,
}
