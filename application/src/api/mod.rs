//! REST API definitions.

pub mod booking;
pub mod car;
pub mod user;

use axum::{
    routing::{get, patch, post},
    Router,
};

pub use self::{
    booking::{Booking, WithCar as BookingWithCar},
    car::Car,
    user::User,
};

/// Builds the REST API [`Router`].
///
/// Handlers expect a [`Service`] to be provided as an [`Extension`].
///
/// [`Extension`]: axum::Extension
/// [`Service`]: crate::Service
pub fn router() -> Router {
    Router::new()
        .route("/cars", get(car::list))
        .route("/cars/:id", get(car::get))
        .route("/cars/:id/quote", get(car::quote))
        .route("/bookings", get(booking::list).post(booking::create))
        .route("/bookings/:id/cancel", patch(booking::cancel))
        .route("/auth/register", post(user::register))
        .route("/auth/login", post(user::login))
        .route("/auth/me", get(user::me))
}
