//! [`Command`] definition.

pub mod authorize_user_session;
pub mod cancel_booking;
pub mod create_booking;
pub mod create_car;
pub mod create_user;
pub mod create_user_session;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    authorize_user_session::AuthorizeUserSession,
    cancel_booking::CancelBooking, create_booking::CreateBooking,
    create_car::CreateCar, create_user::CreateUser,
    create_user_session::CreateUserSession,
};
