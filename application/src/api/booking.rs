//! [`Booking`]-related REST API definitions.

use axum::{
    extract::{rejection::JsonRejection, Path},
    http::StatusCode,
    Extension, Json,
};
use common::{DateTime, Money};
use serde::{Deserialize, Serialize};
use service::{
    command::{self, Command as _},
    domain::{self, booking, car, user},
    query, read, Query as _,
};

use crate::{api, define_error, AsError, Error, Service, Session};

/// Booking of a [`api::Car`].
#[derive(Clone, Debug, Serialize)]
pub struct Booking {
    /// ID of this [`Booking`].
    pub id: booking::Id,

    /// ID of the user owning this [`Booking`].
    pub user_id: user::Id,

    /// ID of the booked [`api::Car`].
    pub car_id: car::Id,

    /// [`DateTime`] of the pickup.
    pub pickup_date: DateTime,

    /// [`DateTime`] of the return.
    pub return_date: DateTime,

    /// Total price of this [`Booking`].
    pub total_price: Money,

    /// Status of this [`Booking`].
    pub status: booking::Status,

    /// [`DateTime`] when this [`Booking`] was created.
    pub created_at: DateTime,
}

impl From<domain::Booking> for Booking {
    fn from(booking: domain::Booking) -> Self {
        let domain::Booking {
            id,
            user_id,
            car_id,
            period,
            total_price,
            status,
            created_at,
        } = booking;

        Self {
            id,
            user_id,
            car_id,
            pickup_date: period.pickup().coerce(),
            return_date: period.r#return().coerce(),
            total_price,
            status,
            created_at: created_at.coerce(),
        }
    }
}

/// [`Booking`] along with its booked [`api::Car`].
#[derive(Clone, Debug, Serialize)]
pub struct WithCar {
    /// [`Booking`] itself.
    #[serde(flatten)]
    pub booking: Booking,

    /// Booked [`api::Car`].
    pub car: api::Car,
}

impl From<read::booking::WithCar> for WithCar {
    fn from(with: read::booking::WithCar) -> Self {
        let read::booking::WithCar { booking, car } = with;
        Self {
            booking: booking.into(),
            car: car.into(),
        }
    }
}

/// Lists [`Booking`]s of the current [`Session`], the most recent first.
///
/// # Errors
///
/// If the [`Service`] fails.
#[tracing::instrument(skip_all, fields(user_id = %session.user_id))]
pub async fn list(
    session: Session,
    Extension(service): Extension<Service>,
) -> Result<Json<Vec<WithCar>>, Error> {
    Ok(Json(
        service
            .execute(query::bookings::ByUser::by(session.user_id))
            .await
            .map_err(AsError::into_error)?
            .into_iter()
            .map(WithCar::from)
            .collect(),
    ))
}

/// Request body of the [`create`] handler.
#[derive(Clone, Debug, Deserialize)]
pub struct CreateRequest {
    /// ID of the [`api::Car`] to book.
    pub car_id: car::Id,

    /// [`DateTime`] of the pickup.
    pub pickup_date: DateTime,

    /// [`DateTime`] of the return.
    ///
    /// May precede the `pickup_date`.
    pub return_date: DateTime,

    /// Total price of a new [`Booking`].
    pub total_price: Money,
}

/// Books a [`api::Car`] for the current [`Session`].
///
/// # Errors
///
/// If the [`api::Car`] is not available, or the [`Service`] fails.
#[tracing::instrument(skip_all, fields(user_id = %session.user_id))]
pub async fn create(
    session: Session,
    Extension(service): Extension<Service>,
    req: Result<Json<CreateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Booking>), Error> {
    let Json(CreateRequest {
        car_id,
        pickup_date,
        return_date,
        total_price,
    }) = req.map_err(AsError::into_error)?;
    let period =
        booking::Period::new(pickup_date.coerce(), return_date.coerce());

    let booking = service
        .execute(command::CreateBooking {
            user_id: session.user_id,
            car_id,
            period,
            total_price,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok((StatusCode::CREATED, Json(booking.into())))
}

/// Cancels the [`Booking`] with the provided ID owned by the current
/// [`Session`].
///
/// # Errors
///
/// If the [`Booking`] doesn't exist, is already cancelled, or the [`Service`]
/// fails.
#[tracing::instrument(skip_all, fields(user_id = %session.user_id, %id))]
pub async fn cancel(
    session: Session,
    Extension(service): Extension<Service>,
    Path(id): Path<String>,
) -> Result<Json<Booking>, Error> {
    let Ok(booking_id) = id.parse() else {
        return Err(BookingError::NotFound.into());
    };

    Ok(Json(
        service
            .execute(command::CancelBooking {
                user_id: session.user_id,
                booking_id,
            })
            .await
            .map_err(AsError::into_error)?
            .into(),
    ))
}

define_error! {
    enum BookingError {
        #[code = "BOOKING_NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "Booking not found"]
        NotFound,

        #[code = "BOOKING_ALREADY_CANCELLED"]
        #[status = BAD_REQUEST]
        #[message = "Booking already cancelled"]
        AlreadyCancelled,
    }
}

impl AsError for command::create_booking::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "CAR_NOT_AVAILABLE"]
                #[status = BAD_REQUEST]
                #[message = "Car not available"]
                CarNotAvailable,
            }
        }

        match self {
            Self::CarNotAvailable(_) => Some(Error::CarNotAvailable.into()),
            Self::Db(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::cancel_booking::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::BookingAlreadyCancelled(_) => {
                BookingError::AlreadyCancelled.into()
            }
            Self::BookingNotExists(_) => BookingError::NotFound.into(),
            Self::Db(e) => return e.try_as_error(),
        })
    }
}

#[cfg(test)]
mod spec {
    use common::DateTime;
    use service::{
        command::{cancel_booking, create_booking},
        domain::{self, booking, car, user},
    };

    use crate::AsError as _;

    use super::Booking;

    #[test]
    fn maps_command_errors() {
        let err =
            create_booking::ExecutionError::CarNotAvailable(car::Id::new())
                .as_error();
        assert_eq!(err.code, "CAR_NOT_AVAILABLE");
        assert_eq!(err.message, "Car not available");
        assert_eq!(err.status_code, http::StatusCode::BAD_REQUEST);

        let err = cancel_booking::ExecutionError::BookingNotExists(
            booking::Id::new(),
        )
        .as_error();
        assert_eq!(err.code, "BOOKING_NOT_FOUND");
        assert_eq!(err.status_code, http::StatusCode::NOT_FOUND);

        let err = cancel_booking::ExecutionError::BookingAlreadyCancelled(
            booking::Id::new(),
        )
        .as_error();
        assert_eq!(err.code, "BOOKING_ALREADY_CANCELLED");
        assert_eq!(err.status_code, http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn serializes_wire_shape() {
        let at = |s| DateTime::from_rfc3339(s).unwrap();
        let booking = Booking::from(domain::Booking {
            id: booking::Id::new(),
            user_id: user::Id::new(),
            car_id: car::Id::new(),
            period: booking::Period::new(
                at("2024-05-01T10:00:00Z").coerce(),
                at("2024-05-04T10:00:00Z").coerce(),
            ),
            total_price: "150".parse().unwrap(),
            status: booking::Status::Pending,
            created_at: at("2024-04-30T08:00:00Z").coerce(),
        });

        let json = serde_json::to_value(&booking).unwrap();

        assert_eq!(json["pickup_date"], "2024-05-01T10:00:00Z");
        assert_eq!(json["return_date"], "2024-05-04T10:00:00Z");
        assert_eq!(json["total_price"], 150.0);
        assert_eq!(json["status"], "pending");
    }
}
