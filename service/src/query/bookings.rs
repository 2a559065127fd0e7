//! [`Query`] collection related to the multiple [`Booking`]s.

use common::operations::By;

#[cfg(doc)]
use crate::{domain::Booking, Query};
use crate::{domain::user, read};

use super::DatabaseQuery;

/// Queries all the [`Booking`]s of a [`User`] joined with their [`Car`]s,
/// the most recently created first.
///
/// [`Car`]: crate::domain::Car
/// [`User`]: crate::domain::User
pub type ByUser = DatabaseQuery<By<Vec<read::booking::WithCar>, user::Id>>;

#[cfg(test)]
mod spec {
    use common::{operations::Insert, DateTime, Money};

    use crate::{
        command::{self, cancel_booking, create_booking},
        domain::{booking, car, Booking},
        infra::Database as _,
        query, read, test_support, Command as _, Query as _,
    };

    fn period(from: &str, to: &str) -> booking::Period {
        booking::Period::new(
            DateTime::from_rfc3339(from).unwrap().coerce(),
            DateTime::from_rfc3339(to).unwrap().coerce(),
        )
    }

    #[tokio::test]
    async fn lists_most_recent_first() {
        let svc = test_support::service();
        let user = test_support::create_user(&svc, "jane@example.com").await;
        let first =
            test_support::create_car(&svc, "Car A", car::Kind::Sedan, "NY", "10")
                .await;
        let second =
            test_support::create_car(&svc, "Car B", car::Kind::Suv, "NY", "20")
                .await;
        let at = |s| DateTime::from_rfc3339(s).unwrap();
        for (car, created_at) in [
            (&second, at("2024-04-30T09:00:00Z")),
            (&first, at("2024-04-29T09:00:00Z")),
        ] {
            svc.database()
                .execute(Insert(Booking {
                    id: booking::Id::new(),
                    user_id: user.id,
                    car_id: car.id,
                    period: period(
                        "2024-05-01T10:00:00Z",
                        "2024-05-02T10:00:00Z",
                    ),
                    total_price: car.price,
                    status: booking::Status::Pending,
                    created_at: created_at.coerce(),
                }))
                .await
                .unwrap();
        }

        let bookings = svc
            .execute(query::bookings::ByUser::by(user.id))
            .await
            .unwrap();

        assert_eq!(
            bookings.iter().map(|b| b.car.id).collect::<Vec<_>>(),
            [second.id, first.id],
        );
    }

    #[tokio::test]
    async fn rental_lifecycle() {
        let svc = test_support::service();
        let car = test_support::create_car(
            &svc,
            "Tesla Model 3",
            car::Kind::Sedan,
            "San Francisco",
            "50",
        )
        .await;
        let renter = test_support::create_user(&svc, "u1@example.com").await;
        let other = test_support::create_user(&svc, "u2@example.com").await;
        let period = period("2024-05-01T10:00:00Z", "2024-05-04T10:00:00Z");

        let quote = car.quote(&period).unwrap();
        assert_eq!(quote.days, 3);
        assert_eq!(quote.total_price, "150".parse::<Money>().unwrap());

        let booking = svc
            .execute(command::CreateBooking {
                user_id: renter.id,
                car_id: car.id,
                period,
                total_price: quote.total_price,
            })
            .await
            .unwrap();
        let available = svc
            .execute(query::cars::List::by(read::car::list::Filter::default()))
            .await
            .unwrap();
        assert!(available.iter().all(|c| c.id != car.id));

        let err = svc
            .execute(command::CreateBooking {
                user_id: other.id,
                car_id: car.id,
                period,
                total_price: quote.total_price,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            create_booking::ExecutionError::CarNotAvailable(_),
        ));

        let cancelled = svc
            .execute(command::CancelBooking {
                user_id: renter.id,
                booking_id: booking.id,
            })
            .await
            .unwrap();
        assert_eq!(cancelled.status, booking::Status::Cancelled);
        assert!(test_support::car(&svc, car.id).await.is_available);

        let err = svc
            .execute(command::CancelBooking {
                user_id: renter.id,
                booking_id: booking.id,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            cancel_booking::ExecutionError::BookingAlreadyCancelled(_),
        ));

        let history = svc
            .execute(query::bookings::ByUser::by(renter.id))
            .await
            .unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].booking.status, booking::Status::Cancelled);
    }
}
