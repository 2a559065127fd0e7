//! [`Command`] for creating a new [`Booking`].

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted, Update},
    DateTime, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{booking, car, user, Booking, Car},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Booking`].
///
/// The booked [`Car`] becomes unavailable until the [`Booking`] is
/// cancelled.
#[derive(Clone, Copy, Debug)]
pub struct CreateBooking {
    /// ID of the [`User`] who books the [`Car`].
    ///
    /// [`User`]: crate::domain::User
    pub user_id: user::Id,

    /// ID of the [`Car`] to be booked.
    pub car_id: car::Id,

    /// [`booking::Period`] of a new [`Booking`].
    pub period: booking::Period,

    /// Total price of a new [`Booking`].
    pub total_price: Money,
}

impl<Db> Command<CreateBooking> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Car, car::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Car>, car::Id>>,
            Ok = Option<Car>,
            Err = Traced<database::Error>,
        > + Database<Insert<Booking>, Ok = (), Err = Traced<database::Error>>
        + Database<Update<Car>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Booking;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateBooking) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateBooking {
            user_id,
            car_id,
            period,
            total_price,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent bookings of the same `Car`.
        tx.execute(Lock(By::new(car_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut car = tx
            .execute(Select(By::<Option<Car>, _>::new(car_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|c| c.is_available)
            .ok_or(E::CarNotAvailable(car_id))
            .map_err(tracerr::wrap!())?;

        let booking = Booking {
            id: booking::Id::new(),
            user_id,
            car_id,
            period,
            total_price,
            status: booking::Status::Pending,
            created_at: DateTime::now().coerce(),
        };
        tx.execute(Insert(booking.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        car.is_available = false;
        tx.execute(Update(car))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tracing::info!(
            booking_id = %booking.id,
            %car_id,
            %user_id,
            "car booked",
        );

        Ok(booking)
    }
}

/// Error of [`CreateBooking`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Car`] doesn't exist or is already booked.
    #[display("`Car(id: {_0})` is not available")]
    #[from(ignore)]
    CarNotAvailable(#[error(not(source))] car::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),
}

#[cfg(test)]
mod spec {
    use common::{DateTime, Money};

    use crate::{
        domain::{booking, car},
        query, test_support, Command as _, Query as _,
    };

    use super::{CreateBooking, ExecutionError};

    fn period(from: &str, to: &str) -> booking::Period {
        booking::Period::new(
            DateTime::from_rfc3339(from).unwrap().coerce(),
            DateTime::from_rfc3339(to).unwrap().coerce(),
        )
    }

    #[tokio::test]
    async fn books_available_car() {
        let svc = test_support::service();
        let user = test_support::create_user(&svc, "jane@example.com").await;
        let car = test_support::create_car(
            &svc,
            "Tesla Model 3",
            car::Kind::Sedan,
            "San Francisco",
            "50",
        )
        .await;

        let booking = svc
            .execute(CreateBooking {
                user_id: user.id,
                car_id: car.id,
                period: period("2024-05-01T10:00:00Z", "2024-05-04T10:00:00Z"),
                total_price: "150".parse().unwrap(),
            })
            .await
            .unwrap();

        assert_eq!(booking.status, booking::Status::Pending);
        assert_eq!(booking.user_id, user.id);
        assert_eq!(booking.car_id, car.id);
        assert_eq!(booking.total_price, "150".parse::<Money>().unwrap());
        assert!(!test_support::car(&svc, car.id).await.is_available);
    }

    #[tokio::test]
    async fn books_inverted_period_as_is() {
        let svc = test_support::service();
        let user = test_support::create_user(&svc, "jane@example.com").await;
        let car = test_support::create_car(
            &svc,
            "Honda Fit",
            car::Kind::Compact,
            "Chicago",
            "30",
        )
        .await;
        let inverted = period("2024-05-04T10:00:00Z", "2024-05-01T10:00:00Z");

        let booking = svc
            .execute(CreateBooking {
                user_id: user.id,
                car_id: car.id,
                period: inverted,
                total_price: "30".parse().unwrap(),
            })
            .await
            .unwrap();

        assert_eq!(booking.period, inverted);
        assert_eq!(booking.status, booking::Status::Pending);
        assert!(!test_support::car(&svc, car.id).await.is_available);
    }

    #[tokio::test]
    async fn fails_on_booked_car() {
        let svc = test_support::service();
        let first = test_support::create_user(&svc, "first@example.com").await;
        let second =
            test_support::create_user(&svc, "second@example.com").await;
        let car = test_support::create_car(
            &svc,
            "Range Rover",
            car::Kind::Suv,
            "Denver",
            "120",
        )
        .await;
        let cmd = |user_id| CreateBooking {
            user_id,
            car_id: car.id,
            period: period("2024-05-01T10:00:00Z", "2024-05-02T10:00:00Z"),
            total_price: "120".parse().unwrap(),
        };

        drop(svc.execute(cmd(first.id)).await.unwrap());
        let err = svc.execute(cmd(second.id)).await.unwrap_err();

        assert!(
            matches!(
                err.as_ref(),
                ExecutionError::CarNotAvailable(id) if *id == car.id,
            ),
            "unexpected error: {err}",
        );
        assert!(
            svc.execute(query::bookings::ByUser::by(second.id))
                .await
                .unwrap()
                .is_empty(),
            "no booking must be created",
        );
    }

    #[tokio::test]
    async fn fails_on_missing_car() {
        let svc = test_support::service();
        let user = test_support::create_user(&svc, "jane@example.com").await;

        let err = svc
            .execute(CreateBooking {
                user_id: user.id,
                car_id: car::Id::new(),
                period: period("2024-05-01T10:00:00Z", "2024-05-02T10:00:00Z"),
                total_price: "10".parse().unwrap(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::CarNotAvailable(_)));
        assert!(svc
            .execute(query::bookings::ByUser::by(user.id))
            .await
            .unwrap()
            .is_empty());
    }
}
