//! In-memory [`Database`] implementation.

use std::{collections::HashMap, sync::Arc};

use common::operations::{By, Commit, Insert, Lock, Select, Transact, Update};
use tokio::sync::RwLock;
use tracerr::Traced;

use crate::{
    domain::{booking, car, user, Booking, Car, User},
    infra::{database, Database},
    read,
};

/// In-memory [`Database`] client.
///
/// Its transactions are not isolated: every write is visible immediately,
/// and nothing is rolled back. [`Lock`]s and [`Commit`]s are no-ops.
#[derive(Clone, Debug, Default)]
pub struct Memory(Arc<RwLock<State>>);

/// Data stored in a [`Memory`] database.
#[derive(Debug, Default)]
struct State {
    /// Stored [`Car`]s.
    cars: HashMap<car::Id, Car>,

    /// Stored [`Booking`]s.
    bookings: HashMap<booking::Id, Booking>,

    /// Stored [`User`]s.
    users: HashMap<user::Id, User>,
}

impl Database<Transact> for Memory {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(self.clone())
    }
}

impl Database<Commit> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl Database<Lock<By<Car, car::Id>>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Lock<By<Car, car::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl Database<Lock<By<Booking, booking::Id>>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Lock<By<Booking, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl Database<Select<By<Option<Car>, car::Id>>> for Memory {
    type Ok = Option<Car>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Car>, car::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.0.read().await.cars.get(by.as_inner()).cloned())
    }
}

impl Database<Select<By<Option<Car>, read::car::Listing>>> for Memory {
    type Ok = Option<Car>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Car>, read::car::Listing>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::car::Listing { name, location } = by.into_inner();
        Ok(self
            .0
            .read()
            .await
            .cars
            .values()
            .filter(|c| c.name == name && c.location == location)
            .min_by_key(|c| (c.created_at, c.id))
            .cloned())
    }
}

impl Database<Select<By<Vec<Car>, read::car::list::Filter>>> for Memory {
    type Ok = Vec<Car>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Car>, read::car::list::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let filter = by.into_inner();
        let mut cars = self
            .0
            .read()
            .await
            .cars
            .values()
            .filter(|car| filter.matches(car))
            .cloned()
            .collect::<Vec<_>>();
        cars.sort_by_key(|c| (c.created_at, c.id));
        Ok(cars)
    }
}

impl Database<Insert<Car>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(car): Insert<Car>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.0.write().await.cars.insert(car.id, car));
        Ok(())
    }
}

impl Database<Update<Car>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(car): Update<Car>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Insert(car)).await
    }
}

impl Database<Select<By<Option<Booking>, booking::Id>>> for Memory {
    type Ok = Option<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Booking>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.0.read().await.bookings.get(by.as_inner()).cloned())
    }
}

impl Database<Select<By<Vec<read::booking::WithCar>, user::Id>>> for Memory {
    type Ok = Vec<read::booking::WithCar>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<read::booking::WithCar>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let user_id = by.into_inner();
        let state = self.0.read().await;
        let mut bookings = state
            .bookings
            .values()
            .filter(|b| b.user_id == user_id)
            .filter_map(|b| {
                Some(read::booking::WithCar {
                    booking: b.clone(),
                    car: state.cars.get(&b.car_id)?.clone(),
                })
            })
            .collect::<Vec<_>>();
        bookings.sort_by(|a, b| {
            (b.booking.created_at, b.booking.id)
                .cmp(&(a.booking.created_at, a.booking.id))
        });
        Ok(bookings)
    }
}

impl Database<Insert<Booking>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(booking): Insert<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.0.write().await.bookings.insert(booking.id, booking));
        Ok(())
    }
}

impl Database<Update<Booking>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(booking): Update<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Insert(booking)).await
    }
}

impl Database<Select<By<Option<User>, user::Id>>> for Memory {
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.0.read().await.users.get(by.as_inner()).cloned())
    }
}

impl<'l> Database<Select<By<Option<User>, &'l user::Email>>> for Memory {
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, &'l user::Email>>,
    ) -> Result<Self::Ok, Self::Err> {
        let email = by.into_inner();
        Ok(self
            .0
            .read()
            .await
            .users
            .values()
            .find(|u| &u.email == email)
            .cloned())
    }
}

impl Database<Insert<User>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(user): Insert<User>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.0.write().await.users.insert(user.id, user));
        Ok(())
    }
}
