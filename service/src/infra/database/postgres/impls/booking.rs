//! [`Booking`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Insert, Lock, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{booking, car, user, Booking, Car},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

/// Builds a [`Booking`] out of a [`Row`] selecting all the `bookings`
/// columns.
fn from_row(row: &Row) -> Booking {
    Booking {
        id: row.get("id"),
        user_id: row.get("user_id"),
        car_id: row.get("car_id"),
        period: booking::Period::new(
            row.get("pickup_date"),
            row.get("return_date"),
        ),
        total_price: row.get("total_price"),
        status: row.get("status"),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Option<Booking>, booking::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Booking>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            SELECT id, user_id, car_id, \
                   pickup_date, return_date, \
                   total_price, status, created_at \
            FROM bookings \
            WHERE id = $1::UUID";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Select<By<Vec<read::booking::WithCar>, user::Id>>>
    for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<car::Id, Car>, Vec<car::Id>>>,
        Ok = HashMap<car::Id, Car>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<read::booking::WithCar>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<read::booking::WithCar>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let user_id = by.into_inner();

        const SQL: &str = "\
            SELECT id, user_id, car_id, \
                   pickup_date, return_date, \
                   total_price, status, created_at \
            FROM bookings \
            WHERE user_id = $1::UUID \
            ORDER BY created_at DESC, id DESC";
        let bookings = self
            .query(SQL, &[&user_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect::<Vec<_>>();

        let mut car_ids = bookings.iter().map(|b| b.car_id).collect::<Vec<_>>();
        car_ids.sort_unstable();
        car_ids.dedup();
        let cars = self
            .execute(Select(By::<HashMap<car::Id, Car>, _>::new(car_ids)))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(bookings
            .into_iter()
            .filter_map(|booking| {
                let car = cars.get(&booking.car_id)?.clone();
                Some(read::booking::WithCar { booking, car })
            })
            .collect())
    }
}

impl<C> Database<Insert<Booking>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Booking>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(booking): Insert<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(booking))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Booking>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(booking): Update<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        let Booking {
            id,
            user_id,
            car_id,
            period,
            total_price,
            status,
            created_at,
        } = booking;

        const SQL: &str = "\
            INSERT INTO bookings (\
                id, user_id, car_id, \
                pickup_date, return_date, \
                total_price, status, created_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::UUID, \
                $4::TIMESTAMPTZ, $5::TIMESTAMPTZ, \
                $6::NUMERIC, $7::INT2, $8::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET pickup_date = EXCLUDED.pickup_date, \
                return_date = EXCLUDED.return_date, \
                total_price = EXCLUDED.total_price, \
                status = EXCLUDED.status";
        self.exec(
            SQL,
            &[
                &id,
                &user_id,
                &car_id,
                &period.pickup(),
                &period.r#return(),
                &total_price,
                &status,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Booking, booking::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Booking, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: booking::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM bookings \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
