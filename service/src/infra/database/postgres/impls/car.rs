//! [`Car`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Insert, Lock, Select, Update};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{car, Car},
    infra::{
        database::{
            self,
            postgres::{Connection, LikePattern},
            Postgres,
        },
        Database,
    },
    read,
};

/// Columns of the `cars` table, in the order [`from_row()`] expects.
const COLUMNS: &str = "\
    id, name, kind, price, location, image_url, \
    is_available, description, features, created_at";

/// Builds a [`Car`] out of a [`Row`] selecting all the [`COLUMNS`].
pub(super) fn from_row(row: &Row) -> Car {
    Car {
        id: row.get("id"),
        name: row.get("name"),
        kind: row.get("kind"),
        price: row.get("price"),
        location: row.get("location"),
        image_url: row.get("image_url"),
        is_available: row.get("is_available"),
        description: row.get("description"),
        features: row.get("features"),
        created_at: row.get("created_at"),
    }
}

impl<C, IDs> Database<Select<By<HashMap<car::Id, Car>, IDs>>> for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[car::Id]>,
{
    type Ok = HashMap<car::Id, Car>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<car::Id, Car>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[car::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM cars \
             WHERE id = ANY($1::UUID[])",
        );
        Ok(self
            .query(&sql, &[&ids])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| {
                let car = from_row(row);
                (car.id, car)
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Car>, car::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<car::Id, Car>, [car::Id; 1]>>,
        Ok = HashMap<car::Id, Car>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Car>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Car>, car::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Select<By<Option<Car>, read::car::Listing>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Car>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Car>, read::car::Listing>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::car::Listing { name, location } = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM cars \
             WHERE name = $1::VARCHAR \
               AND location = $2::VARCHAR \
             ORDER BY created_at ASC, id ASC \
             LIMIT 1",
        );
        Ok(self
            .query_opt(&sql, &[&name, &location])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Select<By<Vec<Car>, read::car::list::Filter>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Car>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Car>, read::car::list::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::car::list::Filter {
            location,
            kind,
            max_price,
        } = by.into_inner();

        let location = location.as_deref().map(LikePattern::containing);

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![];
        let mut conditions = vec!["is_available".to_owned()];
        if let Some(pattern) = &location {
            ps.push(pattern);
            conditions.push(format!("location ILIKE ${}::VARCHAR", ps.len()));
        }
        if let Some(kind) = &kind {
            ps.push(kind);
            conditions.push(format!("kind = ${}::INT2", ps.len()));
        }
        if let Some(max_price) = &max_price {
            ps.push(max_price);
            conditions.push(format!("price <= ${}::NUMERIC", ps.len()));
        }

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM cars \
             WHERE {conditions} \
             ORDER BY created_at ASC, id ASC",
            conditions = conditions.iter().format(" AND "),
        );
        Ok(self
            .query(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Insert<Car>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Car>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(car): Insert<Car>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(car)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Car>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(car): Update<Car>,
    ) -> Result<Self::Ok, Self::Err> {
        let Car {
            id,
            name,
            kind,
            price,
            location,
            image_url,
            is_available,
            description,
            features,
            created_at,
        } = car;

        const SQL: &str = "\
            INSERT INTO cars (\
                id, name, kind, price, location, image_url, \
                is_available, description, features, created_at\
            ) \
            VALUES (\
                $1::UUID, $2::VARCHAR, $3::INT2, $4::NUMERIC, \
                $5::VARCHAR, $6::VARCHAR, \
                $7::BOOLEAN, $8::TEXT, $9::TEXT[], $10::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET name = EXCLUDED.name, \
                kind = EXCLUDED.kind, \
                price = EXCLUDED.price, \
                location = EXCLUDED.location, \
                image_url = EXCLUDED.image_url, \
                is_available = EXCLUDED.is_available, \
                description = EXCLUDED.description, \
                features = EXCLUDED.features";
        self.exec(
            SQL,
            &[
                &id,
                &name,
                &kind,
                &price,
                &location,
                &image_url,
                &is_available,
                &description,
                &features,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Car, car::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Car, car::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: car::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM cars \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
