//! [`Command`] for creating a new [`Car`].

use common::{operations::Insert, DateTime, Money};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::car::{Description, Feature, ImageUrl, Kind, Location, Name};
use crate::{
    domain::{car, Car},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new available [`Car`].
#[derive(Clone, Debug)]
pub struct CreateCar {
    /// [`Name`] of a new [`Car`].
    pub name: car::Name,

    /// [`Kind`] of a new [`Car`].
    pub kind: car::Kind,

    /// Price of a single rental day of a new [`Car`].
    pub price: Money,

    /// [`Location`] of a new [`Car`].
    pub location: car::Location,

    /// [`ImageUrl`] of a new [`Car`].
    pub image_url: car::ImageUrl,

    /// [`Description`] of a new [`Car`].
    pub description: car::Description,

    /// [`Feature`]s of a new [`Car`].
    pub features: Vec<car::Feature>,
}

impl<Db> Command<CreateCar> for Service<Db>
where
    Db: Database<Insert<Car>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Car;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateCar) -> Result<Self::Ok, Self::Err> {
        let CreateCar {
            name,
            kind,
            price,
            location,
            image_url,
            description,
            features,
        } = cmd;

        let car = Car {
            id: car::Id::new(),
            name,
            kind,
            price,
            location,
            image_url,
            is_available: true,
            description,
            features,
            created_at: DateTime::now().coerce(),
        };

        self.database()
            .execute(Insert(car.clone()))
            .await
            .map_err(tracerr::wrap!())?;

        tracing::debug!(car_id = %car.id, name = %car.name, "car created");

        Ok(car)
    }
}

/// Error of [`CreateCar`] [`Command`] execution.
pub type ExecutionError = database::Error;

#[cfg(test)]
mod spec {
    use crate::{domain::car, test_support};

    #[tokio::test]
    async fn creates_available_car() {
        let svc = test_support::service();

        let car = test_support::create_car(
            &svc,
            "Jeep Wrangler",
            car::Kind::Suv,
            "Phoenix",
            "89.99",
        )
        .await;

        assert!(car.is_available);
        let stored = test_support::car(&svc, car.id).await;
        assert_eq!(stored.name, car.name);
        assert_eq!(stored.kind, car::Kind::Suv);
        assert_eq!(stored.price.to_string(), "89.99");
        assert_eq!(stored.features.len(), 1);
        assert!(stored.is_available);
    }
}
