//! Catalog seeding definitions.

use std::{io, path::Path};

use common::Money;
use derive_more::{Display, Error as StdError, From};
use serde::Deserialize;
use service::{
    command::{self, create_car, Command},
    domain::{self, car},
    infra::database,
    query, read, Query,
};
use tracerr::Traced;

/// [`domain::Car`] description in a seed file.
///
/// Text values are trimmed before validation.
#[derive(Clone, Debug, Deserialize)]
pub struct Car {
    /// Name of the [`domain::Car`].
    pub name: String,

    /// [`car::Kind`] of the [`domain::Car`].
    #[serde(rename = "type")]
    pub kind: car::Kind,

    /// Price of a single rental day.
    pub price: Money,

    /// Location the [`domain::Car`] is picked up at.
    pub location: String,

    /// URL of the [`domain::Car`]'s image.
    pub image_url: String,

    /// Description of the [`domain::Car`].
    pub description: String,

    /// Features of the [`domain::Car`].
    #[serde(default)]
    pub features: Vec<String>,
}

impl TryFrom<Car> for command::CreateCar {
    type Error = &'static str;

    fn try_from(car: Car) -> Result<Self, Self::Error> {
        let Car {
            name,
            kind,
            price,
            location,
            image_url,
            description,
            features,
        } = car;

        Ok(Self {
            name: car::Name::new(name.trim()).ok_or("invalid `name`")?,
            kind,
            price,
            location: car::Location::new(location.trim())
                .ok_or("invalid `location`")?,
            image_url: car::ImageUrl::new(image_url.trim())
                .ok_or("invalid `image_url`")?,
            description: car::Description::new(description.trim())
                .ok_or("invalid `description`")?,
            features: features
                .into_iter()
                .map(|f| {
                    car::Feature::new(f.trim()).ok_or("invalid `features`")
                })
                .collect::<Result<_, _>>()?,
        })
    }
}

/// Reads the [`Car`]s from the JSON file at the provided `path`.
///
/// # Errors
///
/// If the file cannot be read, or is not a JSON array of [`Car`]s.
pub async fn read(path: impl AsRef<Path>) -> Result<Vec<Car>, Traced<Error>> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(tracerr::from_and_wrap!(=> Error))?;
    serde_json::from_slice(&bytes).map_err(tracerr::from_and_wrap!(=> Error))
}

/// Creates the provided [`Car`]s in the catalog of the `service`.
///
/// [`Car`]s already listed with the same name and location are skipped, so
/// seeding the same file again doesn't duplicate the catalog.
///
/// Returns the number of created [`domain::Car`]s.
///
/// # Errors
///
/// If any of the [`Car`]s is invalid, or the `service` fails. [`Car`]s
/// preceding the failed one remain created.
pub async fn run<S>(
    service: &S,
    cars: Vec<Car>,
) -> Result<usize, Traced<Error>>
where
    S: Command<
            command::CreateCar,
            Ok = domain::Car,
            Err = Traced<create_car::ExecutionError>,
        > + Query<
            query::car::ByListing,
            Ok = Option<domain::Car>,
            Err = Traced<database::Error>,
        >,
{
    let mut created = 0;
    for (index, car) in cars.into_iter().enumerate() {
        let cmd = command::CreateCar::try_from(car).map_err(|reason| {
            tracerr::new!(Error::Invalid { index, reason })
        })?;

        let listed = service
            .execute(query::car::ByListing::by(read::car::Listing {
                name: cmd.name.clone(),
                location: cmd.location.clone(),
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> Error))?;
        if let Some(car) = listed {
            tracing::debug!(car_id = %car.id, "car is already seeded");
            continue;
        }

        let car = service
            .execute(cmd)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> Error))?;
        tracing::debug!(car_id = %car.id, "seeded car");
        created += 1;
    }
    Ok(created)
}

/// Error of seeding the catalog.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Failed to read the seed file.
    #[display("Failed to read the seed file: {_0}")]
    Io(io::Error),

    /// Seed file is not a JSON array of [`Car`]s.
    #[display("Malformed seed file: {_0}")]
    Json(serde_json::Error),

    /// [`Car`] at the `index` is invalid.
    #[display("Invalid car #{index}: {reason}")]
    #[from(ignore)]
    Invalid {
        /// Index of the invalid [`Car`] in the seed file.
        index: usize,

        /// Reason of the [`Car`] being invalid.
        reason: &'static str,
    },

    /// [`service::infra::Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(create_car::ExecutionError),
}

#[cfg(test)]
mod spec {
    use std::{io::Write as _, time::Duration};

    use service::{infra::database::Memory, query, Config, Query as _, Service};

    use super::{read, run, Error};

    const CARS: &str = r#"[
        {
            "name": "Tesla Model 3",
            "type": "Sedan",
            "price": 50,
            "location": "San Francisco",
            "image_url": "https://example.com/tesla.jpg",
            "description": "Electric sedan.",
            "features": ["Autopilot", "GPS"]
        },
        {
            "name": " Range Rover ",
            "type": "SUV",
            "price": 120.5,
            "location": "Denver",
            "image_url": "https://example.com/rover.jpg",
            "description": "Off-road."
        }
    ]"#;

    fn memory_service() -> Service<Memory> {
        Service::new(
            Config::with_secret(b"secret", Duration::from_secs(60)),
            Memory::default(),
        )
    }

    #[tokio::test]
    async fn seeds_cars_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CARS.as_bytes()).unwrap();
        let svc = memory_service();

        let cars = read(file.path()).await.unwrap();
        let created = run(&svc, cars).await.unwrap();

        assert_eq!(created, 2);
        let listed = svc
            .execute(query::cars::List::by(
                service::read::car::list::Filter::default(),
            ))
            .await
            .unwrap();
        let mut names = listed
            .iter()
            .map(|c| AsRef::<str>::as_ref(&c.name))
            .collect::<Vec<_>>();
        names.sort_unstable();
        assert_eq!(names, ["Range Rover", "Tesla Model 3"]);
        assert!(listed.iter().all(|c| c.is_available));
    }

    #[tokio::test]
    async fn skips_seeded_cars() {
        let svc = memory_service();
        let cars: Vec<super::Car> = serde_json::from_str(CARS).unwrap();

        assert_eq!(run(&svc, cars.clone()).await.unwrap(), 2);
        assert_eq!(run(&svc, cars).await.unwrap(), 0);

        let listed = svc
            .execute(query::cars::List::by(
                service::read::car::list::Filter::default(),
            ))
            .await
            .unwrap();
        assert_eq!(listed.len(), 2);
    }

    #[tokio::test]
    async fn rejects_invalid_car() {
        let cars = serde_json::from_str(
            r#"[{
                "name": "",
                "type": "Compact",
                "price": 10,
                "location": "Chicago",
                "image_url": "https://example.com/fit.jpg",
                "description": "Tiny."
            }]"#,
        )
        .unwrap();

        let err = run(&memory_service(), cars).await.unwrap_err();

        assert!(matches!(err.as_ref(), Error::Invalid { index: 0, .. }));
    }

    #[tokio::test]
    async fn rejects_unknown_kind() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CARS.replace("SUV", "Truck").as_bytes())
            .unwrap();

        let err = read(file.path()).await.unwrap_err();

        assert!(matches!(err.as_ref(), Error::Json(_)));
    }
}
