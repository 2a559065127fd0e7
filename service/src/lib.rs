//! Service contains the business logic of the car rental application.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod infra;
pub mod query;
pub mod read;

use std::time::Duration;

use derive_more::Debug;

#[cfg(doc)]
use domain::user::Session;
#[cfg(doc)]
use infra::Database;

pub use self::{command::Command, query::Query};

/// [`Service`] configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// [JWT] encoding key.
    ///
    /// [JWT]: https://datatracker.ietf.org/doc/html/rfc7519
    #[debug(skip)]
    pub jwt_encoding_key: jsonwebtoken::EncodingKey,

    /// [JWT] decoding key.
    ///
    /// [JWT]: https://datatracker.ietf.org/doc/html/rfc7519
    #[debug(skip)]
    pub jwt_decoding_key: jsonwebtoken::DecodingKey,

    /// [`Duration`] after which an issued [`Session`] expires.
    pub session_ttl: Duration,
}

impl Config {
    /// Creates a new [`Config`] signing [`Session`]s with the provided
    /// `secret`.
    #[must_use]
    pub fn with_secret(secret: &[u8], session_ttl: Duration) -> Self {
        Self {
            jwt_encoding_key: jsonwebtoken::EncodingKey::from_secret(secret),
            jwt_decoding_key: jsonwebtoken::DecodingKey::from_secret(secret),
            session_ttl,
        }
    }
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Db> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Database`] of this [`Service`].
    database: Db,
}

impl<Db> Service<Db> {
    /// Creates a new [`Service`] with the provided parameters.
    #[must_use]
    pub fn new(config: Config, database: Db) -> Self {
        Self { config, database }
    }

    /// Returns [`Config`] of this [`Service`].
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Database`] of this [`Service`].
    #[must_use]
    pub fn database(&self) -> &Db {
        &self.database
    }
}

#[cfg(test)]
mod test_support {
    //! Helpers shared by the [`Service`] tests.

    use std::time::Duration;

    use common::operations::{By, Select};

    use crate::{
        command::{self, Command as _},
        domain::{car, user, Car, User},
        infra::{database::Memory, Database as _},
        Config, Service,
    };

    /// [`Service`] backed by an empty [`Memory`] database.
    pub(crate) fn service() -> Service<Memory> {
        Service::new(
            Config::with_secret(b"test-secret", Duration::from_secs(60 * 30)),
            Memory::default(),
        )
    }

    /// Creates a new [`Car`] with the provided `price` per day.
    pub(crate) async fn create_car(
        svc: &Service<Memory>,
        name: &str,
        kind: car::Kind,
        location: &str,
        price: &str,
    ) -> Car {
        svc.execute(command::CreateCar {
            name: car::Name::new(name).unwrap(),
            kind,
            price: price.parse().unwrap(),
            location: car::Location::new(location).unwrap(),
            image_url: car::ImageUrl::new("https://example.com/car.jpg")
                .unwrap(),
            description: car::Description::new("A nice car.").unwrap(),
            features: vec![car::Feature::new("GPS").unwrap()],
        })
        .await
        .unwrap()
    }

    /// Creates a new [`User`] with the provided `email`.
    pub(crate) async fn create_user(svc: &Service<Memory>, email: &str) -> User {
        svc.execute(command::CreateUser {
            name: user::Name::new("Jane Doe").unwrap(),
            email: user::Email::new(email).unwrap(),
            password: secrecy::SecretBox::init_with(|| {
                user::Password::new("correct horse").unwrap()
            }),
        })
        .await
        .unwrap()
    }

    /// Reads the current state of the [`Car`] with the provided ID.
    pub(crate) async fn car(svc: &Service<Memory>, id: car::Id) -> Car {
        svc.database()
            .execute(Select(By::<Option<Car>, _>::new(id)))
            .await
            .unwrap()
            .unwrap()
    }
}
