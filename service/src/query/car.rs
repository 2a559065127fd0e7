//! [`Query`] collection related to a single [`Car`].

use common::operations::By;

use crate::{
    domain::{car, Car},
    read,
};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Car`] by its [`car::Id`].
pub type ById = DatabaseQuery<By<Option<Car>, car::Id>>;

/// Queries the earliest created [`Car`] by its [`read::car::Listing`].
pub type ByListing = DatabaseQuery<By<Option<Car>, read::car::Listing>>;
