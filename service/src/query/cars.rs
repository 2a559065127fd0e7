//! [`Query`] collection related to the multiple [`Car`]s.

use common::operations::By;

use crate::{domain::Car, read};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries the available [`Car`]s matching a [`read::car::list::Filter`],
/// ordered by their creation.
pub type List = DatabaseQuery<By<Vec<Car>, read::car::list::Filter>>;
