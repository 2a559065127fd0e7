//! [`Car`]-related REST API definitions.

use axum::{
    extract::{rejection::QueryRejection, Path, Query},
    Extension, Json,
};
use common::{DateTime, Money};
use serde::{Deserialize, Serialize};
use service::{
    domain::{self, booking, car},
    query, read, Query as _,
};

use crate::{define_error, AsError, Error, Service};

/// Car offered for rent.
#[derive(Clone, Debug, Serialize)]
pub struct Car {
    /// ID of this [`Car`].
    pub id: car::Id,

    /// Name of this [`Car`].
    pub name: String,

    /// Kind of this [`Car`].
    #[serde(rename = "type")]
    pub kind: car::Kind,

    /// Price of renting this [`Car`] for a single day.
    pub price: Money,

    /// Location this [`Car`] is picked up at.
    pub location: String,

    /// URL of this [`Car`]'s image.
    pub image_url: String,

    /// Indicator whether this [`Car`] can be booked.
    pub available: bool,

    /// Description of this [`Car`].
    pub description: String,

    /// Features of this [`Car`].
    pub features: Vec<String>,

    /// [`DateTime`] when this [`Car`] was created.
    pub created_at: DateTime,
}

impl From<domain::Car> for Car {
    fn from(car: domain::Car) -> Self {
        let domain::Car {
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

        Self {
            id,
            name: name.into(),
            kind,
            price,
            location: location.into(),
            image_url: image_url.into(),
            available: is_available,
            description: description.into(),
            features: features.into_iter().map(Into::into).collect(),
            created_at: created_at.coerce(),
        }
    }
}

/// Query parameters of the [`list`] handler.
///
/// Empty values are treated as absent ones.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    /// Part of a location to search for.
    pub location: Option<String>,

    /// Exact [`car::Kind`] name to search for.
    #[serde(rename = "type")]
    pub kind: Option<String>,

    /// Maximum price of a single rental day.
    pub max_price: Option<String>,
}

impl TryFrom<ListParams> for read::car::list::Filter {
    type Error = FilterError;

    fn try_from(params: ListParams) -> Result<Self, Self::Error> {
        /// Drops the provided `value` if it's blank.
        fn non_blank(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.trim().is_empty())
        }

        let ListParams {
            location,
            kind,
            max_price,
        } = params;

        Ok(Self {
            location: non_blank(location),
            kind: non_blank(kind)
                .map(|k| k.parse())
                .transpose()
                .map_err(|_| FilterError::InvalidFilter)?,
            max_price: non_blank(max_price)
                .map(|p| p.parse())
                .transpose()
                .map_err(|_| FilterError::InvalidFilter)?,
        })
    }
}

define_error! {
    enum FilterError {
        #[code = "INVALID_FILTER"]
        #[status = BAD_REQUEST]
        #[message = "Unknown car `type` or malformed `maxPrice`"]
        InvalidFilter,
    }
}

define_error! {
    enum CarError {
        #[code = "CAR_NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "Car not found"]
        NotFound,
    }
}

/// Lists the available [`Car`]s matching the provided [`ListParams`].
///
/// # Errors
///
/// If the [`ListParams`] are malformed, or the [`Service`] fails.
#[tracing::instrument(skip(service))]
pub async fn list(
    Extension(service): Extension<Service>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Car>>, Error> {
    let Query(params) = params.map_err(AsError::into_error)?;
    let filter = read::car::list::Filter::try_from(params)?;

    Ok(Json(
        service
            .execute(query::cars::List::by(filter))
            .await
            .map_err(AsError::into_error)?
            .into_iter()
            .map(Car::from)
            .collect(),
    ))
}

/// Reads the [`domain::Car`] with the provided ID.
///
/// Malformed IDs are reported as not found.
async fn find(service: &Service, id: &str) -> Result<domain::Car, Error> {
    let Ok(id) = id.parse::<car::Id>() else {
        return Err(CarError::NotFound.into());
    };
    service
        .execute(query::car::ById::by(id))
        .await
        .map_err(AsError::into_error)?
        .ok_or_else(|| CarError::NotFound.into())
}

/// Returns the [`Car`] with the provided ID.
///
/// # Errors
///
/// If the [`Car`] doesn't exist, or the [`Service`] fails.
#[tracing::instrument(skip(service))]
pub async fn get(
    Extension(service): Extension<Service>,
    Path(id): Path<String>,
) -> Result<Json<Car>, Error> {
    Ok(Json(find(&service, &id).await?.into()))
}

/// Query parameters of the [`quote`] handler.
#[derive(Clone, Debug, Deserialize)]
pub struct QuoteParams {
    /// RFC 3339 [`DateTime`] of the pickup.
    pub pickup_date: String,

    /// RFC 3339 [`DateTime`] of the return.
    pub return_date: String,
}

/// Parses a [`booking::Period`] to be quoted out of the provided RFC 3339
/// strings.
///
/// # Errors
///
/// If any of the dates is malformed, or the return precedes the pickup.
pub fn parse_period(
    pickup_date: &str,
    return_date: &str,
) -> Result<booking::Period, Error> {
    let (Ok(pickup), Ok(r#return)) = (
        DateTime::from_rfc3339(pickup_date),
        DateTime::from_rfc3339(return_date),
    ) else {
        return Err(PeriodError::InvalidPeriod.into());
    };
    let period = booking::Period::new(pickup.coerce(), r#return.coerce());
    if period.is_inverted() {
        return Err(PeriodError::InvalidPeriod.into());
    }
    Ok(period)
}

define_error! {
    enum PeriodError {
        #[code = "INVALID_PERIOD"]
        #[status = BAD_REQUEST]
        #[message = "`return_date` must be a date not before `pickup_date`"]
        InvalidPeriod,
    }
}

/// Quotes renting the [`Car`] with the provided ID for a period.
///
/// # Errors
///
/// If the period is invalid, the [`Car`] doesn't exist, or the [`Service`]
/// fails.
#[tracing::instrument(skip(service))]
pub async fn quote(
    Extension(service): Extension<Service>,
    Path(id): Path<String>,
    params: Result<Query<QuoteParams>, QueryRejection>,
) -> Result<Json<booking::Quote>, Error> {
    let Query(QuoteParams {
        pickup_date,
        return_date,
    }) = params.map_err(|_| Error::from(PeriodError::InvalidPeriod))?;
    let period = parse_period(&pickup_date, &return_date)?;

    let car = find(&service, &id).await?;
    car.quote(&period).map(Json).ok_or_else(|| {
        Error::internal(&format!("`Car(id: {id})` quote overflows"))
    })
}

#[cfg(test)]
mod spec {
    use common::{DateTime, Money};
    use service::{
        domain::{self, car},
        read,
    };

    use super::{parse_period, Car, ListParams};

    fn params(location: &str, kind: &str, max_price: &str) -> ListParams {
        ListParams {
            location: Some(location.into()),
            kind: Some(kind.into()),
            max_price: Some(max_price.into()),
        }
    }

    #[test]
    fn blank_params_do_not_filter() {
        let filter =
            read::car::list::Filter::try_from(params("", " ", "")).unwrap();

        assert!(filter.location.is_none());
        assert!(filter.kind.is_none());
        assert!(filter.max_price.is_none());
    }

    #[test]
    fn parses_filter() {
        let filter =
            read::car::list::Filter::try_from(params("york", "SUV", "99.5"))
                .unwrap();

        assert_eq!(filter.location.as_deref(), Some("york"));
        assert_eq!(filter.kind, Some(car::Kind::Suv));
        assert_eq!(filter.max_price, Some("99.5".parse::<Money>().unwrap()));
    }

    #[test]
    fn rejects_malformed_filter() {
        for params in [
            params("", "Truck", ""),
            params("", "suv", ""),
            params("", "", "cheap"),
            params("", "", "-1"),
        ] {
            let err = crate::Error::from(
                read::car::list::Filter::try_from(params).unwrap_err(),
            );

            assert_eq!(err.code, "INVALID_FILTER");
            assert_eq!(err.status_code, http::StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn rejects_inverted_period() {
        assert!(
            parse_period("2024-05-01T10:00:00Z", "2024-05-01T10:00:00Z").is_ok()
        );

        let err = parse_period("2024-05-02T10:00:00Z", "2024-05-01T10:00:00Z")
            .unwrap_err();
        assert_eq!(err.code, "INVALID_PERIOD");

        let err = parse_period("tomorrow", "2024-05-01T10:00:00Z").unwrap_err();
        assert_eq!(err.code, "INVALID_PERIOD");
    }

    #[test]
    fn serializes_wire_shape() {
        let car = Car::from(domain::Car {
            id: car::Id::new(),
            name: car::Name::new("Tesla Model 3").unwrap(),
            kind: car::Kind::Suv,
            price: "50".parse().unwrap(),
            location: car::Location::new("San Francisco").unwrap(),
            image_url: car::ImageUrl::new("https://example.com/t.jpg").unwrap(),
            is_available: true,
            description: car::Description::new("Electric.").unwrap(),
            features: vec![car::Feature::new("Autopilot").unwrap()],
            created_at: DateTime::from_rfc3339("2024-05-01T10:00:00Z")
                .unwrap()
                .coerce(),
        });

        let json = serde_json::to_value(&car).unwrap();

        assert_eq!(json["type"], "SUV");
        assert_eq!(json["price"], 50.0);
        assert_eq!(json["available"], true);
        assert_eq!(json["features"], serde_json::json!(["Autopilot"]));
        assert_eq!(json["created_at"], "2024-05-01T10:00:00Z");
        assert!(json.get("kind").is_none());
    }
}
