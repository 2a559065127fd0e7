//! [`Car`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf, Money};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    booking::{Period, Quote},
    define_text,
};

/// Car offered for rent.
#[derive(Clone, Debug)]
pub struct Car {
    /// ID of this [`Car`].
    pub id: Id,

    /// [`Name`] of this [`Car`].
    pub name: Name,

    /// [`Kind`] of this [`Car`].
    pub kind: Kind,

    /// Price of renting this [`Car`] for a single day.
    pub price: Money,

    /// [`Location`] this [`Car`] is picked up at.
    pub location: Location,

    /// [`ImageUrl`] of this [`Car`].
    pub image_url: ImageUrl,

    /// Indicator whether this [`Car`] has no active booking.
    pub is_available: bool,

    /// [`Description`] of this [`Car`].
    pub description: Description,

    /// [`Feature`]s of this [`Car`], in display order.
    pub features: Vec<Feature>,

    /// [`DateTime`] when this [`Car`] was created.
    pub created_at: CreationDateTime,
}

impl Car {
    /// Quotes renting this [`Car`] for the provided [`Period`].
    ///
    /// [`None`] is returned if the total price overflows.
    #[must_use]
    pub fn quote(&self, period: &Period) -> Option<Quote> {
        let days = period.days();
        Some(Quote {
            days,
            total_price: self.price.checked_mul(days)?,
        })
    }
}

/// ID of a [`Car`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

define_kind! {
    #[doc = "Kind of a [`Car`]."]
    enum Kind {
        #[doc = "Sport utility vehicle."]
        #[name = "SUV"]
        Suv = 1,

        #[doc = "Luxury car."]
        #[name = "Luxury"]
        Luxury = 2,

        #[doc = "Sports car."]
        #[name = "Sports"]
        Sports = 3,

        #[doc = "Compact car."]
        #[name = "Compact"]
        Compact = 4,

        #[doc = "Sedan."]
        #[name = "Sedan"]
        Sedan = 5,
    }
}

define_text! {
    #[doc = "Name of a [`Car`]."]
    Name(max_len = 512)
}

define_text! {
    #[doc = "Location a [`Car`] is picked up at."]
    Location(max_len = 512)
}

define_text! {
    #[doc = "URL of a [`Car`] image."]
    ImageUrl(max_len = 2048)
}

define_text! {
    #[doc = "Description of a [`Car`]."]
    Description(max_len = 8192)
}

define_text! {
    #[doc = "Single feature of a [`Car`] (e.g. `GPS Navigation`)."]
    Feature(max_len = 256)
}

/// [`DateTime`] when a [`Car`] was created.
pub type CreationDateTime = DateTimeOf<(Car, unit::Creation)>;

#[cfg(test)]
mod spec {
    use common::{DateTime, Money};

    use crate::domain::booking::Period;

    use super::{
        Car, CreationDateTime, Description, Feature, Id, ImageUrl, Kind,
        Location, Name,
    };

    fn car(price: &str) -> Car {
        Car {
            id: Id::new(),
            name: Name::new("Tesla Model 3").unwrap(),
            kind: Kind::Sedan,
            price: price.parse().unwrap(),
            location: Location::new("San Francisco").unwrap(),
            image_url: ImageUrl::new("https://example.com/t3.jpg").unwrap(),
            is_available: true,
            description: Description::new("Electric sedan.").unwrap(),
            features: vec![Feature::new("Autopilot").unwrap()],
            created_at: CreationDateTime::now(),
        }
    }

    fn period(from: &str, to: &str) -> Period {
        Period::new(
            DateTime::from_rfc3339(from).unwrap().coerce(),
            DateTime::from_rfc3339(to).unwrap().coerce(),
        )
    }

    #[test]
    fn quotes_whole_days() {
        let quote = car("50")
            .quote(&period("2024-05-01T10:00:00Z", "2024-05-04T10:00:00Z"))
            .unwrap();

        assert_eq!(quote.days, 3);
        assert_eq!(quote.total_price, "150".parse::<Money>().unwrap());
    }

    #[test]
    fn quotes_started_day_as_whole() {
        let quote = car("40")
            .quote(&period("2024-05-01T10:00:00Z", "2024-05-02T10:00:01Z"))
            .unwrap();

        assert_eq!(quote.days, 2);
        assert_eq!(quote.total_price, "80".parse::<Money>().unwrap());
    }

    #[test]
    fn quotes_at_least_one_day() {
        let quote = car("75.5")
            .quote(&period("2024-05-01T10:00:00Z", "2024-05-01T10:00:00Z"))
            .unwrap();

        assert_eq!(quote.days, 1);
        assert_eq!(quote.total_price, "75.5".parse::<Money>().unwrap());
    }

    #[test]
    fn kind_wire_names() {
        assert_eq!(Kind::Suv.to_string(), "SUV");
        assert_eq!("Luxury".parse::<Kind>().unwrap(), Kind::Luxury);
        assert!("suv".parse::<Kind>().is_err());
        assert_eq!(Kind::ALL.len(), 5);
    }

    #[test]
    fn validates_text() {
        assert!(Name::new("").is_none());
        assert!(Name::new(" Tesla").is_none());
        assert!(Location::new("Paris ").is_none());
        assert!(Feature::new("x".repeat(257)).is_none());
        assert_eq!(
            AsRef::<str>::as_ref(&Location::new("New York").unwrap()),
            "New York",
        );
    }
}
