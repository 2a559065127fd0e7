//! [`Car`] read model definition.
//!
//! [`Car`]: crate::domain::Car

pub mod list {
    //! [`Car`]s list definitions.

    use common::Money;

    use crate::domain::{car, Car};

    /// Filter narrowing a list of available [`Car`]s.
    ///
    /// Every provided field narrows the list further, and an empty
    /// [`Filter`] selects all the available [`Car`]s.
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// Part of a [`car::Location`] to search for, case-insensitively.
        pub location: Option<String>,

        /// Exact [`car::Kind`] to search for.
        pub kind: Option<car::Kind>,

        /// Maximum price of a single rental day, inclusive.
        pub max_price: Option<Money>,
    }

    impl Filter {
        /// Checks whether the provided [`Car`] matches this [`Filter`].
        ///
        /// [`Car`]s being unavailable never match.
        #[must_use]
        pub fn matches(&self, car: &Car) -> bool {
            car.is_available
                && self.location.as_deref().map_or(true, |loc| {
                    let loc = loc.to_lowercase();
                    AsRef::<str>::as_ref(&car.location)
                        .to_lowercase()
                        .contains(&loc)
                })
                && self.kind.map_or(true, |k| car.kind == k)
                && self.max_price.map_or(true, |max| car.price <= max)
        }
    }
}

/// Name and location a [`Car`] is listed in the catalog with.
///
/// [`Car`]: crate::domain::Car
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Listing {
    /// Name of the [`Car`].
    ///
    /// [`Car`]: crate::domain::Car
    pub name: crate::domain::car::Name,

    /// Location of the [`Car`].
    ///
    /// [`Car`]: crate::domain::Car
    pub location: crate::domain::car::Location,
}

#[cfg(test)]
mod spec {
    use common::DateTime;

    use crate::domain::{car, Car};

    use super::list::Filter;

    fn car(location: &str, kind: car::Kind, price: &str) -> Car {
        Car {
            id: car::Id::new(),
            name: car::Name::new("Car").unwrap(),
            kind,
            price: price.parse().unwrap(),
            location: car::Location::new(location).unwrap(),
            image_url: car::ImageUrl::new("https://example.com/car.jpg")
                .unwrap(),
            is_available: true,
            description: car::Description::new("Car.").unwrap(),
            features: vec![],
            created_at: DateTime::now().coerce(),
        }
    }

    #[test]
    fn empty_filter_matches_available() {
        let mut suv = car("Denver", car::Kind::Suv, "80");

        assert!(Filter::default().matches(&suv));

        suv.is_available = false;
        assert!(!Filter::default().matches(&suv));
    }

    #[test]
    fn matches_location_case_insensitively() {
        let filter = Filter {
            location: Some("YORK".into()),
            ..Filter::default()
        };

        assert!(filter.matches(&car("New York", car::Kind::Sedan, "50")));
        assert!(!filter.matches(&car("Boston", car::Kind::Sedan, "50")));
    }

    #[test]
    fn matches_kind_and_price() {
        let filter = Filter {
            kind: Some(car::Kind::Luxury),
            max_price: Some("200".parse().unwrap()),
            ..Filter::default()
        };

        assert!(filter.matches(&car("Miami", car::Kind::Luxury, "200")));
        assert!(!filter.matches(&car("Miami", car::Kind::Luxury, "200.01")));
        assert!(!filter.matches(&car("Miami", car::Kind::Sports, "150")));
    }
}
