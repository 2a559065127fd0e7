//! [`Booking`] definitions.

use std::time::Duration;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf, Money};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(doc)]
use crate::domain::Car;
use crate::domain::{car, user};

/// Reservation of a [`Car`] by a [`User`] for a [`Period`].
///
/// [`User`]: crate::domain::User
#[derive(Clone, Debug)]
pub struct Booking {
    /// ID of this [`Booking`].
    pub id: Id,

    /// ID of the [`User`] who made this [`Booking`].
    ///
    /// [`User`]: crate::domain::User
    pub user_id: user::Id,

    /// ID of the booked [`Car`].
    pub car_id: car::Id,

    /// [`Period`] of this [`Booking`].
    pub period: Period,

    /// Total price of this [`Booking`], fixed at the moment of its creation.
    pub total_price: Money,

    /// [`Status`] of this [`Booking`].
    pub status: Status,

    /// [`DateTime`] when this [`Booking`] was created.
    pub created_at: CreationDateTime,
}

/// ID of a [`Booking`].
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
    #[doc = "Status of a [`Booking`]."]
    enum Status {
        #[doc = "[`Booking`] is created and holds its [`Car`]."]
        #[name = "pending"]
        Pending = 1,

        #[doc = "[`Booking`] is confirmed."]
        #[name = "confirmed"]
        Confirmed = 2,

        #[doc = "[`Booking`] is completed and the [`Car`] is returned."]
        #[name = "completed"]
        Completed = 3,

        #[doc = "[`Booking`] is cancelled by its owner."]
        #[name = "cancelled"]
        Cancelled = 4,
    }
}

impl Status {
    /// Indicates whether a [`Booking`] in this [`Status`] is not cancelled.
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

/// Rental period of a [`Booking`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Period {
    /// [`DateTime`] when the [`Car`] is picked up.
    pickup: PickupDateTime,

    /// [`DateTime`] when the [`Car`] is returned.
    r#return: ReturnDateTime,
}

impl Period {
    /// Length of a single rental day.
    pub const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    /// Creates a new [`Period`] out of the provided dates.
    ///
    /// The `r#return` may precede the `pickup`, see [`Period::is_inverted()`].
    #[must_use]
    pub const fn new(pickup: PickupDateTime, r#return: ReturnDateTime) -> Self {
        Self { pickup, r#return }
    }

    /// Indicates whether the `r#return` of this [`Period`] precedes its
    /// `pickup`.
    #[must_use]
    pub fn is_inverted(&self) -> bool {
        self.r#return.coerce::<()>() < self.pickup.coerce::<()>()
    }

    /// Returns the [`DateTime`] when the [`Car`] is picked up.
    #[must_use]
    pub const fn pickup(&self) -> PickupDateTime {
        self.pickup
    }

    /// Returns the [`DateTime`] when the [`Car`] is returned.
    #[must_use]
    pub const fn r#return(&self) -> ReturnDateTime {
        self.r#return
    }

    /// Returns the number of started days in this [`Period`].
    ///
    /// Any [`Period`] is charged for at least a single day. An inverted
    /// [`Period`] is charged for exactly one.
    #[must_use]
    pub fn days(&self) -> u32 {
        if self.is_inverted() {
            return 1;
        }
        let length =
            self.r#return.coerce::<()>() - self.pickup.coerce::<()>();
        let days = length.as_nanos().div_ceil(Self::DAY.as_nanos()).max(1);
        u32::try_from(days).unwrap_or(u32::MAX)
    }
}

/// Price quote of renting a [`Car`] for a [`Period`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct Quote {
    /// Number of charged days.
    pub days: u32,

    /// Total price for all the charged days.
    pub total_price: Money,
}

/// [`DateTime`] when a [`Booking`] was created.
pub type CreationDateTime = DateTimeOf<(Booking, unit::Creation)>;

/// [`DateTime`] when a [`Car`] is picked up.
pub type PickupDateTime = DateTimeOf<(Booking, unit::Pickup)>;

/// [`DateTime`] when a [`Car`] is returned.
pub type ReturnDateTime = DateTimeOf<(Booking, unit::Return)>;

#[cfg(test)]
mod spec {
    use common::DateTime;

    use super::{Period, Status};

    fn period(from: &str, to: &str) -> Period {
        Period::new(
            DateTime::from_rfc3339(from).unwrap().coerce(),
            DateTime::from_rfc3339(to).unwrap().coerce(),
        )
    }

    #[test]
    fn accepts_return_before_pickup() {
        let inverted = period("2024-05-04T00:00:00Z", "2024-05-01T00:00:00Z");

        assert!(inverted.is_inverted());
        assert_eq!(inverted.days(), 1);
        assert!(
            !period("2024-05-02T00:00:00Z", "2024-05-02T00:00:00Z")
                .is_inverted()
        );
    }

    #[test]
    fn counts_started_days() {
        let days = |from, to| period(from, to).days();

        assert_eq!(days("2024-05-01T00:00:00Z", "2024-05-01T00:00:00Z"), 1);
        assert_eq!(days("2024-05-01T00:00:00Z", "2024-05-01T05:00:00Z"), 1);
        assert_eq!(days("2024-05-01T00:00:00Z", "2024-05-02T00:00:00Z"), 1);
        assert_eq!(days("2024-05-01T00:00:00Z", "2024-05-02T00:00:01Z"), 2);
        assert_eq!(days("2024-05-01T00:00:00Z", "2024-05-02T00:00:00.5Z"), 2);
        assert_eq!(days("2024-05-01T12:00:00Z", "2024-05-08T12:00:00Z"), 7);
    }

    #[test]
    fn active_statuses() {
        assert!(Status::Pending.is_active());
        assert!(Status::Confirmed.is_active());
        assert!(Status::Completed.is_active());
        assert!(!Status::Cancelled.is_active());
    }

    #[test]
    fn status_wire_names() {
        assert_eq!(Status::Cancelled.to_string(), "cancelled");
        assert_eq!(
            serde_json::to_string(&Status::Pending).unwrap(),
            r#""pending""#,
        );
    }
}
