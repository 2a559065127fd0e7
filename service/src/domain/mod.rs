//! Domain definitions.

pub mod booking;
pub mod car;
pub mod user;

pub use self::{booking::Booking, car::Car, user::User};

/// Defines a validated text value type.
///
/// The value must be non-empty, must not start or end with whitespace, and
/// must not exceed the provided length in bytes.
macro_rules! define_text {
    (
        #[doc = $doc:literal]
        $name:ident(max_len = $max_len:literal)
    ) => {
        #[doc = $doc]
        #[derive(
            ::derive_more::AsRef,
            Clone,
            Debug,
            ::derive_more::Display,
            Eq,
            Hash,
            ::derive_more::Into,
            PartialEq,
        )]
        #[as_ref(str, String)]
        #[cfg_attr(
            feature = "postgres",
            derive(::postgres_types::FromSql, ::postgres_types::ToSql),
            postgres(transparent)
        )]
        pub struct $name(String);

        impl $name {
            #[doc = ::core::concat!(
                "Creates a new [`", ::core::stringify!($name),
                "`] if the given `value` is valid."
            )]
            #[must_use]
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let value = value.into();
                Self::check(&value).then_some(Self(value))
            }

            #[doc = ::core::concat!(
                "Checks whether the given `value` is a valid [`",
                ::core::stringify!($name), "`]."
            )]
            fn check(value: &str) -> bool {
                value.trim() == value
                    && !value.is_empty()
                    && value.len() <= $max_len
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = &'static str;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s).ok_or(::core::concat!(
                    "invalid `", ::core::stringify!($name), "`"
                ))
            }
        }
    };
}

pub(crate) use define_text;
