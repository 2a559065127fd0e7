//! Macros for defining kind enums.

/// Macro for defining a kind enum.
///
/// Every variant carries its wire `#[name]`, used both for its [`Display`]
/// and [`FromStr`] implementations and for (de)serialization. Variants are
/// stored in Postgres as `INT2` values.
///
/// Crates invoking this macro must depend on `serde` and `strum` directly.
///
/// # Example
///
/// ```rust
/// use common::define_kind;
///
/// define_kind! {
///     #[doc = "Shape kind."]
///     enum Kind {
///         #[doc = "A cube."]
///         #[name = "cube"]
///         Cube = 1,
///
///         #[doc = "A sphere."]
///         #[name = "SPHERE"]
///         Sphere = 2,
///     }
/// }
///
/// assert_eq!(Kind::Sphere.to_string(), "SPHERE");
/// assert_eq!("cube".parse::<Kind>().ok(), Some(Kind::Cube));
/// assert_eq!(Kind::Cube.u8(), 1);
/// ```
///
/// [`Display`]: std::fmt::Display
/// [`FromStr`]: std::str::FromStr
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_kind {
    (
        #[doc = $doc:literal]
        enum $name:ident {
            $(
                #[doc = $variant_doc:literal]
                #[name = $variant_name:literal]
                $variant:ident = $value:expr
            ),* $(,)?
        }
    ) => {
        #[derive(
            Clone,
            Copy,
            Debug,
            $crate::private::serde::Deserialize,
            $crate::private::serde::Serialize,
            $crate::private::strum::Display,
            $crate::private::strum::EnumString,
            Eq,
            Hash,
            PartialEq,
        )]
        #[doc = $doc]
        #[repr(u8)]
        pub enum $name {
            $(
                #[doc = $variant_doc]
                #[serde(rename = $variant_name)]
                #[strum(serialize = $variant_name)]
                $variant = $value,
            )*
        }

        impl $name {
            /// All the variants, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),*];

            /// Converts this into its [`u8`] representation.
            #[must_use]
            pub const fn u8(self) -> u8 {
                self as u8
            }

            /// Returns the wire name of this variant.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(
                        Self::$variant => $variant_name,
                    )*
                }
            }
        }

        #[cfg(feature = "postgres")]
        impl<'a> $crate::private::postgres_types::FromSql<'a> for $name {
            $crate::private::postgres_types::accepts!(INT2);

            fn from_sql(
                ty: &$crate::private::postgres_types::Type,
                raw: &[u8],
            ) -> Result<
                $name,
                Box<dyn ::std::error::Error
                    + ::core::marker::Sync
                    + ::core::marker::Send>,
            > {
                match u8::try_from(i16::from_sql(ty, raw)?)? {
                    $(
                        v if Self::$variant.u8() == v => Ok(Self::$variant),
                    )*
                    v => Err(::std::format!(
                        "invalid `{}` value: {v}",
                        ::core::stringify!($name),
                    ).into()),
                }
            }
        }

        #[cfg(feature = "postgres")]
        impl $crate::private::postgres_types::ToSql for $name {
            $crate::private::postgres_types::accepts!(INT2);
            $crate::private::postgres_types::to_sql_checked!();

            fn to_sql(
                &self,
                ty: &$crate::private::postgres_types::Type,
                w: &mut $crate::private::postgres_types::private::BytesMut,
            ) -> Result<
                $crate::private::postgres_types::IsNull,
                ::std::boxed::Box<
                    dyn ::std::error::Error
                        + ::core::marker::Sync
                        + ::core::marker::Send
                >,
            > {
                i16::from(self.u8()).to_sql(ty, w)
            }
        }
    };
}

#[cfg(test)]
mod spec {
    define_kind! {
        #[doc = "Test kind."]
        enum Fuel {
            #[doc = "Petrol."]
            #[name = "PETROL"]
            Petrol = 1,

            #[doc = "Electric."]
            #[name = "Electric"]
            Electric = 2,
        }
    }

    #[test]
    fn uses_declared_names() {
        assert_eq!(Fuel::Petrol.to_string(), "PETROL");
        assert_eq!(Fuel::Electric.as_str(), "Electric");
        assert_eq!("Electric".parse::<Fuel>().unwrap(), Fuel::Electric);
        assert!("electric".parse::<Fuel>().is_err());
        assert!("Diesel".parse::<Fuel>().is_err());
    }

    #[test]
    fn serializes_as_name() {
        assert_eq!(
            serde_json::to_string(&Fuel::Petrol).unwrap(),
            r#""PETROL""#,
        );
        assert_eq!(
            serde_json::from_str::<Fuel>(r#""Electric""#).unwrap(),
            Fuel::Electric,
        );
        assert!(serde_json::from_str::<Fuel>(r#""ELECTRIC""#).is_err());
    }

    #[test]
    fn lists_all_variants() {
        assert_eq!(Fuel::ALL, &[Fuel::Petrol, Fuel::Electric]);
        assert_eq!(Fuel::Electric.u8(), 2);
    }
}
