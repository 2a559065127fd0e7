//! [`LikePattern`] definition.

use derive_more::Display;
use postgres_types::{FromSql, ToSql};

/// `LIKE` pattern matching any string containing the given input.
///
/// `LIKE` metacharacters of the input are escaped with a backslash, the
/// default escape character of Postgres.
#[derive(Clone, Debug, Display, Eq, FromSql, PartialEq, ToSql)]
#[postgres(transparent)]
pub struct LikePattern(String);

impl LikePattern {
    /// Creates a new [`LikePattern`] matching strings containing the given
    /// `input`.
    #[must_use]
    pub fn containing(input: &str) -> Self {
        let mut pattern = String::with_capacity(input.len() + 2);
        pattern.push('%');
        for c in input.chars() {
            if matches!(c, '\\' | '%' | '_') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        Self(pattern)
    }
}

#[cfg(test)]
mod spec {
    use super::LikePattern;

    #[test]
    fn escapes_metacharacters() {
        assert_eq!(LikePattern::containing("york").to_string(), "%york%");
        assert_eq!(
            LikePattern::containing(r"50%_off\").to_string(),
            r"%50\%\_off\\%",
        );
        assert_eq!(LikePattern::containing("").to_string(), "%%");
    }
}
