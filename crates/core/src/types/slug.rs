//! URL-safe product handle type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Slug`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SlugError {
    /// The input string is empty.
    #[error("slug cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("slug must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `a-z`, `0-9`, and `-`.
    #[error("slug may only contain lowercase letters, digits, and hyphens")]
    InvalidCharacter,
    /// The input starts or ends with a hyphen, or contains a double hyphen.
    #[error("slug must not have leading, trailing, or repeated hyphens")]
    BadHyphenation,
}

/// A URL-safe handle identifying a product within the catalog.
///
/// Slugs appear verbatim in storefront URLs, so the character set is
/// restricted to lowercase ASCII letters, digits, and single interior
/// hyphens.
///
/// ## Examples
///
/// ```
/// use voltmart_core::Slug;
///
/// assert!(Slug::parse("macbook-pro-14").is_ok());
///
/// assert!(Slug::parse("MacBook Pro").is_err()); // uppercase and space
/// assert!(Slug::parse("-laptop").is_err());     // leading hyphen
/// assert!(Slug::parse("a--b").is_err());        // double hyphen
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String")]
pub struct Slug(String);

impl Slug {
    /// Maximum length of a slug.
    pub const MAX_LENGTH: usize = 128;

    /// Parse a `Slug` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than 128 characters,
    /// contains a character outside `[a-z0-9-]`, or is badly hyphenated.
    pub fn parse(s: &str) -> Result<Self, SlugError> {
        if s.is_empty() {
            return Err(SlugError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(SlugError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if !s
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
        {
            return Err(SlugError::InvalidCharacter);
        }

        if s.starts_with('-') || s.ends_with('-') || s.contains("--") {
            return Err(SlugError::BadHyphenation);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Slug` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Slug {
    type Err = SlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Slug {
    type Error = SlugError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Slug {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Slug {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Slug {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_slugs() {
        assert!(Slug::parse("macbook-pro-14").is_ok());
        assert!(Slug::parse("iphone15").is_ok());
        assert!(Slug::parse("x").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Slug::parse(""), Err(SlugError::Empty));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "a".repeat(129);
        assert!(matches!(Slug::parse(&long), Err(SlugError::TooLong { .. })));
    }

    #[test]
    fn test_parse_invalid_characters() {
        assert_eq!(Slug::parse("MacBook"), Err(SlugError::InvalidCharacter));
        assert_eq!(Slug::parse("two words"), Err(SlugError::InvalidCharacter));
        assert_eq!(Slug::parse("caf\u{e9}"), Err(SlugError::InvalidCharacter));
    }

    #[test]
    fn test_parse_bad_hyphenation() {
        assert_eq!(Slug::parse("-laptop"), Err(SlugError::BadHyphenation));
        assert_eq!(Slug::parse("laptop-"), Err(SlugError::BadHyphenation));
        assert_eq!(Slug::parse("a--b"), Err(SlugError::BadHyphenation));
    }

    #[test]
    fn test_serde_roundtrip() {
        let slug = Slug::parse("galaxy-s24-ultra").unwrap();
        let json = serde_json::to_string(&slug).unwrap();
        assert_eq!(json, "\"galaxy-s24-ultra\"");

        let parsed: Slug = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, slug);
    }

    #[test]
    fn test_deserialize_rejects_invalid() {
        let result: Result<Slug, _> = serde_json::from_str("\"Not A Slug\"");
        assert!(result.is_err());
    }
}
