//! Validation error taxonomy.
//!
//! Every error in this crate is raised at a construction or deserialization
//! boundary - there is no deeper business logic to fail in. Callers decide
//! how to surface these; nothing here is retried or swallowed.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::{EmailError, SlugError};

/// Broad classification of a [`ValidationError`].
///
/// Useful for callers that map failures to transport-level responses
/// (e.g., all three map to a 400, but with different client guidance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    /// A required field is missing or holds a malformed value.
    Shape,
    /// A closed enumeration received a value outside its set.
    Enum,
    /// A cross-field invariant does not hold.
    Invariant,
}

/// A validation failure raised while constructing or deserializing a record.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// An email field failed to parse.
    #[error("invalid email: {0}")]
    Email(#[from] EmailError),

    /// A slug field failed to parse.
    #[error("invalid slug: {0}")]
    Slug(#[from] SlugError),

    /// A monetary field holds a negative amount.
    #[error("{field} must be non-negative, got {amount}")]
    NegativePrice {
        /// The offending field, e.g. `product.price`.
        field: &'static str,
        /// The rejected amount.
        amount: Decimal,
    },

    /// A rating average lies outside the 0-5 scale.
    #[error("rating {0} is outside the 0-5 scale")]
    RatingOutOfRange(f64),

    /// A cart line was given a quantity of zero.
    #[error("quantity must be at least 1")]
    ZeroQuantity,

    /// A page index of zero was supplied (pages are 1-based).
    #[error("page is 1-based and must be at least 1")]
    ZeroPage,

    /// A page size of zero was supplied.
    #[error("page size must be at least 1")]
    ZeroPageSize,

    /// A product category outside the closed set.
    #[error("unknown product category `{0}`, expected `laptop` or `smartphone`")]
    UnknownCategory(String),

    /// A variant type outside the closed set.
    #[error("unknown variant type `{0}`, expected `color`, `storage`, or `ram`")]
    UnknownVariantType(String),

    /// An entity's audit timestamps are out of order.
    #[error("{entity} updated at {updated_at} before it was created at {created_at}")]
    TimestampOrder {
        /// The entity being validated.
        entity: &'static str,
        /// Creation timestamp.
        created_at: DateTime<Utc>,
        /// Last-update timestamp.
        updated_at: DateTime<Utc>,
    },

    /// A product's original price undercuts its sale price.
    #[error("original price {original} is below the sale price {price}")]
    OriginalPriceBelowPrice {
        /// The pre-sale price.
        original: Decimal,
        /// The current sale price.
        price: Decimal,
    },

    /// A discount was supplied without an original price to discount from.
    #[error("discount requires an original price")]
    DiscountWithoutOriginalPrice,

    /// A supplied discount percentage disagrees with the price pair.
    #[error("discount {given}% does not match the derived {expected}%")]
    DiscountMismatch {
        /// The discount the record carried.
        given: Decimal,
        /// The discount derived from original price and sale price.
        expected: Decimal,
    },

    /// A non-zero rating on a product nobody has reviewed.
    #[error("rating {0} is meaningless with zero reviews")]
    RatingWithoutReviews(f64),

    /// Two variants of one product share an id.
    #[error("duplicate variant id `{0}` within one product")]
    DuplicateVariantId(String),

    /// A cart line references a variant its product snapshot does not carry.
    #[error("variant `{variant}` does not belong to product `{product}`")]
    VariantNotInProduct {
        /// The requested variant id.
        variant: String,
        /// The product the variant was looked up in.
        product: String,
    },

    /// Two addresses in one address book share an id.
    #[error("duplicate address id `{0}`")]
    DuplicateAddressId(String),

    /// `defaultAddressId` names an address the user does not have.
    #[error("default address `{0}` not found in the address book")]
    DefaultAddressNotFound(String),

    /// More than one address claims to be the default.
    #[error("{0} addresses marked as default, at most one allowed")]
    MultipleDefaultAddresses(usize),

    /// The flagged default address is not the one `defaultAddressId` names.
    #[error("address `{flagged}` is flagged default but `{referenced}` is referenced")]
    DefaultAddressMismatch {
        /// The address carrying `isDefault = true`.
        flagged: String,
        /// The address `defaultAddressId` points at.
        referenced: String,
    },

    /// Two lines in one cart share an id.
    #[error("duplicate cart item id `{0}`")]
    DuplicateCartItemId(String),

    /// A supplied `totalPages` disagrees with `total` and `pageSize`.
    #[error("totalPages {given} inconsistent with total {total} and page size {page_size}")]
    TotalPagesMismatch {
        /// The value the record carried.
        given: u64,
        /// Total matching record count.
        total: u64,
        /// Requested page size.
        page_size: u64,
    },

    /// A page carries more items than its page size allows.
    #[error("page of {len} items exceeds the page size {page_size}")]
    PageOverflow {
        /// Number of items on the page.
        len: usize,
        /// Maximum items per page.
        page_size: u64,
    },
}

impl ValidationError {
    /// Classify this error into the shape / enum / invariant taxonomy.
    #[must_use]
    pub const fn kind(&self) -> ValidationErrorKind {
        match self {
            Self::Email(_)
            | Self::Slug(_)
            | Self::NegativePrice { .. }
            | Self::RatingOutOfRange(_)
            | Self::ZeroQuantity
            | Self::ZeroPage
            | Self::ZeroPageSize => ValidationErrorKind::Shape,

            Self::UnknownCategory(_) | Self::UnknownVariantType(_) => ValidationErrorKind::Enum,

            Self::TimestampOrder { .. }
            | Self::OriginalPriceBelowPrice { .. }
            | Self::DiscountWithoutOriginalPrice
            | Self::DiscountMismatch { .. }
            | Self::RatingWithoutReviews(_)
            | Self::DuplicateVariantId(_)
            | Self::VariantNotInProduct { .. }
            | Self::DuplicateAddressId(_)
            | Self::DefaultAddressNotFound(_)
            | Self::MultipleDefaultAddresses(_)
            | Self::DefaultAddressMismatch { .. }
            | Self::DuplicateCartItemId(_)
            | Self::TotalPagesMismatch { .. }
            | Self::PageOverflow { .. } => ValidationErrorKind::Invariant,
        }
    }
}
