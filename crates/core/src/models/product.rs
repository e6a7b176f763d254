//! Catalog record shapes: products, variants, and specifications.
//!
//! A [`Product`] is the unit of the catalog. Cross-field rules (price vs.
//! original price, discount consistency, variant id uniqueness) are checked
//! by [`Product::validate`], which also runs whenever a product is
//! deserialized from the wire.

use core::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::models::{Entity, check_timestamp_order};
use crate::types::{ProductId, Slug, VariantId};

/// Closed set of catalog categories.
///
/// Serialized as the lowercase strings `laptop` and `smartphone`; anything
/// else is rejected at the wire boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ProductCategory {
    Laptop,
    Smartphone,
}

impl ProductCategory {
    /// The wire string for this category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Laptop => "laptop",
            Self::Smartphone => "smartphone",
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProductCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "laptop" => Ok(Self::Laptop),
            "smartphone" => Ok(Self::Smartphone),
            other => Err(ValidationError::UnknownCategory(other.to_owned())),
        }
    }
}

impl TryFrom<String> for ProductCategory {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Which attribute of its parent product a variant modifies.
///
/// Serialized as the lowercase strings `color`, `storage`, and `ram`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum VariantType {
    Color,
    Storage,
    Ram,
}

impl VariantType {
    /// The wire string for this variant type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Storage => "storage",
            Self::Ram => "ram",
        }
    }
}

impl fmt::Display for VariantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VariantType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "color" => Ok(Self::Color),
            "storage" => Ok(Self::Storage),
            "ram" => Ok(Self::Ram),
            other => Err(ValidationError::UnknownVariantType(other.to_owned())),
        }
    }
}

impl TryFrom<String> for VariantType {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// A free-form label/value pair shown on the product page.
///
/// Order is display-significant and labels may repeat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specification {
    /// Display label (e.g., "Screen size").
    pub label: String,
    /// Display value (e.g., "14.2 inches").
    pub value: String,
}

/// A purchasable option of a product (a color, a storage tier, ...).
///
/// Variant ids are unique within their parent product only. When a variant
/// is selected, its own `stock` governs availability, not the parent's, and
/// `price_adjustment` is added to the parent's price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    /// Variant id, unique within the parent product.
    pub id: VariantId,
    /// Which attribute this variant modifies.
    #[serde(rename = "type")]
    pub kind: VariantType,
    /// Display label (e.g., "Midnight Blue").
    pub name: String,
    /// The concrete attribute value (e.g., a color name or "512GB").
    pub value: String,
    /// Signed delta applied to the parent product's price when selected.
    pub price_adjustment: Decimal,
    /// Units available for this variant, independent of the parent's stock.
    pub stock: u32,
}

/// A product in the catalog.
///
/// Construct by struct literal and call [`Product::validate`] before letting
/// the value cross a boundary; deserialization validates automatically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawProduct")]
pub struct Product {
    /// Unique product id.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// URL handle, unique within the catalog.
    pub slug: Slug,
    /// Catalog category.
    pub category: ProductCategory,
    /// Brand name.
    pub brand: String,
    /// Current sale price. Non-negative.
    pub price: Decimal,
    /// Pre-sale price, when the product is discounted. Never below `price`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Decimal>,
    /// Discount percentage. Must agree with `price` and `original_price`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<Decimal>,
    /// Gallery image URLs, in display order. May be empty.
    pub images: Vec<String>,
    /// Designated listing image. Conventionally `images[0]`, but the two are
    /// independently settable.
    pub thumbnail: String,
    /// Long-form description.
    pub description: String,
    /// Display attributes, in display order.
    pub specifications: Vec<Specification>,
    /// Purchasable options. May be empty.
    pub variants: Vec<ProductVariant>,
    /// Units available excluding variant-level stock.
    pub stock: u32,
    /// Average review rating on a 0-5 scale. Zero when unreviewed.
    pub rating: f64,
    /// Number of reviews behind `rating`.
    pub review_count: u32,
    /// Free-form labels for filtering and search.
    pub tags: Vec<String>,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Tolerance for comparing a supplied discount percentage against the
    /// one derived from the price pair, in percentage points.
    fn discount_tolerance() -> Decimal {
        Decimal::new(1, 1) // 0.1
    }

    /// The discount percentage derived from `price` and `original_price`,
    /// rounded to two decimal places. `None` when the product carries no
    /// original price.
    #[must_use]
    pub fn discount_percent(&self) -> Option<Decimal> {
        let original = self.original_price?;
        Some(Self::derive_discount(original, self.price))
    }

    fn derive_discount(original: Decimal, price: Decimal) -> Decimal {
        if original.is_zero() {
            return Decimal::ZERO;
        }
        ((original - price) / original * Decimal::ONE_HUNDRED).round_dp(2)
    }

    /// Check every cross-field invariant of the product.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the audit timestamps are out of
    /// order, a price is negative, the original price undercuts the sale
    /// price, the discount disagrees with the price pair, the rating is
    /// outside the 0-5 scale or unbacked by reviews, or two variants share
    /// an id.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_timestamp_order("product", self.created_at, self.updated_at)?;

        if self.price < Decimal::ZERO {
            return Err(ValidationError::NegativePrice {
                field: "product.price",
                amount: self.price,
            });
        }

        if let Some(original) = self.original_price
            && original < self.price
        {
            return Err(ValidationError::OriginalPriceBelowPrice {
                original,
                price: self.price,
            });
        }

        if let Some(discount) = self.discount {
            let Some(original) = self.original_price else {
                return Err(ValidationError::DiscountWithoutOriginalPrice);
            };
            let expected = Self::derive_discount(original, self.price);
            if (discount - expected).abs() > Self::discount_tolerance() {
                return Err(ValidationError::DiscountMismatch {
                    given: discount,
                    expected,
                });
            }
        }

        if !(0.0..=5.0).contains(&self.rating) {
            return Err(ValidationError::RatingOutOfRange(self.rating));
        }
        if self.review_count == 0 && self.rating != 0.0 {
            return Err(ValidationError::RatingWithoutReviews(self.rating));
        }

        let mut seen = std::collections::HashSet::new();
        for variant in &self.variants {
            if !seen.insert(variant.id.as_str()) {
                return Err(ValidationError::DuplicateVariantId(
                    variant.id.as_str().to_owned(),
                ));
            }
        }

        Ok(())
    }

    /// Look up a variant of this product by id.
    #[must_use]
    pub fn variant(&self, id: &VariantId) -> Option<&ProductVariant> {
        self.variants.iter().find(|v| v.id == *id)
    }
}

impl Entity for Product {
    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Unvalidated wire mirror of [`Product`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProduct {
    id: ProductId,
    name: String,
    slug: Slug,
    category: ProductCategory,
    brand: String,
    price: Decimal,
    #[serde(default)]
    original_price: Option<Decimal>,
    #[serde(default)]
    discount: Option<Decimal>,
    images: Vec<String>,
    thumbnail: String,
    description: String,
    specifications: Vec<Specification>,
    variants: Vec<ProductVariant>,
    stock: u32,
    rating: f64,
    review_count: u32,
    tags: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RawProduct> for Product {
    type Error = ValidationError;

    fn try_from(raw: RawProduct) -> Result<Self, Self::Error> {
        let product = Self {
            id: raw.id,
            name: raw.name,
            slug: raw.slug,
            category: raw.category,
            brand: raw.brand,
            price: raw.price,
            original_price: raw.original_price,
            discount: raw.discount,
            images: raw.images,
            thumbnail: raw.thumbnail,
            description: raw.description,
            specifications: raw.specifications,
            variants: raw.variants,
            stock: raw.stock,
            rating: raw.rating,
            review_count: raw.review_count,
            tags: raw.tags,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
        };
        product.validate()?;
        Ok(product)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use chrono::TimeZone;

    use super::*;

    pub(crate) fn sample_product() -> Product {
        Product {
            id: ProductId::new("prod-1"),
            name: "Voltbook Pro 14".to_string(),
            slug: Slug::parse("voltbook-pro-14").unwrap(),
            category: ProductCategory::Laptop,
            brand: "Voltbook".to_string(),
            price: Decimal::new(100, 0),
            original_price: Some(Decimal::new(120, 0)),
            discount: Some(Decimal::new(1667, 2)),
            images: vec![
                "https://cdn.example.com/voltbook-front.jpg".to_string(),
                "https://cdn.example.com/voltbook-side.jpg".to_string(),
            ],
            thumbnail: "https://cdn.example.com/voltbook-thumb.jpg".to_string(),
            description: "A 14-inch workstation laptop.".to_string(),
            specifications: vec![
                Specification {
                    label: "Screen size".to_string(),
                    value: "14.2 inches".to_string(),
                },
                Specification {
                    label: "Weight".to_string(),
                    value: "1.6 kg".to_string(),
                },
            ],
            variants: vec![
                ProductVariant {
                    id: VariantId::new("v-silver"),
                    kind: VariantType::Color,
                    name: "Silver".to_string(),
                    value: "silver".to_string(),
                    price_adjustment: Decimal::ZERO,
                    stock: 4,
                },
                ProductVariant {
                    id: VariantId::new("v-1tb"),
                    kind: VariantType::Storage,
                    name: "1TB SSD".to_string(),
                    value: "1TB".to_string(),
                    price_adjustment: Decimal::new(50, 0),
                    stock: 2,
                },
            ],
            stock: 9,
            rating: 4.5,
            review_count: 12,
            tags: vec!["workstation".to_string(), "new".to_string()],
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 3, 5, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_valid_product_passes() {
        assert!(sample_product().validate().is_ok());
    }

    #[test]
    fn test_thumbnail_independent_of_images() {
        // sample_product's thumbnail is not images[0] on purpose
        let product = sample_product();
        assert_ne!(product.thumbnail, product.images[0]);
        assert!(product.validate().is_ok());
    }

    #[test]
    fn test_discount_percent_derivation() {
        let product = sample_product();
        assert_eq!(product.discount_percent(), Some(Decimal::new(1667, 2)));
    }

    #[test]
    fn test_discount_mismatch_rejected() {
        let mut product = sample_product();
        product.discount = Some(Decimal::new(30, 0));
        assert!(matches!(
            product.validate(),
            Err(ValidationError::DiscountMismatch { .. })
        ));
    }

    #[test]
    fn test_discount_within_tolerance_accepted() {
        let mut product = sample_product();
        // 16.67 derived; 16.7 is within 0.1 percentage points
        product.discount = Some(Decimal::new(167, 1));
        assert!(product.validate().is_ok());
    }

    #[test]
    fn test_discount_without_original_price_rejected() {
        let mut product = sample_product();
        product.original_price = None;
        assert!(matches!(
            product.validate(),
            Err(ValidationError::DiscountWithoutOriginalPrice)
        ));
    }

    #[test]
    fn test_original_price_below_price_rejected() {
        let mut product = sample_product();
        product.original_price = Some(Decimal::new(80, 0));
        product.discount = None;
        assert!(matches!(
            product.validate(),
            Err(ValidationError::OriginalPriceBelowPrice { .. })
        ));
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut product = sample_product();
        product.price = Decimal::new(-1, 0);
        product.original_price = None;
        product.discount = None;
        assert!(matches!(
            product.validate(),
            Err(ValidationError::NegativePrice { .. })
        ));
    }

    #[test]
    fn test_rating_bounds() {
        let mut product = sample_product();
        product.rating = 5.1;
        assert!(matches!(
            product.validate(),
            Err(ValidationError::RatingOutOfRange(_))
        ));

        product.rating = 4.0;
        product.review_count = 0;
        assert!(matches!(
            product.validate(),
            Err(ValidationError::RatingWithoutReviews(_))
        ));

        product.rating = 0.0;
        assert!(product.validate().is_ok());
    }

    #[test]
    fn test_duplicate_variant_ids_rejected() {
        let mut product = sample_product();
        let mut duplicate = product.variants[0].clone();
        duplicate.kind = VariantType::Ram;
        product.variants.push(duplicate);
        assert!(matches!(
            product.validate(),
            Err(ValidationError::DuplicateVariantId(_))
        ));
    }

    #[test]
    fn test_timestamp_order_rejected_on_deserialize() {
        let mut value = serde_json::to_value(sample_product()).unwrap();
        value["createdAt"] = serde_json::json!("2024-03-10T09:00:00Z");
        let result: Result<Product, _> = serde_json::from_value(value);
        assert!(result.is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let product = sample_product();
        let json = serde_json::to_string(&product).unwrap();
        let parsed: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, product);
    }

    #[test]
    fn test_wire_field_names() {
        let json = serde_json::to_value(sample_product()).unwrap();
        assert!(json.get("originalPrice").is_some());
        assert!(json.get("reviewCount").is_some());
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["category"], "laptop");
        assert_eq!(json["variants"][0]["type"], "color");
        assert!(json["variants"][1].get("priceAdjustment").is_some());
    }

    #[test]
    fn test_unknown_category_rejected() {
        let mut value = serde_json::to_value(sample_product()).unwrap();
        value["category"] = serde_json::json!("tablet");
        let result: Result<Product, _> = serde_json::from_value(value);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown product category"));
    }

    #[test]
    fn test_unknown_variant_type_rejected() {
        let result: Result<VariantType, _> = serde_json::from_str("\"size\"");
        assert!(result.is_err());
        assert!(matches!(
            "size".parse::<VariantType>(),
            Err(ValidationError::UnknownVariantType(_))
        ));
    }

    #[test]
    fn test_category_strings() {
        assert_eq!(ProductCategory::Laptop.as_str(), "laptop");
        assert_eq!(
            "smartphone".parse::<ProductCategory>().unwrap(),
            ProductCategory::Smartphone
        );
    }
}
