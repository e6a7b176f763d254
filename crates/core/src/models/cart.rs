//! Shopping cart shapes.
//!
//! A cart line owns a full snapshot of the product (and selected variant) as
//! they were when the line was added. Catalog edits after that point do not
//! reach into existing carts; [`CartItem::reprice_from`] is the one explicit
//! way to refresh a line.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::models::product::{Product, ProductVariant};
use crate::models::{Entity, check_timestamp_order};
use crate::types::{CartId, CartItemId, VariantId};

/// A line in a shopping cart.
///
/// [`CartItem::new`] is the single construction path: it resolves the
/// selected variant, captures the effective unit price, and snapshots the
/// product. The captured `price` is never recomputed implicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawCartItem")]
pub struct CartItem {
    /// Line id, unique within its cart.
    pub id: CartItemId,
    /// Snapshot of the product at the time the line was added.
    pub product: Product,
    /// Snapshot of the selected variant, when one was selected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<ProductVariant>,
    /// Number of units. At least 1.
    pub quantity: u32,
    /// Effective unit price captured at add time: the product price plus the
    /// selected variant's adjustment.
    pub price: Decimal,
}

impl CartItem {
    /// Create a cart line from a product snapshot.
    ///
    /// When `variant_id` is given, the variant is resolved inside
    /// `product.variants` and its `price_adjustment` is folded into the
    /// captured unit price.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ZeroQuantity`] for a quantity of zero and
    /// [`ValidationError::VariantNotInProduct`] when `variant_id` does not
    /// resolve.
    pub fn new(
        id: CartItemId,
        product: Product,
        variant_id: Option<&VariantId>,
        quantity: u32,
    ) -> Result<Self, ValidationError> {
        if quantity == 0 {
            return Err(ValidationError::ZeroQuantity);
        }

        let variant = match variant_id {
            Some(variant_id) => Some(
                product
                    .variant(variant_id)
                    .cloned()
                    .ok_or_else(|| ValidationError::VariantNotInProduct {
                        variant: variant_id.as_str().to_owned(),
                        product: product.id.as_str().to_owned(),
                    })?,
            ),
            None => None,
        };

        let price = Self::effective_price(&product, variant.as_ref());

        Ok(Self {
            id,
            product,
            variant,
            quantity,
            price,
        })
    }

    fn effective_price(product: &Product, variant: Option<&ProductVariant>) -> Decimal {
        variant.map_or(product.price, |v| product.price + v.price_adjustment)
    }

    /// Total for this line: captured unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }

    /// Explicitly refresh this line against the current catalog product.
    ///
    /// Replaces the product and variant snapshots and recaptures the unit
    /// price through the same computation as [`CartItem::new`]. The previous
    /// variant selection is kept, resolved by id in the new snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::VariantNotInProduct`] when the previously
    /// selected variant no longer exists on the product.
    pub fn reprice_from(&mut self, product: Product) -> Result<(), ValidationError> {
        let variant = match &self.variant {
            Some(selected) => Some(
                product
                    .variant(&selected.id)
                    .cloned()
                    .ok_or_else(|| ValidationError::VariantNotInProduct {
                        variant: selected.id.as_str().to_owned(),
                        product: product.id.as_str().to_owned(),
                    })?,
            ),
            None => None,
        };

        self.price = Self::effective_price(&product, variant.as_ref());
        self.product = product;
        self.variant = variant;
        Ok(())
    }

    /// Check the line's structural invariants.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the quantity is zero or the embedded
    /// variant does not belong to the embedded product snapshot.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.quantity == 0 {
            return Err(ValidationError::ZeroQuantity);
        }
        if let Some(variant) = &self.variant
            && self.product.variant(&variant.id).is_none()
        {
            return Err(ValidationError::VariantNotInProduct {
                variant: variant.id.as_str().to_owned(),
                product: self.product.id.as_str().to_owned(),
            });
        }
        Ok(())
    }
}

/// A shopping cart: an identified, audited collection of lines.
///
/// Line ids are unique within the cart; the list is private so additions go
/// through [`Cart::add_item`], which enforces that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawCart")]
pub struct Cart {
    /// Unique cart id.
    pub id: CartId,
    /// Cart lines, in insertion order.
    items: Vec<CartItem>,
    /// When the cart was created.
    pub created_at: DateTime<Utc>,
    /// When the cart was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// Create an empty cart.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::TimestampOrder`] if `updated_at` precedes
    /// `created_at`.
    pub fn new(
        id: CartId,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        check_timestamp_order("cart", created_at, updated_at)?;
        Ok(Self {
            id,
            items: Vec::new(),
            created_at,
            updated_at,
        })
    }

    /// The cart lines, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of lines (not units) in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Add a line to the cart.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateCartItemId`] if the cart already
    /// holds a line with the same id.
    pub fn add_item(&mut self, item: CartItem) -> Result<(), ValidationError> {
        if self.items.iter().any(|i| i.id == item.id) {
            return Err(ValidationError::DuplicateCartItemId(
                item.id.as_str().to_owned(),
            ));
        }
        self.items.push(item);
        Ok(())
    }

    /// Remove a line by id, returning it if it was present.
    pub fn remove_item(&mut self, id: &CartItemId) -> Option<CartItem> {
        let position = self.items.iter().position(|i| i.id == *id)?;
        Some(self.items.remove(position))
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Sum of every line's total.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Check the cart's structural invariants.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the audit timestamps are out of
    /// order or two lines share an id.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_timestamp_order("cart", self.created_at, self.updated_at)?;

        let mut seen = std::collections::HashSet::new();
        for item in &self.items {
            if !seen.insert(item.id.as_str()) {
                return Err(ValidationError::DuplicateCartItemId(
                    item.id.as_str().to_owned(),
                ));
            }
        }
        Ok(())
    }
}

impl Entity for Cart {
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

/// Unvalidated wire mirror of [`CartItem`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCartItem {
    id: CartItemId,
    product: Product,
    #[serde(default)]
    variant: Option<ProductVariant>,
    quantity: u32,
    price: Decimal,
}

impl TryFrom<RawCartItem> for CartItem {
    type Error = ValidationError;

    fn try_from(raw: RawCartItem) -> Result<Self, Self::Error> {
        let item = Self {
            id: raw.id,
            product: raw.product,
            variant: raw.variant,
            quantity: raw.quantity,
            price: raw.price,
        };
        item.validate()?;
        Ok(item)
    }
}

/// Unvalidated wire mirror of [`Cart`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCart {
    id: CartId,
    items: Vec<CartItem>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RawCart> for Cart {
    type Error = ValidationError;

    fn try_from(raw: RawCart) -> Result<Self, Self::Error> {
        let cart = Self {
            id: raw.id,
            items: raw.items,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
        };
        cart.validate()?;
        Ok(cart)
    }
}
