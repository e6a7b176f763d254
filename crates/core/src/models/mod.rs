//! Domain record shapes for the Voltmart storefront.
//!
//! These types represent validated domain objects, not database rows or raw
//! wire payloads. Whatever produces them - an API layer, a storage layer -
//! owns their lifecycle; the types themselves carry no I/O.

pub mod cart;
pub mod product;
pub mod user;

pub use cart::{Cart, CartItem};
pub use product::{Product, ProductCategory, ProductVariant, Specification, VariantType};
pub use user::{Address, User};

use chrono::{DateTime, Utc};

use crate::error::ValidationError;

/// Common shape of every top-level record: a stable string identifier plus
/// audit timestamps.
pub trait Entity {
    /// The stable, unique identifier of this record.
    fn id(&self) -> &str;

    /// When the record was created.
    fn created_at(&self) -> DateTime<Utc>;

    /// When the record was last updated. Never precedes [`created_at`].
    ///
    /// [`created_at`]: Entity::created_at
    fn updated_at(&self) -> DateTime<Utc>;
}

/// Check the audit-timestamp ordering invariant shared by all entities.
pub(crate) fn check_timestamp_order(
    entity: &'static str,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
) -> Result<(), ValidationError> {
    if updated_at < created_at {
        return Err(ValidationError::TimestampOrder {
            entity,
            created_at,
            updated_at,
        });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::models::product::tests::sample_product;
    use crate::types::{CartId, Email, UserId};

    fn audit_line<E: Entity>(entity: &E) -> String {
        format!("{} ({} -> {})", entity.id(), entity.created_at(), entity.updated_at())
    }

    #[test]
    fn test_entity_is_implemented_by_every_record() {
        let product = sample_product();
        assert!(audit_line(&product).starts_with("prod-1 ("));

        let user = User::new(
            UserId::new("user-1"),
            Email::parse("shopper@example.com").unwrap(),
            "An",
            "Nguyen",
            Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap(),
        )
        .unwrap();
        assert_eq!(user.created_at(), Entity::created_at(&user));

        let cart = Cart::new(
            CartId::new("cart-1"),
            Utc.with_ymd_and_hms(2024, 3, 10, 10, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 10, 10, 0, 0).unwrap(),
        )
        .unwrap();
        assert_eq!(Entity::id(&cart), "cart-1");
    }

    #[test]
    fn test_timestamp_order() {
        let earlier = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 3, 2, 12, 0, 0).unwrap();

        assert!(check_timestamp_order("product", earlier, later).is_ok());
        assert!(check_timestamp_order("product", earlier, earlier).is_ok());
        assert!(matches!(
            check_timestamp_order("product", later, earlier),
            Err(ValidationError::TimestampOrder { entity: "product", .. })
        ));
    }
}
