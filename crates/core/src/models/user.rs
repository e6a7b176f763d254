//! User account and address book shapes.
//!
//! The address book enforces one rule everywhere: at most one address is the
//! default, and `default_address_id` always names it. The list and the
//! reference are private so every mutation goes through methods that keep
//! the two signals in lockstep.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::models::{Entity, check_timestamp_order};
use crate::types::{AddressId, Email, UserId};

/// A shipping address owned by exactly one user.
///
/// The location fields are hierarchical (province down to street); all are
/// required and none are cross-validated against a gazetteer here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Address id, referenced by the owning user's `default_address_id`.
    pub id: AddressId,
    /// Recipient name.
    pub full_name: String,
    /// Contact phone for delivery.
    pub phone: String,
    /// Province or city.
    pub province: String,
    /// District within the province.
    pub district: String,
    /// Ward within the district.
    pub ward: String,
    /// Street address.
    pub street: String,
    /// Whether this is the user's default shipping address.
    pub is_default: bool,
}

/// A storefront customer account.
///
/// `email` is unique per user and doubles as the natural lookup key, though
/// `id` remains the primary key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawUser")]
pub struct User {
    /// Unique user id.
    pub id: UserId,
    /// The user's email address, unique across users.
    pub email: Email,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact phone, if provided.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Avatar image URL, if provided.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Address book, owned exclusively by this user.
    addresses: Vec<Address>,
    /// Id of the default address, when one is chosen.
    #[serde(skip_serializing_if = "Option::is_none")]
    default_address_id: Option<AddressId>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a user with an empty address book.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::TimestampOrder`] if `updated_at` precedes
    /// `created_at`.
    pub fn new(
        id: UserId,
        email: Email,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        check_timestamp_order("user", created_at, updated_at)?;
        Ok(Self {
            id,
            email,
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone: None,
            avatar: None,
            addresses: Vec::new(),
            default_address_id: None,
            created_at,
            updated_at,
        })
    }

    /// The user's display name.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// The address book, in insertion order.
    #[must_use]
    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    /// Id of the default address, if one is chosen.
    #[must_use]
    pub const fn default_address_id(&self) -> Option<&AddressId> {
        self.default_address_id.as_ref()
    }

    /// The default address, resolved through `default_address_id` or, when
    /// only the flag was provided at the boundary, through `is_default`.
    #[must_use]
    pub fn default_address(&self) -> Option<&Address> {
        if let Some(id) = &self.default_address_id {
            return self.addresses.iter().find(|a| a.id == *id);
        }
        self.addresses.iter().find(|a| a.is_default)
    }

    /// Add an address to the book.
    ///
    /// An address arriving with `is_default = true` displaces any previous
    /// default (the most recently marked one wins).
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateAddressId`] if the book already
    /// holds an address with the same id.
    pub fn add_address(&mut self, address: Address) -> Result<(), ValidationError> {
        if self.addresses.iter().any(|a| a.id == address.id) {
            return Err(ValidationError::DuplicateAddressId(
                address.id.as_str().to_owned(),
            ));
        }
        if address.is_default {
            for existing in &mut self.addresses {
                existing.is_default = false;
            }
            self.default_address_id = Some(address.id.clone());
        }
        self.addresses.push(address);
        Ok(())
    }

    /// Remove an address by id, returning it if it was present.
    ///
    /// Removing the default address clears `default_address_id`.
    pub fn remove_address(&mut self, id: &AddressId) -> Option<Address> {
        let position = self.addresses.iter().position(|a| a.id == *id)?;
        let removed = self.addresses.remove(position);
        if self.default_address_id.as_ref() == Some(id) {
            self.default_address_id = None;
        }
        Some(removed)
    }

    /// Make the address with the given id the default.
    ///
    /// Rewrites every `is_default` flag so exactly one is set.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DefaultAddressNotFound`] if no address in
    /// the book has that id.
    pub fn set_default_address(&mut self, id: &AddressId) -> Result<(), ValidationError> {
        if !self.addresses.iter().any(|a| a.id == *id) {
            return Err(ValidationError::DefaultAddressNotFound(
                id.as_str().to_owned(),
            ));
        }
        for address in &mut self.addresses {
            address.is_default = address.id == *id;
        }
        self.default_address_id = Some(id.clone());
        Ok(())
    }

    /// Clear the default address selection entirely.
    pub fn clear_default_address(&mut self) {
        for address in &mut self.addresses {
            address.is_default = false;
        }
        self.default_address_id = None;
    }

    /// Check the address-book invariants on an assembled user.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the audit timestamps are out of
    /// order, two addresses share an id, more than one address is flagged
    /// default, `default_address_id` names a missing address, or the flagged
    /// address disagrees with the referenced one.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_timestamp_order("user", self.created_at, self.updated_at)?;

        let mut seen = std::collections::HashSet::new();
        for address in &self.addresses {
            if !seen.insert(address.id.as_str()) {
                return Err(ValidationError::DuplicateAddressId(
                    address.id.as_str().to_owned(),
                ));
            }
        }

        let flagged: Vec<&Address> = self.addresses.iter().filter(|a| a.is_default).collect();
        if flagged.len() > 1 {
            return Err(ValidationError::MultipleDefaultAddresses(flagged.len()));
        }

        if let Some(id) = &self.default_address_id {
            if !self.addresses.iter().any(|a| a.id == *id) {
                return Err(ValidationError::DefaultAddressNotFound(
                    id.as_str().to_owned(),
                ));
            }
            if let Some(flag) = flagged.first()
                && flag.id != *id
            {
                return Err(ValidationError::DefaultAddressMismatch {
                    flagged: flag.id.as_str().to_owned(),
                    referenced: id.as_str().to_owned(),
                });
            }
        }

        Ok(())
    }
}

impl Entity for User {
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

/// Unvalidated wire mirror of [`User`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawUser {
    id: UserId,
    email: Email,
    first_name: String,
    last_name: String,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    avatar: Option<String>,
    addresses: Vec<Address>,
    #[serde(default)]
    default_address_id: Option<AddressId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RawUser> for User {
    type Error = ValidationError;

    fn try_from(raw: RawUser) -> Result<Self, Self::Error> {
        let user = Self {
            id: raw.id,
            email: raw.email,
            first_name: raw.first_name,
            last_name: raw.last_name,
            phone: raw.phone,
            avatar: raw.avatar,
            addresses: raw.addresses,
            default_address_id: raw.default_address_id,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
        };
        user.validate()?;
        Ok(user)
    }
}
