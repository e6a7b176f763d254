//! Voltmart Core - Shared domain types library.
//!
//! This crate provides the canonical record shapes used across all Voltmart
//! components:
//! - `storefront` - Public-facing e-commerce site
//! - `admin` - Internal administration panel
//! - `cli` - Command-line tools for catalog management
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! Every structural invariant is checked where a record enters the process:
//! at construction or when deserializing from the wire. Nothing deeper in
//! the crate re-validates, and nothing mutates a record behind the caller's
//! back.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, and slugs
//! - [`models`] - Catalog, user, and cart record shapes
//! - [`api`] - Response envelopes (`ApiResponse`, `PaginatedResponse`)
//! - [`error`] - Validation error taxonomy

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod error;
pub mod models;
pub mod types;

pub use api::*;
pub use error::{ValidationError, ValidationErrorKind};
pub use models::*;
pub use types::*;
