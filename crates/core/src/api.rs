//! Response envelopes shared by every Voltmart API surface.
//!
//! Payloads cross the wire wrapped in one of two shapes: [`ApiResponse`]
//! for single-call outcomes and [`PaginatedResponse`] for pages of results.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Outcome envelope for a single API call.
///
/// `data` is meaningful only when `success` is true. The constructors never
/// produce a failed response carrying data, but the shape does not forbid
/// one arriving off the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    /// Whether the call succeeded.
    pub success: bool,
    /// The payload, when the call succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable diagnostic, typically populated on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// A successful response carrying `data`.
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    /// A successful response carrying `data` and an informational note.
    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        }
    }

    /// A failed response carrying a diagnostic message and no data.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }

    /// The payload, if the call succeeded and carried one.
    pub fn into_data(self) -> Option<T> {
        if self.success { self.data } else { None }
    }
}

/// One page of an ordered result set.
///
/// `total_pages` is derived from `total` and `page_size` at construction and
/// is not independently settable; a wire value that disagrees with the
/// derivation is rejected rather than recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawPaginatedResponse<T>")]
pub struct PaginatedResponse<T> {
    items: Vec<T>,
    total: u64,
    page: u64,
    page_size: u64,
    total_pages: u64,
}

impl<T> PaginatedResponse<T> {
    /// Assemble a page, deriving `total_pages = ceil(total / page_size)`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if `page` is zero (pages are 1-based),
    /// `page_size` is zero, or `items` holds more than `page_size` entries.
    pub fn new(
        items: Vec<T>,
        total: u64,
        page: u64,
        page_size: u64,
    ) -> Result<Self, ValidationError> {
        if page == 0 {
            return Err(ValidationError::ZeroPage);
        }
        if page_size == 0 {
            return Err(ValidationError::ZeroPageSize);
        }
        if items.len() as u64 > page_size {
            return Err(ValidationError::PageOverflow {
                len: items.len(),
                page_size,
            });
        }

        let total_pages = total.div_ceil(page_size);
        Ok(Self {
            items,
            total,
            page,
            page_size,
            total_pages,
        })
    }

    /// The items on this page, in result order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the page and return its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether this page holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total matching record count across all pages.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// 1-based index of this page.
    #[must_use]
    pub const fn page(&self) -> u64 {
        self.page
    }

    /// Requested maximum items per page.
    #[must_use]
    pub const fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Total number of pages: `ceil(total / page_size)`.
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        self.total_pages
    }

    /// Whether there are more pages after this one.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.page < self.total_pages
    }

    /// Whether there are pages before this one.
    #[must_use]
    pub const fn has_previous_page(&self) -> bool {
        self.page > 1
    }
}

/// Unvalidated wire mirror of [`PaginatedResponse`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPaginatedResponse<T> {
    items: Vec<T>,
    total: u64,
    page: u64,
    page_size: u64,
    total_pages: u64,
}

impl<T> TryFrom<RawPaginatedResponse<T>> for PaginatedResponse<T> {
    type Error = ValidationError;

    fn try_from(raw: RawPaginatedResponse<T>) -> Result<Self, Self::Error> {
        let page = Self::new(raw.items, raw.total, raw.page, raw.page_size)?;
        if raw.total_pages != page.total_pages {
            return Err(ValidationError::TotalPagesMismatch {
                given: raw.total_pages,
                total: page.total,
                page_size: page.page_size,
            });
        }
        Ok(page)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::models::product::tests::sample_product;
    use crate::models::Product;

    use super::*;

    #[test]
    fn test_total_pages_derivation() {
        let page = PaginatedResponse::new(vec!["a", "b", "c"], 23, 1, 10).unwrap();
        assert_eq!(page.total_pages(), 3);

        let exact = PaginatedResponse::new(vec!["a"], 20, 2, 10).unwrap();
        assert_eq!(exact.total_pages(), 2);

        let empty = PaginatedResponse::<&str>::new(vec![], 0, 1, 10).unwrap();
        assert_eq!(empty.total_pages(), 0);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_zero_page_and_page_size_rejected() {
        assert!(matches!(
            PaginatedResponse::new(vec!["a"], 1, 0, 10),
            Err(ValidationError::ZeroPage)
        ));
        assert!(matches!(
            PaginatedResponse::new(vec!["a"], 1, 1, 0),
            Err(ValidationError::ZeroPageSize)
        ));
    }

    #[test]
    fn test_page_overflow_rejected() {
        let result = PaginatedResponse::new(vec!["a", "b", "c"], 3, 1, 2);
        assert!(matches!(
            result,
            Err(ValidationError::PageOverflow { len: 3, .. })
        ));
    }

    #[test]
    fn test_page_navigation() {
        let page = PaginatedResponse::new(vec!["a"], 23, 2, 10).unwrap();
        assert!(page.has_next_page());
        assert!(page.has_previous_page());

        let last = PaginatedResponse::new(vec!["a"], 23, 3, 10).unwrap();
        assert!(!last.has_next_page());

        let first = PaginatedResponse::new(vec!["a"], 23, 1, 10).unwrap();
        assert!(!first.has_previous_page());
    }

    #[test]
    fn test_deserialize_rejects_inconsistent_total_pages() {
        let json = r#"{"items":["a"],"total":23,"page":1,"pageSize":10,"totalPages":4}"#;
        let result: Result<PaginatedResponse<String>, _> = serde_json::from_str(json);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("totalPages 4 inconsistent"));
    }

    #[test]
    fn test_paginated_serde_roundtrip() {
        let page = PaginatedResponse::new(vec![sample_product()], 1, 1, 12).unwrap();
        let json = serde_json::to_string(&page).unwrap();
        assert!(json.contains("\"pageSize\":12"));
        assert!(json.contains("\"totalPages\":1"));

        let parsed: PaginatedResponse<Product> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, page);
    }

    #[test]
    fn test_api_response_ok() {
        let response = ApiResponse::ok(sample_product());
        assert!(response.success);
        assert!(response.message.is_none());
        assert_eq!(response.into_data().unwrap().id.as_str(), "prod-1");
    }

    #[test]
    fn test_api_response_failure_omits_data() {
        let response: ApiResponse<Product> = ApiResponse::failure("product not found");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("data").is_none());
        assert_eq!(json["message"], "product not found");
        assert!(response.into_data().is_none());
    }

    #[test]
    fn test_api_response_roundtrip() {
        let response = ApiResponse::ok_with_message(vec![1, 2, 3], "cached");
        let json = serde_json::to_string(&response).unwrap();
        let parsed: ApiResponse<Vec<i32>> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, response);
    }

    #[test]
    fn test_failed_response_with_data_still_parses() {
        // the shape alone does not forbid this combination
        let json = r#"{"success":false,"data":7,"message":"partial"}"#;
        let parsed: ApiResponse<i32> = serde_json::from_str(json).unwrap();
        assert!(!parsed.success);
        assert_eq!(parsed.data, Some(7));
        assert_eq!(parsed.into_data(), None);
    }
}
