//! Shared handling of list-endpoint query parameters.
//!
//! Every collection endpoint accepts `page`/`page_size` for page-based
//! pagination, `search` for free-text matching over its named fields, and
//! `ordering` with an optional `-` prefix for descending order. Unknown
//! ordering fields fall back to the resource's default order rather than
//! erroring.

use sea_orm::Order;
use serde::Serialize;

use crate::errors::{Error, Result};

const DEFAULT_PAGE_SIZE: u64 = 10;
const MAX_PAGE_SIZE: u64 = 100;

/// Envelope returned by every list endpoint.
#[derive(Debug, Serialize)]
pub struct ListEnvelope<T> {
    /// Total number of matching records, across all pages.
    pub count: u64,
    /// The records of the requested page.
    pub results: Vec<T>,
}

/// Normalized pagination window.
#[derive(Debug, Clone, Copy)]
pub struct Pager {
    /// 1-based page number.
    pub page: u64,
    /// Records per page, clamped to a sane range.
    pub page_size: u64,
}

impl Pager {
    /// Normalizes raw query values: page defaults to 1, page size defaults
    /// to 10 and is clamped to 1..=100.
    pub fn from_params(page: Option<u64>, page_size: Option<u64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: page_size
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// 0-based page index for the paginator.
    pub fn index(self) -> u64 {
        self.page - 1
    }
}

/// Splits an `ordering` value into its field name and direction
/// (`-field` means descending).
pub fn parse_ordering(raw: Option<&str>) -> Option<(&str, Order)> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    raw.strip_prefix('-')
        .map_or(Some((raw, Order::Asc)), |field| {
            Some((field, Order::Desc))
        })
}

/// Unwraps a required payload field, reporting the missing field by name.
pub fn required<T>(value: Option<T>, field: &'static str) -> Result<T> {
    value.ok_or(Error::Validation {
        field,
        message: "This field is required.".to_string(),
    })
}

/// Normalizes a `search` term: trimmed, `None` when empty.
pub fn search_term(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|term| !term.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pager_defaults_and_clamping() {
        let pager = Pager::from_params(None, None);
        assert_eq!(pager.page, 1);
        assert_eq!(pager.page_size, 10);
        assert_eq!(pager.index(), 0);

        let pager = Pager::from_params(Some(0), Some(1000));
        assert_eq!(pager.page, 1);
        assert_eq!(pager.page_size, 100);

        let pager = Pager::from_params(Some(3), Some(25));
        assert_eq!(pager.page, 3);
        assert_eq!(pager.index(), 2);
    }

    #[test]
    fn test_parse_ordering() {
        assert!(parse_ordering(None).is_none());
        assert!(parse_ordering(Some("")).is_none());
        assert!(matches!(
            parse_ordering(Some("name")),
            Some(("name", Order::Asc))
        ));
        assert!(matches!(
            parse_ordering(Some("-created_at")),
            Some(("created_at", Order::Desc))
        ));
    }

    #[test]
    fn test_search_term_normalization() {
        assert_eq!(search_term(None), None);
        assert_eq!(search_term(Some("   ")), None);
        assert_eq!(search_term(Some(" python ")), Some("python"));
    }
}
