//! This modules defines the common functionality for paging data.

use serde::{Deserialize, Serialize};

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The number of items per page when not specified in a request.
    pub default_page_size: u64,
    /// The largest page size a client may request.
    pub max_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

impl PaginationConfig {
    /// Resolve the raw `page` and `limit` query parameters into a [Page].
    ///
    /// Values that are missing, not a number, or less than one fall back to
    /// the defaults. A `limit` over `max_page_size` is clamped.
    pub fn resolve(&self, page: Option<&str>, limit: Option<&str>) -> Page {
        let parse = |raw: Option<&str>| {
            raw.and_then(|value| value.trim().parse::<u64>().ok())
                .filter(|&value| value >= 1)
        };

        Page {
            page: parse(page).unwrap_or(self.default_page),
            limit: parse(limit)
                .unwrap_or(self.default_page_size)
                .min(self.max_page_size),
        }
    }
}

/// A page of data, starting from page one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// The one-based page number.
    pub page: u64,
    /// The maximum number of items on the page.
    pub limit: u64,
}

impl Page {
    /// The number of items to skip to get to this page.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// The number of the last page when there are `total` items, zero if there are none.
    pub fn last_page(&self, total: u64) -> u64 {
        total.div_ceil(self.limit)
    }

    /// Describe this page for the response body.
    pub fn meta(&self, total: u64) -> PageMeta {
        PageMeta {
            total,
            page: self.page,
            last_page: self.last_page(total),
            limit: self.limit,
        }
    }
}

/// Describes where a page sits in the full result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// The number of items across all pages.
    pub total: u64,
    /// The one-based page number.
    pub page: u64,
    /// The number of the last page.
    pub last_page: u64,
    /// The maximum number of items per page.
    pub limit: u64,
}
