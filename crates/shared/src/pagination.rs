//! Offset pagination utilities for list endpoints.

use serde::{Deserialize, Serialize};

/// Default page size for list endpoints.
pub const DEFAULT_PER_PAGE: i64 = 20;

/// Maximum page size a caller may request.
pub const MAX_PER_PAGE: i64 = 100;

/// Query-side pagination parameters.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PageParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_per_page")]
    pub per_page: i64,
}

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    DEFAULT_PER_PAGE
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PageParams {
    /// Clamp page and per_page into sane bounds.
    pub fn clamped(self) -> Self {
        Self {
            page: self.page.max(1),
            per_page: self.per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    /// Row limit for the underlying query.
    pub fn limit(&self) -> i64 {
        self.clamped().per_page
    }

    /// Row offset for the underlying query.
    pub fn offset(&self) -> i64 {
        let p = self.clamped();
        (p.page - 1) * p.per_page
    }
}

/// Pagination block included in list responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PageInfo {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl PageInfo {
    /// Build a response pagination block from the request params and a total count.
    pub fn new(params: PageParams, total: i64) -> Self {
        let p = params.clamped();
        let total_pages = if total == 0 {
            0
        } else {
            (total + p.per_page - 1) / p.per_page
        };
        Self {
            page: p.page,
            per_page: p.per_page,
            total,
            total_pages,
        }
    }
}
