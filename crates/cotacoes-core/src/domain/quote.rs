use serde::{Deserialize, Serialize};

use crate::{AssetType, Sector, UtcDateTime};

/// Canonical per-ticker record after reconciliation.
///
/// Instances are rebuilt from every list response and never mutated in
/// place; `ticker` is the only identity they carry within one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub ticker: String,
    pub display_name: Option<String>,
    pub long_name: Option<String>,
    /// Last close. `None` when upstream omitted it or sent garbage.
    pub price: Option<f64>,
    pub change_percent: Option<f64>,
    pub market_cap: Option<f64>,
    pub volume: Option<f64>,
    pub logo_url: Option<String>,
    /// `None` when upstream sent no sector or a label outside the catalog.
    pub sector: Option<Sector>,
    pub asset_type: Option<AssetType>,
    /// Upstream freshness timestamp.
    ///
    /// When upstream omits it this holds the time the response was
    /// received, which says nothing about how fresh the data really is.
    pub last_updated: UtcDateTime,
}

impl Quote {
    /// Whether the price should be shown at all. A zero close renders as
    /// "no data" just like a missing one.
    pub fn has_price(&self) -> bool {
        self.price.is_some_and(|price| price.is_finite() && price > 0.0)
    }

    /// Price to display, `None` when [`has_price`](Self::has_price) is false.
    pub fn displayed_price(&self) -> Option<f64> {
        self.price.filter(|_| self.has_price())
    }
}

/// Page metadata reported by (or synthesized for) the quotes endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub items_per_page: u32,
    pub total_count: u64,
    pub has_next_page: bool,
}

impl Pagination {
    /// Default used when the response carries no pagination block: the
    /// returned rows are treated as the only page.
    pub fn synthesized(requested_page: u32, requested_limit: u32, returned_count: usize) -> Self {
        Self {
            current_page: requested_page,
            total_pages: 1,
            items_per_page: requested_limit,
            total_count: returned_count as u64,
            has_next_page: false,
        }
    }

    /// Restore `current_page <= total_pages` when rows exist.
    pub fn normalized(mut self) -> Self {
        if self.total_count > 0 && self.current_page > self.total_pages {
            self.total_pages = self.current_page;
        }
        self
    }

    pub const fn has_previous_page(&self) -> bool {
        self.current_page > 1
    }

    pub fn next_page(&self) -> Option<u32> {
        self.has_next_page.then(|| self.current_page.saturating_add(1))
    }

    pub fn previous_page(&self) -> Option<u32> {
        self.has_previous_page().then(|| self.current_page - 1)
    }
}
