//! Parameterized quote list loading.
//!
//! [`QuoteQueryEngine::query`] issues exactly one `GET /cotacoes` per call,
//! reconciles every returned record and stores the page in the quote list
//! [`Surface`]. Only the most recent call may change that surface.

use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::api::{CotacoesApi, QuoteListPayload};
use crate::config::DEFAULT_PER_PAGE;
use crate::reconcile::reconcile;
use crate::surface::{LoadOutcome, Surface, SurfaceKind, SurfaceSnapshot};
use crate::{AssetType, Pagination, Quote, Sector, UtcDateTime, ValidationError};

/// Sector and asset type selection. `None` means "any".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filters {
    pub sector: Option<Sector>,
    pub asset_type: Option<AssetType>,
}

impl Filters {
    pub fn new(sector: Option<Sector>, asset_type: Option<AssetType>) -> Self {
        Self { sector, asset_type }
    }

    pub fn matches(&self, quote: &Quote) -> bool {
        self.sector.is_none_or(|sector| quote.sector == Some(sector))
            && self
                .asset_type
                .is_none_or(|asset_type| quote.asset_type == Some(asset_type))
    }
}

/// Sortable list column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortColumn {
    Price,
    ChangePercent,
    MarketCap,
    Volume,
    Ticker,
}

impl SortColumn {
    pub const ALL: [Self; 5] = [
        Self::Price,
        Self::ChangePercent,
        Self::MarketCap,
        Self::Volume,
        Self::Ticker,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::ChangePercent => "changePercent",
            Self::MarketCap => "marketCap",
            Self::Volume => "volume",
            Self::Ticker => "ticker",
        }
    }

    /// `sortBy` value understood by the quotes endpoint.
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Price => "preco",
            Self::ChangePercent => "change",
            Self::MarketCap => "marketCap",
            Self::Volume => "volume",
            Self::Ticker => "ticker",
        }
    }

    pub const fn is_numeric(self) -> bool {
        !matches!(self, Self::Ticker)
    }
}

impl Display for SortColumn {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortColumn {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|column| {
                column.as_str().eq_ignore_ascii_case(trimmed)
                    || column.wire_name().eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| ValidationError::InvalidSortColumn {
                value: value.to_owned(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub const fn reversed(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(ValidationError::InvalidSortOrder {
                value: value.to_owned(),
            }),
        }
    }
}

/// Active sort column and direction. Starts at market cap, descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: SortColumn,
    pub order: SortOrder,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            column: SortColumn::MarketCap,
            order: SortOrder::Desc,
        }
    }
}

impl SortState {
    pub const fn new(column: SortColumn, order: SortOrder) -> Self {
        Self { column, order }
    }

    /// Header click: flip the order on the active column, otherwise switch
    /// to `column` ascending.
    pub fn toggle(self, column: SortColumn) -> Self {
        if self.column == column {
            Self::new(column, self.order.reversed())
        } else {
            Self::new(column, SortOrder::Asc)
        }
    }
}

/// Everything one list request depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequest {
    pub filters: Filters,
    pub sort: SortState,
    page: u32,
    per_page: u32,
}

impl Default for ListRequest {
    fn default() -> Self {
        Self {
            filters: Filters::default(),
            sort: SortState::default(),
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl ListRequest {
    pub fn new(
        filters: Filters,
        sort: SortState,
        page: u32,
        per_page: u32,
    ) -> Result<Self, ValidationError> {
        if page == 0 {
            return Err(ValidationError::InvalidPage);
        }
        if per_page == 0 {
            return Err(ValidationError::InvalidPerPage);
        }
        Ok(Self {
            filters,
            sort,
            page,
            per_page,
        })
    }

    pub const fn page(&self) -> u32 {
        self.page
    }

    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Replace the filters and go back to page 1.
    pub fn with_filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self.page = 1;
        self
    }

    /// Replace the sort and go back to page 1.
    pub fn with_sort(mut self, sort: SortState) -> Self {
        self.sort = sort;
        self.page = 1;
        self
    }

    /// Apply a header click and go back to page 1.
    pub fn toggled(self, column: SortColumn) -> Self {
        let sort = self.sort.toggle(column);
        self.with_sort(sort)
    }

    pub fn with_page(mut self, page: u32) -> Result<Self, ValidationError> {
        if page == 0 {
            return Err(ValidationError::InvalidPage);
        }
        self.page = page;
        Ok(self)
    }

    pub fn with_per_page(mut self, per_page: u32) -> Result<Self, ValidationError> {
        if per_page == 0 {
            return Err(ValidationError::InvalidPerPage);
        }
        self.per_page = per_page;
        self.page = 1;
        Ok(self)
    }

    /// Query parameters for `GET /cotacoes`, in a fixed order. Unset
    /// filters are omitted.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(6);
        if let Some(sector) = self.filters.sector {
            params.push(("sector", sector.as_str().to_owned()));
        }
        if let Some(asset_type) = self.filters.asset_type {
            params.push(("type", asset_type.as_str().to_owned()));
        }
        params.push(("sortBy", self.sort.column.wire_name().to_owned()));
        params.push(("sortOrder", self.sort.order.as_str().to_owned()));
        params.push(("perPage", self.per_page.to_string()));
        params.push(("page", self.page.to_string()));
        params
    }
}

/// One loaded page of reconciled quotes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotePage {
    pub quotes: Vec<Quote>,
    pub pagination: Pagination,
    pub request: ListRequest,
}

/// Reconcile a list payload into a page.
///
/// Records without a ticker or repeating an earlier ticker are dropped. A
/// missing pagination block is synthesized from the request.
pub fn build_page(
    payload: QuoteListPayload,
    request: ListRequest,
    received_at: UtcDateTime,
) -> QuotePage {
    let mut seen = HashSet::with_capacity(payload.records.len());
    let mut quotes = Vec::with_capacity(payload.records.len());

    for raw in &payload.records {
        let quote = reconcile(raw, received_at);
        if quote.ticker.is_empty() {
            warn!("dropping quote record without ticker");
            continue;
        }
        if !seen.insert(quote.ticker.clone()) {
            warn!("dropping duplicate quote record for {}", quote.ticker);
            continue;
        }
        quotes.push(quote);
    }

    let pagination = match payload.pagination {
        Some(pagination) => pagination.normalized(),
        None => Pagination::synthesized(request.page(), request.per_page(), quotes.len()),
    };

    QuotePage {
        quotes,
        pagination,
        request,
    }
}

/// Quote list surface with last-request-wins semantics.
///
/// Clones share the same surface.
#[derive(Clone)]
pub struct QuoteQueryEngine {
    api: Arc<dyn CotacoesApi>,
    surface: Arc<Surface<QuotePage>>,
}

impl QuoteQueryEngine {
    pub fn new(api: Arc<dyn CotacoesApi>) -> Self {
        Self {
            api,
            surface: Arc::new(Surface::new(SurfaceKind::QuoteList)),
        }
    }

    /// Load `request`.
    ///
    /// The generation is taken when this method is called, not when the
    /// returned future is first polled, so call order decides which request
    /// is the latest.
    pub fn query(
        &self,
        request: ListRequest,
    ) -> impl Future<Output = LoadOutcome<QuotePage>> + Send + 'static {
        let generation = self.surface.begin();
        let api = Arc::clone(&self.api);
        let surface = Arc::clone(&self.surface);
        debug!(
            "quote_list generation {generation}: page {} sorted by {} {}",
            request.page(),
            request.sort.column,
            request.sort.order
        );

        async move {
            let result = api
                .list_quotes(request)
                .await
                .map(|payload| build_page(payload, request, UtcDateTime::now()));
            surface.commit(generation, result)
        }
    }

    pub fn snapshot(&self) -> SurfaceSnapshot<QuotePage> {
        self.surface.snapshot()
    }
}
