//! # Cotacoes Core
//!
//! Quote query and reconciliation engine behind the cotacoes dashboard.
//!
//! ## Overview
//!
//! - **Reconciliation** of inconsistent upstream quote records into [`Quote`]
//! - **Quote list loading** with server-side filter/sort/pagination and
//!   stale-response suppression
//! - **Client-side refinement** of a loaded page
//! - **Metadata cascade** from sector to the asset types it offers
//! - **Dividend timeline** merging cash and split events
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`api`] | Quotes API contract and HTTP implementation |
//! | [`config`] | Client configuration |
//! | [`detail`] | Per-asset detail surface |
//! | [`dividends`] | Corporate-action timeline and period windows |
//! | [`domain`] | Domain models (Quote, Pagination, Sector, AssetType, StockDetail) |
//! | [`error`] | Core error types |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`metadata`] | Sector and asset-type catalogs |
//! | [`query`] | List requests and the quote query engine |
//! | [`reconcile`] | Upstream record normalization |
//! | [`refine`] | Client-side filter and sort |
//! | [`surface`] | Generational latest-response slot |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use cotacoes_core::{ClientConfig, HttpCotacoesApi, ListRequest, QuoteQueryEngine};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = Arc::new(HttpCotacoesApi::with_reqwest(ClientConfig::from_env()?)?);
//!     let engine = QuoteQueryEngine::new(api);
//!
//!     if let Some(page) = engine.query(ListRequest::default()).await.applied() {
//!         for quote in &page.quotes {
//!             println!("{} {:?}", quote.ticker, quote.displayed_price());
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐   ┌──────────────────┐   ┌─────────────────┐
//! │ QuoteQueryEngine│   │ MetadataCascade  │   │ DetailSurface   │
//! └────────┬────────┘   └────────┬─────────┘   └────────┬────────┘
//!          │ Surface<T> (generation counter per surface) │
//!          ▼                     ▼                      ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │ CotacoesApi (HttpCotacoesApi)                                │
//! └────────────────────────────┬─────────────────────────────────┘
//!                              ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │ HttpClient (reqwest)                                         │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Outbound failures are classified as [`ApiError`]; a surface exposes them
//! as one [`LoadError`] and keeps its previous data:
//!
//! ```rust
//! use cotacoes_core::{ApiError, ApiErrorKind};
//!
//! fn describe(error: &ApiError) -> &'static str {
//!     match error.kind() {
//!         ApiErrorKind::Transport => "no response",
//!         ApiErrorKind::UpstreamStatus => "rejected",
//!         ApiErrorKind::MalformedResponse => "unexpected payload",
//!         ApiErrorKind::InvalidRequest => "bad request",
//!     }
//! }
//! ```

pub mod api;
pub mod config;
pub mod detail;
pub mod dividends;
pub mod domain;
pub mod error;
pub mod http_client;
mod lenient;
pub mod metadata;
pub mod query;
pub mod reconcile;
pub mod refine;
pub mod surface;

// API contract
pub use api::{ApiError, ApiErrorKind, CotacoesApi, HttpCotacoesApi, QuoteListPayload};

// Configuration
pub use config::ClientConfig;

// Surfaces
pub use detail::{DetailSurface, DetailView};
pub use metadata::MetadataCascade;
pub use query::{
    Filters, ListRequest, QuotePage, QuoteQueryEngine, SortColumn, SortOrder, SortState,
};
pub use surface::{LoadError, LoadOutcome, SurfaceKind, SurfaceSnapshot};

// Dividend timeline
pub use dividends::{DividendRow, Period, TimelineEntry};

// Domain models
pub use domain::{
    AssetType, CashDividend, ChartRange, DividendsData, HistoricalPrice, Interval, Pagination,
    PricePoint, Quote, Sector, StockDetail, StockDividend, Subscription, Symbol, UtcDateTime,
};

// Error types
pub use error::{CoreError, ValidationError};

// HTTP client types
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};

// Reconciliation
pub use reconcile::{reconcile, RawQuote};

// Refinement
pub use refine::refine;
