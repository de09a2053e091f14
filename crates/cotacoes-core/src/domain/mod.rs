//! # Domain Models
//!
//! Canonical types shared by the query surfaces.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Quote`] | Reconciled list row |
//! | [`Pagination`] | Page metadata for the quote list |
//! | [`Sector`] | Closed industry catalog |
//! | [`AssetType`] | Asset category with alias collapsing |
//! | [`StockDetail`] | Per-asset detail payload |
//! | [`Symbol`] | Validated ticker for detail lookups |
//! | [`Interval`] / [`ChartRange`] | History granularity and window |
//! | [`UtcDateTime`] | UTC timestamp |

mod catalog;
mod detail;
mod interval;
mod quote;
mod symbol;
mod timestamp;

pub use catalog::{AssetType, Sector};
pub use detail::{
    CashDividend, DividendsData, HistoricalPrice, PricePoint, StockDetail, StockDividend,
    Subscription,
};
pub use interval::{ChartRange, Interval};
pub use quote::{Pagination, Quote};
pub use symbol::Symbol;
pub use timestamp::UtcDateTime;
