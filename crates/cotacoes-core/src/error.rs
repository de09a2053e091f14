use thiserror::Error;

use crate::api::ApiError;

/// Validation errors for user-supplied values exposed by `cotacoes-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("unknown sector '{value}'")]
    UnknownSector { value: String },
    #[error("unknown asset type '{value}', expected one of stock, fund, bdr")]
    UnknownAssetType { value: String },
    #[error("asset type '{value}' is not available for the selected sector")]
    AssetTypeUnavailable { value: String },

    #[error("invalid sort column '{value}', expected one of price, changePercent, marketCap, volume, ticker")]
    InvalidSortColumn { value: String },
    #[error("invalid sort order '{value}', expected asc or desc")]
    InvalidSortOrder { value: String },

    #[error("invalid period '{value}', expected one of 1m, 6m, 1y, 5y, all")]
    InvalidPeriod { value: String },
    #[error("invalid chart range '{value}', expected one of 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y")]
    InvalidRange { value: String },
    #[error("invalid interval '{value}', expected one of 1m, 5m, 15m, 1h, 1d")]
    InvalidInterval { value: String },

    #[error("page must be at least 1")]
    InvalidPage,
    #[error("per-page must be at least 1")]
    InvalidPerPage,

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },
    #[error("unparseable date '{value}'")]
    InvalidDate { value: String },

    #[error("base url must start with http:// or https://: '{value}'")]
    InvalidBaseUrl { value: String },
    #[error("environment variable {name} has invalid value '{value}'")]
    InvalidEnvValue { name: &'static str, value: String },
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
