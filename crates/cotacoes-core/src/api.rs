//! Quotes API contract and its HTTP implementation.
//!
//! # Endpoints
//!
//! | Method | Path | Response |
//! |--------|------|----------|
//! | [`list_quotes`](CotacoesApi::list_quotes) | `GET /cotacoes` | [`QuoteListPayload`] |
//! | [`sectors`](CotacoesApi::sectors) | `GET /sectors` | `Vec<Sector>` |
//! | [`types`](CotacoesApi::types) | `GET /types?sector` | `Vec<AssetType>` |
//! | [`stock_detail`](CotacoesApi::stock_detail) | `GET /stocks/{symbol}` | [`StockDetail`] |

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use log::debug;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::http_client::{HttpClient, HttpError, HttpRequest, ReqwestHttpClient};
use crate::query::ListRequest;
use crate::reconcile::RawQuote;
use crate::{AssetType, ChartRange, Interval, Pagination, Sector, StockDetail, Symbol};

/// Classification of a failed API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// No response was received.
    Transport,
    /// A response arrived with a non-2xx status.
    UpstreamStatus,
    /// The body did not have the expected shape.
    MalformedResponse,
    /// Upstream answered 400 to the parameters sent.
    InvalidRequest,
}

/// Structured failure of one outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    kind: ApiErrorKind,
    message: String,
}

impl ApiError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Transport,
            message: message.into(),
        }
    }

    pub fn upstream_status(status: u16, detail: Option<&str>) -> Self {
        let message = match detail {
            Some(detail) => format!("upstream returned status {status}: {detail}"),
            None => format!("upstream returned status {status}"),
        };
        Self {
            kind: ApiErrorKind::UpstreamStatus,
            message,
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::MalformedResponse,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::InvalidRequest,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> ApiErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            ApiErrorKind::Transport => "api.transport",
            ApiErrorKind::UpstreamStatus => "api.upstream_status",
            ApiErrorKind::MalformedResponse => "api.malformed_response",
            ApiErrorKind::InvalidRequest => "api.invalid_request",
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for ApiError {}

/// Unreconciled list response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteListPayload {
    pub records: Vec<RawQuote>,
    /// `None` when the response carried no usable pagination block.
    pub pagination: Option<Pagination>,
}

type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + Send + 'a>>;

/// Quotes backend contract.
///
/// Each call performs exactly one outbound request.
pub trait CotacoesApi: Send + Sync {
    fn list_quotes<'a>(&'a self, request: ListRequest) -> ApiFuture<'a, QuoteListPayload>;

    fn sectors<'a>(&'a self) -> ApiFuture<'a, Vec<Sector>>;

    /// Asset types present in `sector`, or in the whole market for `None`.
    fn types<'a>(&'a self, sector: Option<Sector>) -> ApiFuture<'a, Vec<AssetType>>;

    fn stock_detail<'a>(
        &'a self,
        symbol: Symbol,
        range: ChartRange,
        interval: Interval,
    ) -> ApiFuture<'a, StockDetail>;
}

#[derive(Debug, Deserialize)]
struct ListEnvelope {
    stocks: Vec<Value>,
    #[serde(default)]
    pagination: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct SectorsEnvelope {
    sectors: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TypesEnvelope {
    types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: String,
}

/// [`CotacoesApi`] over any [`HttpClient`].
#[derive(Clone)]
pub struct HttpCotacoesApi {
    http: Arc<dyn HttpClient>,
    config: ClientConfig,
}

impl HttpCotacoesApi {
    pub fn new(http: Arc<dyn HttpClient>, config: ClientConfig) -> Self {
        Self { http, config }
    }

    /// Production client using reqwest with the configured user agent.
    pub fn with_reqwest(config: ClientConfig) -> Result<Self, HttpError> {
        let http = Arc::new(ReqwestHttpClient::new(&config.user_agent)?);
        Ok(Self::new(http, config))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn get_json<T>(&self, request: HttpRequest) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Send,
    {
        let request = request.with_header("accept", "application/json");
        debug!("GET {}", request.full_url());

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|error| ApiError::transport(format!("transport error: {}", error.message())))?;

        if !response.is_success() {
            let detail = serde_json::from_str::<ErrorEnvelope>(&response.body)
                .ok()
                .map(|envelope| envelope.error);
            if response.status == 400 {
                return Err(ApiError::invalid_request(format!(
                    "upstream rejected request parameters: {}",
                    detail.as_deref().unwrap_or("no detail")
                )));
            }
            return Err(ApiError::upstream_status(response.status, detail.as_deref()));
        }

        serde_json::from_str(&response.body)
            .map_err(|error| ApiError::malformed(format!("unexpected response shape: {error}")))
    }
}

impl CotacoesApi for HttpCotacoesApi {
    fn list_quotes<'a>(&'a self, request: ListRequest) -> ApiFuture<'a, QuoteListPayload> {
        Box::pin(async move {
            let mut http_request = HttpRequest::get(self.config.endpoint("/cotacoes"))
                .with_timeout_ms(self.config.list_timeout_ms);
            for (name, value) in request.query_params() {
                http_request = http_request.with_query(name, value);
            }

            let envelope: ListEnvelope = self.get_json(http_request).await?;

            let records = envelope
                .stocks
                .into_iter()
                .map(|value| {
                    serde_json::from_value::<RawQuote>(value).unwrap_or_else(|error| {
                        debug!("record is not an object, reconciling as empty: {error}");
                        RawQuote::default()
                    })
                })
                .collect();

            let pagination = envelope.pagination.and_then(|value| {
                if value.is_null() {
                    return None;
                }
                serde_json::from_value::<Pagination>(value)
                    .map_err(|error| debug!("ignoring unusable pagination block: {error}"))
                    .ok()
            });

            Ok(QuoteListPayload {
                records,
                pagination,
            })
        })
    }

    fn sectors<'a>(&'a self) -> ApiFuture<'a, Vec<Sector>> {
        Box::pin(async move {
            let request = HttpRequest::get(self.config.endpoint("/sectors"))
                .with_timeout_ms(self.config.metadata_timeout_ms);
            let envelope: SectorsEnvelope = self.get_json(request).await?;

            let mut sectors = Vec::with_capacity(envelope.sectors.len());
            for label in &envelope.sectors {
                match label.parse::<Sector>() {
                    Ok(sector) if !sectors.contains(&sector) => sectors.push(sector),
                    Ok(_) => {}
                    Err(_) => debug!("ignoring sector outside the catalog: '{label}'"),
                }
            }
            Ok(sectors)
        })
    }

    fn types<'a>(&'a self, sector: Option<Sector>) -> ApiFuture<'a, Vec<AssetType>> {
        Box::pin(async move {
            let mut request = HttpRequest::get(self.config.endpoint("/types"))
                .with_timeout_ms(self.config.metadata_timeout_ms);
            if let Some(sector) = sector {
                request = request.with_query("sector", sector.as_str());
            }
            let envelope: TypesEnvelope = self.get_json(request).await?;

            let mut types = Vec::with_capacity(envelope.types.len());
            for code in &envelope.types {
                match AssetType::from_code(code) {
                    Some(asset_type) if !types.contains(&asset_type) => types.push(asset_type),
                    Some(_) => {}
                    None => debug!("ignoring unknown asset type code: '{code}'"),
                }
            }
            Ok(types)
        })
    }

    fn stock_detail<'a>(
        &'a self,
        symbol: Symbol,
        range: ChartRange,
        interval: Interval,
    ) -> ApiFuture<'a, StockDetail> {
        Box::pin(async move {
            let path = format!("/stocks/{}", urlencoding::encode(symbol.as_str()));
            let request = HttpRequest::get(self.config.endpoint(&path))
                .with_query("range", range.as_str())
                .with_query("interval", interval.as_str())
                .with_timeout_ms(self.config.detail_timeout_ms);
            self.get_json(request).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_status_message_includes_detail() {
        let error = ApiError::upstream_status(404, Some("stock not found"));
        assert_eq!(error.kind(), ApiErrorKind::UpstreamStatus);
        assert_eq!(
            error.to_string(),
            "upstream returned status 404: stock not found (api.upstream_status)"
        );
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(ApiError::transport("x").code(), "api.transport");
        assert_eq!(ApiError::malformed("x").code(), "api.malformed_response");
        assert_eq!(ApiError::invalid_request("x").code(), "api.invalid_request");
    }
}
