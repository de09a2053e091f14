//! Normalization of upstream quote records into [`Quote`].
//!
//! Upstream payloads have used several keys for the same logical value.
//! All fallbacks live here, as ordered precedence lists, so no call site
//! needs its own chain.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::lenient;
use crate::{AssetType, Quote, Sector, UtcDateTime};

/// Icon service template; `{ticker}` is the upper-cased ticker.
pub const LOGO_TEMPLATE: &str = "https://icons.brapi.dev/icons/{ticker}.svg";

/// Fragment identifying upstream's generic placeholder icon (compared
/// case-insensitively).
pub const PLACEHOLDER_LOGO_MARKER: &str = "BRAPI.SVG";

/// One row of `stocks[]` as sent by the quotes endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawQuote {
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub stock: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub close: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub change: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub market_cap: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub volume: Option<f64>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub sector: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient::string_opt")]
    pub asset_type: Option<String>,
    #[serde(default, rename = "atualizadoEm", deserialize_with = "lenient::string_opt")]
    pub updated_at: Option<String>,

    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub logo: Option<String>,
    #[serde(default, rename = "logoURL", deserialize_with = "lenient::string_opt")]
    pub logo_url_upper: Option<String>,
    #[serde(default, rename = "logoUrl", deserialize_with = "lenient::string_opt")]
    pub logo_url_camel: Option<String>,
    #[serde(default, rename = "logo_url", deserialize_with = "lenient::string_opt")]
    pub logo_url_snake: Option<String>,
    #[serde(default, rename = "logourl", deserialize_with = "lenient::string_opt")]
    pub logo_url_lower: Option<String>,
}

impl RawQuote {
    /// Logo keys in precedence order.
    fn logo_candidates(&self) -> [Option<&str>; 5] {
        [
            self.logo.as_deref(),
            self.logo_url_upper.as_deref(),
            self.logo_url_camel.as_deref(),
            self.logo_url_snake.as_deref(),
            self.logo_url_lower.as_deref(),
        ]
    }
}

/// Reconcile one upstream record. Never fails: missing or malformed fields
/// become `None` or their documented default.
///
/// `received_at` stands in for `lastUpdated` when upstream omits it.
pub fn reconcile(raw: &RawQuote, received_at: UtcDateTime) -> Quote {
    let ticker = raw
        .stock
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_owned();

    let name = non_blank(raw.name.as_deref()).map(str::to_owned);

    Quote {
        logo_url: resolve_logo(raw, &ticker),
        display_name: name.clone(),
        long_name: name,
        price: raw.close,
        change_percent: raw.change,
        market_cap: raw.market_cap,
        volume: raw.volume,
        sector: resolve_sector(raw.sector.as_deref()),
        asset_type: resolve_asset_type(raw.asset_type.as_deref()),
        last_updated: resolve_last_updated(raw.updated_at.as_deref(), received_at),
        ticker,
    }
}

/// First non-empty logo alias, replaced by the ticker-derived icon when it
/// is missing or points at the placeholder.
pub fn resolve_logo(raw: &RawQuote, ticker: &str) -> Option<String> {
    let resolved = raw
        .logo_candidates()
        .into_iter()
        .find_map(non_blank)
        .map(str::to_owned);

    let derived = derived_logo_url(ticker);
    match resolved {
        Some(url) if is_placeholder_logo(&url) => derived.or(Some(url)),
        Some(url) => Some(url),
        None => derived,
    }
}

pub fn is_placeholder_logo(url: &str) -> bool {
    url.to_ascii_uppercase().contains(PLACEHOLDER_LOGO_MARKER)
}

/// Icon URL for `ticker`, or `None` for a blank ticker.
pub fn derived_logo_url(ticker: &str) -> Option<String> {
    let ticker = ticker.trim();
    if ticker.is_empty() {
        return None;
    }
    Some(LOGO_TEMPLATE.replace("{ticker}", &ticker.to_ascii_uppercase()))
}

fn resolve_sector(value: Option<&str>) -> Option<Sector> {
    let value = non_blank(value)?;
    match value.parse::<Sector>() {
        Ok(sector) => Some(sector),
        Err(_) => {
            debug!("ignoring sector outside the catalog: '{value}'");
            None
        }
    }
}

fn resolve_asset_type(value: Option<&str>) -> Option<AssetType> {
    let value = non_blank(value)?;
    let resolved = AssetType::from_code(value);
    if resolved.is_none() {
        debug!("ignoring unknown asset type code: '{value}'");
    }
    resolved
}

fn resolve_last_updated(value: Option<&str>, received_at: UtcDateTime) -> UtcDateTime {
    non_blank(value)
        .and_then(|value| UtcDateTime::parse_lenient(value).ok())
        .unwrap_or(received_at)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn received_at() -> UtcDateTime {
        UtcDateTime::parse("2025-02-03T10:00:00Z").expect("fixed instant")
    }

    fn raw(json: &str) -> RawQuote {
        serde_json::from_str(json).expect("raw quote")
    }

    #[test]
    fn logo_precedence_prefers_earlier_aliases() {
        let quote = reconcile(
            &raw(r#"{"stock":"VALE3","logoUrl":"https://cdn/b.png","logo_url":"https://cdn/c.png"}"#),
            received_at(),
        );
        assert_eq!(quote.logo_url.as_deref(), Some("https://cdn/b.png"));
    }

    #[test]
    fn blank_alias_falls_through_to_next_one() {
        let quote = reconcile(
            &raw(r#"{"stock":"VALE3","logo":"  ","logourl":"https://cdn/e.png"}"#),
            received_at(),
        );
        assert_eq!(quote.logo_url.as_deref(), Some("https://cdn/e.png"));
    }

    #[test]
    fn placeholder_picked_by_precedence_is_replaced() {
        let quote = reconcile(
            &raw(r#"{"stock":"itub4","logo":"https://icons.brapi.dev/icons/brapi.svg","logourl":"https://cdn/x.png"}"#),
            received_at(),
        );
        assert_eq!(
            quote.logo_url.as_deref(),
            Some("https://icons.brapi.dev/icons/ITUB4.svg")
        );
    }

    #[test]
    fn blank_ticker_keeps_placeholder_and_has_no_derived_logo() {
        assert_eq!(derived_logo_url("  "), None);
        let quote = reconcile(&raw(r#"{"logo":"BRAPI.svg"}"#), received_at());
        assert_eq!(quote.logo_url.as_deref(), Some("BRAPI.svg"));
        assert!(quote.ticker.is_empty());
    }

    #[test]
    fn missing_fields_map_to_defaults() {
        let quote = reconcile(&raw("{}"), received_at());
        assert_eq!(quote.price, None);
        assert!(!quote.has_price());
        assert_eq!(quote.change_percent, None);
        assert_eq!(quote.sector, None);
        assert_eq!(quote.asset_type, None);
        assert_eq!(quote.last_updated, received_at());
    }

    #[test]
    fn upstream_timestamp_wins_when_parseable() {
        let quote = reconcile(
            &raw(r#"{"stock":"BBAS3","atualizadoEm":"2025-01-31T18:00:00-03:00"}"#),
            received_at(),
        );
        assert_eq!(quote.last_updated.format_rfc3339(), "2025-01-31T21:00:00Z");

        let garbled = reconcile(
            &raw(r#"{"stock":"BBAS3","atualizadoEm":"ontem"}"#),
            received_at(),
        );
        assert_eq!(garbled.last_updated, received_at());
    }

    #[test]
    fn legacy_and_current_receipt_codes_collapse() {
        let legacy = reconcile(&raw(r#"{"stock":"AAPL34","type":"dr"}"#), received_at());
        let current = reconcile(&raw(r#"{"stock":"MSFT34","type":"bdr"}"#), received_at());
        assert_eq!(legacy.asset_type, Some(AssetType::DepositaryReceipt));
        assert_eq!(legacy.asset_type, current.asset_type);
    }

    #[test]
    fn canonical_fields_are_mapped() {
        let quote = reconcile(
            &raw(r#"{"stock":"PETR4","name":"Petrobras PN","close":37.5,"change":-1.2,
                     "market_cap":480000000000,"volume":31000000,"sector":"Energy Minerals","type":"stock"}"#),
            received_at(),
        );
        assert_eq!(quote.ticker, "PETR4");
        assert_eq!(quote.display_name.as_deref(), Some("Petrobras PN"));
        assert_eq!(quote.long_name.as_deref(), Some("Petrobras PN"));
        assert_eq!(quote.price, Some(37.5));
        assert_eq!(quote.change_percent, Some(-1.2));
        assert_eq!(quote.market_cap, Some(480_000_000_000.0));
        assert_eq!(quote.volume, Some(31_000_000.0));
        assert_eq!(quote.sector, Some(Sector::EnergyMinerals));
        assert_eq!(quote.asset_type, Some(AssetType::Stock));
    }
}
