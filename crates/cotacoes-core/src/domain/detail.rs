use serde::{Deserialize, Serialize};

use crate::lenient;
use crate::UtcDateTime;

/// Per-asset payload from `GET /stocks/{symbol}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockDetail {
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub symbol: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub short_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub long_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub market_cap: Option<f64>,
    #[serde(default, rename = "logourl", deserialize_with = "lenient::string_opt")]
    pub logo_url: Option<String>,

    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub regular_market_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub regular_market_change: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub regular_market_change_percent: Option<f64>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub regular_market_time: Option<String>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub regular_market_day_high: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub regular_market_day_low: Option<f64>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub regular_market_day_range: Option<String>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub regular_market_volume: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub regular_market_previous_close: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub regular_market_open: Option<f64>,

    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub fifty_two_week_range: Option<String>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub fifty_two_week_low: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub fifty_two_week_high: Option<f64>,

    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub used_interval: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub used_range: Option<String>,

    #[serde(default, deserialize_with = "lenient::vec_or_empty")]
    pub historical_data_price: Vec<HistoricalPrice>,
    #[serde(default, deserialize_with = "lenient::vec_or_empty")]
    pub valid_ranges: Vec<String>,
    #[serde(default, deserialize_with = "lenient::vec_or_empty")]
    pub valid_intervals: Vec<String>,

    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub price_earnings: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub earnings_per_share: Option<f64>,

    #[serde(default)]
    pub dividends_data: DividendsData,
}

/// One candle of `historicalDataPrice`; `date` is epoch seconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalPrice {
    #[serde(default, deserialize_with = "lenient::i64_opt")]
    pub date: Option<i64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub open: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub high: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub low: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub close: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub volume: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub adjusted_close: Option<f64>,
}

/// Chart-ready candle with a resolved timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    pub at: UtcDateTime,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

impl StockDetail {
    /// Price history in ascending time order. Candles without a usable
    /// timestamp are skipped.
    pub fn price_series(&self) -> Vec<PricePoint> {
        let mut points: Vec<PricePoint> = self
            .historical_data_price
            .iter()
            .filter_map(|candle| {
                let at = UtcDateTime::from_unix_timestamp(candle.date?).ok()?;
                Some(PricePoint {
                    at,
                    open: candle.open,
                    high: candle.high,
                    low: candle.low,
                    close: candle.close,
                    volume: candle.volume,
                })
            })
            .collect();
        points.sort_by_key(|point| point.at);
        points
    }

    /// Whether the last session closed at or above the previous one.
    pub fn is_positive(&self) -> bool {
        self.regular_market_change.is_some_and(|change| change >= 0.0)
    }
}

/// Corporate-action block of the detail payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DividendsData {
    #[serde(default, deserialize_with = "lenient::vec_or_empty")]
    pub cash_dividends: Vec<CashDividend>,
    #[serde(default, deserialize_with = "lenient::vec_or_empty")]
    pub stock_dividends: Vec<StockDividend>,
    #[serde(default, deserialize_with = "lenient::vec_or_empty")]
    pub subscriptions: Vec<Subscription>,
}

/// Cash distribution (dividend, interest on equity).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashDividend {
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub payment_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub related_to: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub approved_on: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub asset_issued: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub isin_code: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub last_date_prior: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub remarks: Option<String>,
}

/// Split, reverse split or bonus shares.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockDividend {
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub approved_on: Option<String>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub factor: Option<f64>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub complete_factor: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub asset_issued: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub isin_code: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub last_date_prior: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub remarks: Option<String>,
}

/// Rights offering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub approved_on: Option<String>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub factor: Option<f64>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub asset_issued: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub isin_code: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub last_date_prior: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub remarks: Option<String>,
}
