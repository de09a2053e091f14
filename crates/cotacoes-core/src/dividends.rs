//! Corporate-action timeline.
//!
//! Cash distributions and split/subscription events are merged into one
//! date-descending sequence. The two value kinds stay apart: cash rows carry
//! a `rate` (currency per share), split rows a `factor` (multiplier).

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::{DividendsData, UtcDateTime, ValidationError};

/// Description shared by every split/subscription row.
pub const SPLIT_DESCRIPTION: &str = "Split/Subscription";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DividendRow {
    #[serde(rename_all = "camelCase")]
    Cash {
        date: UtcDateTime,
        year: i32,
        label: String,
        related_to: Option<String>,
        rate: Option<f64>,
    },
    #[serde(rename_all = "camelCase")]
    Split {
        date: UtcDateTime,
        year: i32,
        label: String,
        description: String,
        factor: Option<f64>,
    },
}

/// Flat view of a [`DividendRow`] for tabular output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub date: UtcDateTime,
    pub year: i32,
    #[serde(rename = "type")]
    pub label: String,
    pub description: Option<String>,
    pub value: Option<f64>,
    pub factor: Option<f64>,
}

impl DividendRow {
    pub fn cash(
        date: UtcDateTime,
        label: impl Into<String>,
        related_to: Option<String>,
        rate: Option<f64>,
    ) -> Self {
        Self::Cash {
            date,
            year: date.year(),
            label: label.into(),
            related_to,
            rate,
        }
    }

    pub fn split(date: UtcDateTime, label: impl Into<String>, factor: Option<f64>) -> Self {
        Self::Split {
            date,
            year: date.year(),
            label: label.into(),
            description: SPLIT_DESCRIPTION.to_owned(),
            factor,
        }
    }

    pub fn date(&self) -> UtcDateTime {
        match self {
            Self::Cash { date, .. } | Self::Split { date, .. } => *date,
        }
    }

    pub fn year(&self) -> i32 {
        match self {
            Self::Cash { year, .. } | Self::Split { year, .. } => *year,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Cash { label, .. } | Self::Split { label, .. } => label,
        }
    }

    pub const fn is_cash(&self) -> bool {
        matches!(self, Self::Cash { .. })
    }

    pub fn projection(&self) -> TimelineEntry {
        match self {
            Self::Cash {
                date,
                year,
                label,
                related_to,
                rate,
            } => TimelineEntry {
                date: *date,
                year: *year,
                label: label.clone(),
                description: related_to.clone(),
                value: *rate,
                factor: None,
            },
            Self::Split {
                date,
                year,
                label,
                description,
                factor,
            } => TimelineEntry {
                date: *date,
                year: *year,
                label: label.clone(),
                description: Some(description.clone()),
                value: None,
                factor: *factor,
            },
        }
    }
}

/// Look-back window for the timeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1m")]
    OneMonth,
    #[serde(rename = "6m")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "5y")]
    FiveYears,
    #[default]
    #[serde(rename = "all")]
    All,
}

impl Period {
    pub const ALL: [Self; 5] = [
        Self::OneMonth,
        Self::SixMonths,
        Self::OneYear,
        Self::FiveYears,
        Self::All,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneMonth => "1m",
            Self::SixMonths => "6m",
            Self::OneYear => "1y",
            Self::FiveYears => "5y",
            Self::All => "all",
        }
    }

    /// Earliest instant a row may carry to pass the window, or `None` for
    /// [`Period::All`].
    pub fn cutoff(self, now: UtcDateTime) -> Option<UtcDateTime> {
        match self {
            Self::OneMonth => now.checked_sub_months(1),
            Self::SixMonths => now.checked_sub_months(6),
            Self::OneYear => now.checked_sub_years(1),
            Self::FiveYears => now.checked_sub_years(5),
            Self::All => None,
        }
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1m" => Ok(Self::OneMonth),
            "6m" => Ok(Self::SixMonths),
            "1y" | "1a" => Ok(Self::OneYear),
            "5y" | "5a" => Ok(Self::FiveYears),
            "all" => Ok(Self::All),
            _ => Err(ValidationError::InvalidPeriod {
                value: value.to_owned(),
            }),
        }
    }
}

/// Merge cash dividends, stock dividends and subscriptions, most recent
/// first.
///
/// Rows are concatenated in that order before a stable sort, so equal dates
/// resolve cash before stock dividend before subscription. Rows whose date
/// cannot be parsed are dropped.
pub fn normalize(data: &DividendsData) -> Vec<DividendRow> {
    let cash = data.cash_dividends.iter().filter_map(|dividend| {
        let date = row_date("cash dividend", dividend.payment_date.as_deref())?;
        Some(DividendRow::cash(
            date,
            dividend.label.clone().unwrap_or_default(),
            dividend.related_to.clone(),
            dividend.rate,
        ))
    });

    let stock = data.stock_dividends.iter().filter_map(|dividend| {
        let date = row_date("stock dividend", dividend.approved_on.as_deref())?;
        Some(DividendRow::split(
            date,
            dividend.label.clone().unwrap_or_default(),
            dividend.factor,
        ))
    });

    let subscriptions = data.subscriptions.iter().filter_map(|subscription| {
        let date = row_date("subscription", subscription.approved_on.as_deref())?;
        Some(DividendRow::split(
            date,
            subscription.label.clone().unwrap_or_default(),
            subscription.factor,
        ))
    });

    let mut rows: Vec<DividendRow> = cash.chain(stock).chain(subscriptions).collect();
    rows.sort_by(|left, right| right.date().cmp(&left.date()));
    rows
}

/// Rows dated on or after `period`'s cutoff from `now`.
pub fn windowed(rows: &[DividendRow], period: Period, now: UtcDateTime) -> Vec<DividendRow> {
    match period.cutoff(now) {
        Some(cutoff) => rows
            .iter()
            .filter(|row| row.date() >= cutoff)
            .cloned()
            .collect(),
        None => rows.to_vec(),
    }
}

fn row_date(kind: &str, value: Option<&str>) -> Option<UtcDateTime> {
    let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) else {
        warn!("dropping {kind} row without date");
        return None;
    };
    match UtcDateTime::parse_lenient(value) {
        Ok(date) => Some(date),
        Err(error) => {
            warn!("dropping {kind} row: {error}");
            None
        }
    }
}
