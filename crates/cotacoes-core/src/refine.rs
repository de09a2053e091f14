//! Client-side re-filter and re-sort of a loaded page.
//!
//! Re-applies the semantics the quotes endpoint is expected to honor so that
//! a server ignoring part of the request does not produce a visibly wrong
//! page.

use std::cmp::Ordering;

use crate::query::{Filters, SortColumn, SortOrder};
use crate::Quote;

enum SortKey<'a> {
    Number(f64),
    Text(&'a str),
}

fn sort_key(quote: &Quote, column: SortColumn) -> Option<SortKey<'_>> {
    match column {
        SortColumn::Price => quote.price.map(SortKey::Number),
        SortColumn::ChangePercent => quote.change_percent.map(SortKey::Number),
        SortColumn::MarketCap => quote.market_cap.map(SortKey::Number),
        SortColumn::Volume => quote.volume.map(SortKey::Number),
        SortColumn::Ticker => Some(SortKey::Text(quote.ticker.as_str())),
    }
}

/// Keep the quotes matching `filters`, sorted by `column`.
///
/// Missing values go last in both directions. The sort is stable: equal
/// keys keep their input order.
pub fn refine(
    quotes: &[Quote],
    filters: &Filters,
    column: SortColumn,
    order: SortOrder,
) -> Vec<Quote> {
    let mut refined: Vec<Quote> = quotes
        .iter()
        .filter(|quote| filters.matches(quote))
        .cloned()
        .collect();

    refined.sort_by(|left, right| {
        match (sort_key(left, column), sort_key(right, column)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(left), Some(right)) => {
                let ordering = compare_keys(&left, &right);
                match order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                }
            }
        }
    });

    refined
}

fn compare_keys(left: &SortKey<'_>, right: &SortKey<'_>) -> Ordering {
    match (left, right) {
        (SortKey::Number(left), SortKey::Number(right)) => left.total_cmp(right),
        (SortKey::Text(left), SortKey::Text(right)) => compare_text(left, right),
        (SortKey::Number(_), SortKey::Text(_)) => Ordering::Less,
        (SortKey::Text(_), SortKey::Number(_)) => Ordering::Greater,
    }
}

/// Case-insensitive comparison, falling back to the raw strings.
fn compare_text(left: &str, right: &str) -> Ordering {
    left.to_lowercase()
        .cmp(&right.to_lowercase())
        .then_with(|| left.cmp(right))
}
