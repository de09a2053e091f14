//! Behavior tests for the dividend timeline: merge order and period windows.

use cotacoes_core::dividends::{normalize, windowed, SPLIT_DESCRIPTION};
use cotacoes_core::{DividendRow, DividendsData, Period, UtcDateTime};
use serde_json::json;

fn data(value: serde_json::Value) -> DividendsData {
    serde_json::from_value(value).expect("dividends payload")
}

fn at(value: &str) -> UtcDateTime {
    UtcDateTime::parse_lenient(value).expect("fixed date")
}

fn dates(rows: &[DividendRow]) -> Vec<String> {
    rows.iter().map(|row| row.date().format_date()).collect()
}

// =============================================================================
// Merge and order
// =============================================================================

#[test]
fn when_split_is_newer_than_cash_split_comes_first() {
    // Given: one cash dividend in January and one split in March
    let payload = data(json!({
        "cashDividends": [
            { "paymentDate": "2024-01-10", "rate": 1.5, "label": "DIVIDENDO", "relatedTo": "Q4" }
        ],
        "stockDividends": [
            { "approvedOn": "2024-03-01", "factor": 2, "label": "DESDOBRAMENTO" }
        ]
    }));

    // When
    let rows = normalize(&payload);

    // Then
    assert_eq!(rows.len(), 2);
    assert_eq!(
        rows[0],
        DividendRow::Split {
            date: at("2024-03-01"),
            year: 2024,
            label: "DESDOBRAMENTO".to_owned(),
            description: SPLIT_DESCRIPTION.to_owned(),
            factor: Some(2.0),
        }
    );
    assert_eq!(
        rows[1],
        DividendRow::Cash {
            date: at("2024-01-10"),
            year: 2024,
            label: "DIVIDENDO".to_owned(),
            related_to: Some("Q4".to_owned()),
            rate: Some(1.5),
        }
    );
}

#[test]
fn when_dates_tie_cash_rows_precede_split_rows() {
    // Given: cash and split on the same day, split listed first upstream
    let payload = data(json!({
        "stockDividends": [{ "approvedOn": "2023-12-01", "factor": 0.1, "label": "GRUPAMENTO" }],
        "cashDividends": [
            { "paymentDate": "2023-12-01", "rate": 0.2, "label": "JCP", "relatedTo": "4T23" },
            { "paymentDate": "2023-12-01", "rate": 0.3, "label": "DIVIDENDO", "relatedTo": "4T23" }
        ]
    }));

    // When
    let rows = normalize(&payload);

    // Then: cash first in input order, then the split
    let labels: Vec<&str> = rows.iter().map(DividendRow::label).collect();
    assert_eq!(labels, ["JCP", "DIVIDENDO", "GRUPAMENTO"]);
    assert!(rows[0].is_cash() && rows[1].is_cash() && !rows[2].is_cash());
}

#[test]
fn when_many_events_are_merged_they_are_strictly_date_descending() {
    // Given
    let payload = data(json!({
        "cashDividends": [
            { "paymentDate": "2021-05-03T03:00:00.000Z", "rate": 0.5, "label": "DIVIDENDO" },
            { "paymentDate": "2024-11-29T03:00:00.000Z", "rate": 0.7, "label": "JCP" }
        ],
        "stockDividends": [
            { "approvedOn": "2022-04-28T03:00:00.000Z", "factor": 1.2, "label": "BONIFICACAO" }
        ],
        "subscriptions": [
            { "approvedOn": "2023-02-14T03:00:00.000Z", "factor": 0.05, "label": "SUBSCRICAO" }
        ]
    }));

    // When
    let rows = normalize(&payload);

    // Then
    assert_eq!(
        dates(&rows),
        ["2024-11-29", "2023-02-14", "2022-04-28", "2021-05-03"]
    );
    let years: Vec<i32> = rows.iter().map(DividendRow::year).collect();
    assert_eq!(years, [2024, 2023, 2022, 2021]);
}

#[test]
fn when_payload_is_empty_or_null_timeline_is_empty() {
    let payload = data(json!({ "cashDividends": null, "stockDividends": [] }));
    assert!(normalize(&payload).is_empty());
}

#[test]
fn when_projected_cash_and_split_values_stay_in_separate_columns() {
    let payload = data(json!({
        "cashDividends": [{ "paymentDate": "2024-06-01", "rate": 0.9, "label": "DIVIDENDO" }],
        "stockDividends": [{ "approvedOn": "2024-05-01", "factor": 3, "label": "DESDOBRAMENTO" }]
    }));

    let entries: Vec<_> = normalize(&payload)
        .iter()
        .map(DividendRow::projection)
        .collect();

    assert_eq!((entries[0].value, entries[0].factor), (Some(0.9), None));
    assert_eq!((entries[1].value, entries[1].factor), (None, Some(3.0)));
    let serialized = serde_json::to_value(&entries[1]).expect("serializable");
    assert_eq!(serialized["type"], "DESDOBRAMENTO");
    assert_eq!(serialized["description"], SPLIT_DESCRIPTION);
}

// =============================================================================
// Period windows
// =============================================================================

#[test]
fn when_window_is_six_months_boundary_row_is_included_and_older_row_excluded() {
    // Given: evaluation at 2024-08-31, so the cutoff is 2024-02-29
    let now = at("2024-08-31");
    let rows = vec![
        DividendRow::cash(at("2024-08-30"), "DIVIDENDO", None, Some(1.0)),
        DividendRow::cash(at("2024-02-29"), "DIVIDENDO", None, Some(1.0)),
        DividendRow::cash(at("2024-02-28"), "DIVIDENDO", None, Some(1.0)),
    ];

    // When
    let kept = windowed(&rows, Period::SixMonths, now);

    // Then
    assert_eq!(dates(&kept), ["2024-08-30", "2024-02-29"]);
}

#[test]
fn when_window_changes_cutoff_follows_calendar_units() {
    // Given: one row per year going back six years
    let now = at("2025-01-15T12:00:00Z");
    let rows: Vec<DividendRow> = [
        "2025-01-01",
        "2024-12-15T12:00:00Z",
        "2024-12-15T11:59:59Z",
        "2024-01-15T12:00:00Z",
        "2020-01-15T12:00:00Z",
        "2019-06-01",
    ]
    .into_iter()
    .map(|date| DividendRow::split(at(date), "BONIFICACAO", Some(1.1)))
    .collect();

    // When / Then
    assert_eq!(windowed(&rows, Period::OneMonth, now).len(), 2);
    assert_eq!(windowed(&rows, Period::SixMonths, now).len(), 3);
    assert_eq!(windowed(&rows, Period::OneYear, now).len(), 4);
    assert_eq!(windowed(&rows, Period::FiveYears, now).len(), 5);
    assert_eq!(windowed(&rows, Period::All, now).len(), 6);
}

#[test]
fn when_window_filters_rows_order_is_preserved() {
    let payload = data(json!({
        "cashDividends": [
            { "paymentDate": "2024-07-01", "rate": 0.1, "label": "A" },
            { "paymentDate": "2024-09-01", "rate": 0.2, "label": "B" },
            { "paymentDate": "2020-01-01", "rate": 0.3, "label": "C" }
        ]
    }));
    let rows = normalize(&payload);

    let kept = windowed(&rows, Period::OneYear, at("2024-10-01"));

    let labels: Vec<&str> = kept.iter().map(DividendRow::label).collect();
    assert_eq!(labels, ["B", "A"]);
}
