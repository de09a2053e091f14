//! Behavior tests for the per-asset detail surface.

mod support;

use cotacoes_core::{
    ApiErrorKind, ChartRange, DetailSurface, DividendRow, Interval, LoadOutcome, Period, Symbol,
    UtcDateTime,
};
use serde_json::json;

use support::{api, transport_failure, ScriptedHttpClient};

fn symbol(raw: &str) -> Symbol {
    Symbol::parse(raw).expect("valid symbol")
}

fn detail_body(symbol: &str, price: f64) -> serde_json::Value {
    json!({
        "symbol": symbol,
        "longName": format!("{symbol} S.A."),
        "currency": "BRL",
        "regularMarketPrice": price,
        "regularMarketChange": -0.3,
        "historicalDataPrice": [
            { "date": 1_717_425_000, "open": 10.0, "close": 10.5 },
            { "date": 1_717_252_200, "open": 9.5, "close": 10.0 },
            { "date": null, "close": 1.0 }
        ],
        "dividendsData": {
            "cashDividends": [
                { "paymentDate": "2024-05-20T00:00:00.000Z", "rate": 0.45, "label": "DIVIDENDO", "relatedTo": "1T24" }
            ],
            "stockDividends": [
                { "approvedOn": "2024-06-03T00:00:00.000Z", "factor": 2, "label": "DESDOBRAMENTO" }
            ]
        }
    })
}

// =============================================================================
// Request shape
// =============================================================================

#[tokio::test]
async fn when_short_range_is_loaded_hourly_interval_is_requested() {
    // Given
    let client = ScriptedHttpClient::new();
    client.respond_json("/stocks/PETR4", &[], detail_body("PETR4", 37.0));
    let surface = DetailSurface::new(api(&client));

    // When: the default range is loaded
    let outcome = surface.load(symbol("petr4"), ChartRange::default()).await;

    // Then: 5d implies 1h
    assert!(outcome.is_applied());
    let requests = client.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].query_param("range"), Some("5d"));
    assert_eq!(requests[0].query_param("interval"), Some("1h"));
}

#[tokio::test]
async fn when_longer_ranges_are_loaded_daily_interval_is_requested() {
    for range in [
        ChartRange::OneMonth,
        ChartRange::ThreeMonths,
        ChartRange::SixMonths,
        ChartRange::OneYear,
        ChartRange::TwoYears,
        ChartRange::FiveYears,
    ] {
        let client = ScriptedHttpClient::new();
        client.respond_json("/stocks/VALE3", &[], detail_body("VALE3", 60.0));
        let surface = DetailSurface::new(api(&client));

        let view = surface
            .load(symbol("VALE3"), range)
            .await
            .applied()
            .expect("detail applies");

        assert_eq!(view.interval, Interval::OneDay);
        assert_eq!(client.requests()[0].query_param("interval"), Some("1d"));
        assert_eq!(
            client.requests()[0].query_param("range"),
            Some(range.as_str())
        );
    }
}

// =============================================================================
// Derived views
// =============================================================================

#[tokio::test]
async fn when_detail_is_accepted_series_and_timeline_are_derived_once() {
    // Given
    let client = ScriptedHttpClient::new();
    client.respond_json("/stocks/ITUB4", &[], detail_body("ITUB4", 33.1));
    let surface = DetailSurface::new(api(&client));

    // When
    surface.load(symbol("ITUB4"), ChartRange::OneMonth).await;
    let view = surface.snapshot().data.expect("detail loaded");

    // Then: history ascending without undated candles
    let closes: Vec<Option<f64>> = view.series.iter().map(|point| point.close).collect();
    assert_eq!(closes, [Some(10.0), Some(10.5)]);
    assert!(view.series[0].at < view.series[1].at);

    // And: the timeline is merged newest first
    assert_eq!(view.timeline.len(), 2);
    assert!(matches!(view.timeline[0], DividendRow::Split { .. }));
    assert!(view.timeline[1].is_cash());

    // And: reading twice yields the same stored timeline
    let again = surface.snapshot().data.expect("detail loaded");
    assert_eq!(again.timeline, view.timeline);
    assert_eq!(view.detail.long_name.as_deref(), Some("ITUB4 S.A."));
    assert!(!view.detail.is_positive());
}

#[tokio::test]
async fn when_timeline_is_windowed_old_events_drop_out() {
    let client = ScriptedHttpClient::new();
    client.respond_json("/stocks/BBAS3", &[], detail_body("BBAS3", 27.4));
    let surface = DetailSurface::new(api(&client));
    let view = surface
        .load(symbol("BBAS3"), ChartRange::OneYear)
        .await
        .applied()
        .expect("detail applies");

    let now = UtcDateTime::parse("2024-06-25T00:00:00Z").expect("fixed instant");
    let last_month = view.timeline_window(Period::OneMonth, now);

    assert_eq!(last_month.len(), 1);
    assert_eq!(last_month[0].label(), "DESDOBRAMENTO");
    assert_eq!(view.timeline_window(Period::All, now).len(), 2);
}

// =============================================================================
// Staleness and failures
// =============================================================================

#[tokio::test]
async fn when_user_opens_another_asset_the_previous_response_is_discarded() {
    // Given: PETR4 is slow, VALE3 is fast
    let client = ScriptedHttpClient::new();
    let petr_gate = client.gate("/stocks/PETR4", &[]);
    client.respond_json("/stocks/VALE3", &[], detail_body("VALE3", 61.0));
    let surface = DetailSurface::new(api(&client));

    // When
    let stale = tokio::spawn(surface.load(symbol("PETR4"), ChartRange::FiveDays));
    surface.load(symbol("VALE3"), ChartRange::FiveDays).await;
    petr_gate
        .send(Ok(cotacoes_core::HttpResponse::ok_json(
            detail_body("PETR4", 37.0).to_string(),
        )))
        .expect("PETR4 request waiting");
    let stale = stale.await.expect("task joins");

    // Then
    assert!(stale.is_superseded());
    let view = surface.snapshot().data.expect("detail loaded");
    assert_eq!(view.symbol.as_str(), "VALE3");
    assert_eq!(view.detail.regular_market_price, Some(61.0));
}

#[tokio::test]
async fn when_detail_reload_fails_previous_payload_stays() {
    // Given: a first successful load, then a network failure
    let client = ScriptedHttpClient::new();
    client.respond_json("/stocks/WEGE3", &[], detail_body("WEGE3", 52.0));
    client.respond("/stocks/WEGE3", &[], transport_failure("connection refused"));
    let surface = DetailSurface::new(api(&client));
    surface.load(symbol("WEGE3"), ChartRange::FiveDays).await;

    // When
    let outcome = surface.load(symbol("WEGE3"), ChartRange::OneMonth).await;

    // Then
    let LoadOutcome::Failed(error) = outcome else {
        panic!("expected failure");
    };
    assert_eq!(error.to_string(), "failed to load detail");
    let snapshot = surface.snapshot();
    assert_eq!(snapshot.error, Some(error));
    let view = snapshot.data.expect("previous detail kept");
    assert_eq!(view.range, ChartRange::FiveDays);
}

#[tokio::test]
async fn when_symbol_is_unknown_upstream_status_is_reported() {
    let client = ScriptedHttpClient::new();
    client.respond(
        "/stocks/XPTO3",
        &[],
        Ok(cotacoes_core::HttpResponse::with_status(
            404,
            r#"{"error":"Stock XPTO3 not found"}"#,
        )),
    );
    let surface = DetailSurface::new(api(&client));

    let outcome = surface.load(symbol("XPTO3"), ChartRange::FiveDays).await;

    let LoadOutcome::Failed(error) = outcome else {
        panic!("expected failure");
    };
    assert_eq!(error.cause().kind(), ApiErrorKind::UpstreamStatus);
    assert!(error.cause().message().contains("not found"));
    assert!(surface.snapshot().data.is_none());
}
