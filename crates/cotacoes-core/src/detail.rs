//! Per-asset detail page loading.

use std::future::Future;
use std::sync::Arc;

use log::debug;
use serde::Serialize;

use crate::api::CotacoesApi;
use crate::dividends::{normalize, windowed, DividendRow, Period};
use crate::surface::{LoadOutcome, Surface, SurfaceKind, SurfaceSnapshot};
use crate::{ChartRange, Interval, PricePoint, StockDetail, Symbol, UtcDateTime};

/// Accepted detail payload with its derived views.
///
/// `series` and `timeline` are computed once when the payload is accepted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailView {
    pub symbol: Symbol,
    pub range: ChartRange,
    pub interval: Interval,
    pub detail: StockDetail,
    pub series: Vec<PricePoint>,
    pub timeline: Vec<DividendRow>,
}

impl DetailView {
    pub fn new(symbol: Symbol, range: ChartRange, interval: Interval, detail: StockDetail) -> Self {
        let series = detail.price_series();
        let timeline = normalize(&detail.dividends_data);
        Self {
            symbol,
            range,
            interval,
            detail,
            series,
            timeline,
        }
    }

    /// Timeline rows inside `period`, counted back from `now`.
    pub fn timeline_window(&self, period: Period, now: UtcDateTime) -> Vec<DividendRow> {
        windowed(&self.timeline, period, now)
    }
}

/// Detail page surface with last-request-wins semantics.
#[derive(Clone)]
pub struct DetailSurface {
    api: Arc<dyn CotacoesApi>,
    surface: Arc<Surface<DetailView>>,
}

impl DetailSurface {
    pub fn new(api: Arc<dyn CotacoesApi>) -> Self {
        Self {
            api,
            surface: Arc::new(Surface::new(SurfaceKind::Detail)),
        }
    }

    /// Load `symbol` over `range`, at the range's default interval.
    pub fn load(
        &self,
        symbol: Symbol,
        range: ChartRange,
    ) -> impl Future<Output = LoadOutcome<DetailView>> + Send + 'static {
        self.load_with_interval(symbol, range, range.default_interval())
    }

    pub fn load_with_interval(
        &self,
        symbol: Symbol,
        range: ChartRange,
        interval: Interval,
    ) -> impl Future<Output = LoadOutcome<DetailView>> + Send + 'static {
        let generation = self.surface.begin();
        let api = Arc::clone(&self.api);
        let surface = Arc::clone(&self.surface);
        debug!("detail generation {generation}: {symbol} range {range} interval {interval}");

        async move {
            let result = api
                .stock_detail(symbol.clone(), range, interval)
                .await
                .map(|detail| DetailView::new(symbol, range, interval, detail));
            surface.commit(generation, result)
        }
    }

    pub fn snapshot(&self) -> SurfaceSnapshot<DetailView> {
        self.surface.snapshot()
    }
}
