use std::sync::Arc;

use cotacoes_core::{ChartRange, CotacoesApi, DetailSurface, Interval, SurfaceKind, Symbol};

use crate::cli::DetailArgs;
use crate::error::CliError;

use super::{applied, compact, number, CommandResult, Table};

pub async fn run(args: &DetailArgs, api: Arc<dyn CotacoesApi>) -> Result<CommandResult, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let range: ChartRange = args.range.parse()?;
    let interval = match args.interval.as_deref() {
        Some(raw) => raw.parse::<Interval>()?,
        None => range.default_interval(),
    };

    let surface = DetailSurface::new(api);
    let view = applied(
        SurfaceKind::Detail,
        surface.load_with_interval(symbol, range, interval).await,
    )?;

    let detail = &view.detail;
    let text = |value: Option<&String>| value.cloned().unwrap_or_default();
    let mut table = Table::new(vec!["FIELD", "VALUE"]);
    let rows = [
        ("symbol", view.symbol.to_string()),
        (
            "name",
            text(detail.long_name.as_ref().or(detail.short_name.as_ref())),
        ),
        ("currency", text(detail.currency.as_ref())),
        ("price", number(detail.regular_market_price)),
        ("change", number(detail.regular_market_change)),
        ("change%", number(detail.regular_market_change_percent)),
        ("day range", text(detail.regular_market_day_range.as_ref())),
        ("52w range", text(detail.fifty_two_week_range.as_ref())),
        ("market cap", compact(detail.market_cap)),
        ("volume", compact(detail.regular_market_volume)),
        ("p/e", number(detail.price_earnings)),
        ("eps", number(detail.earnings_per_share)),
    ];
    for (field, value) in rows {
        table.push_row(vec![field.to_owned(), value]);
    }

    if let (Some(first), Some(last)) = (view.series.first(), view.series.last()) {
        table.push_footer(format!(
            "{} candles ({} {}) from {} to {}, last close {}",
            view.series.len(),
            view.range,
            view.interval,
            first.at.format_rfc3339(),
            last.at.format_rfc3339(),
            number(last.close)
        ));
    } else {
        table.push_footer("no price history");
    }

    Ok(CommandResult::new(serde_json::to_value(&view)?, table))
}
