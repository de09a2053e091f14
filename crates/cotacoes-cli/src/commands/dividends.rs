use std::sync::Arc;

use cotacoes_core::{
    ChartRange, CotacoesApi, DetailSurface, Period, SurfaceKind, Symbol, TimelineEntry,
    UtcDateTime,
};
use serde::Serialize;

use crate::cli::DividendsArgs;
use crate::error::CliError;

use super::{applied, number, CommandResult, Table};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DividendsResponseData {
    symbol: Symbol,
    period: Period,
    rows: Vec<TimelineEntry>,
}

pub async fn run(
    args: &DividendsArgs,
    api: Arc<dyn CotacoesApi>,
) -> Result<CommandResult, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let period: Period = args.period.parse()?;

    let surface = DetailSurface::new(api);
    let view = applied(
        SurfaceKind::Detail,
        surface.load(symbol.clone(), ChartRange::default()).await,
    )?;

    let rows: Vec<TimelineEntry> = view
        .timeline_window(period, UtcDateTime::now())
        .iter()
        .map(|row| row.projection())
        .collect();

    let mut table = Table::new(vec!["DATE", "YEAR", "TYPE", "DESCRIPTION", "VALUE", "FACTOR"]);
    for entry in &rows {
        table.push_row(vec![
            entry.date.format_date(),
            entry.year.to_string(),
            entry.label.clone(),
            entry.description.clone().unwrap_or_default(),
            number(entry.value),
            entry.factor.map(|factor| format!("x{factor}")).unwrap_or_default(),
        ]);
    }
    table.push_footer(format!(
        "{} of {} events within {period}",
        rows.len(),
        view.timeline.len()
    ));

    let data = serde_json::to_value(DividendsResponseData {
        symbol,
        period,
        rows,
    })?;
    Ok(CommandResult::new(data, table))
}
