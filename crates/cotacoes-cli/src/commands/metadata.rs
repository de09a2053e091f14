use std::sync::Arc;

use cotacoes_core::{AssetType, CotacoesApi, Filters, MetadataCascade, Sector, SurfaceKind};
use serde::Serialize;

use crate::cli::TypesArgs;
use crate::error::CliError;

use super::{applied, CommandResult, Table};

#[derive(Debug, Serialize)]
struct SectorEntry {
    sector: Sector,
    label: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TypesResponseData {
    sector: Option<Sector>,
    types: Vec<TypeEntry>,
    selection: Filters,
    cleared: bool,
}

#[derive(Debug, Serialize)]
struct TypeEntry {
    #[serde(rename = "type")]
    asset_type: AssetType,
    label: &'static str,
}

pub async fn run_sectors(api: Arc<dyn CotacoesApi>) -> Result<CommandResult, CliError> {
    let cascade = MetadataCascade::new(api);
    let sectors = applied(SurfaceKind::Sectors, cascade.load_sectors().await)?;

    let entries: Vec<SectorEntry> = sectors
        .iter()
        .map(|sector| SectorEntry {
            sector: *sector,
            label: sector.label_pt(),
        })
        .collect();

    let mut table = Table::new(vec!["SECTOR", "LABEL"]);
    for entry in &entries {
        table.push_row(vec![entry.sector.to_string(), entry.label.to_owned()]);
    }

    Ok(CommandResult::new(serde_json::to_value(entries)?, table))
}

pub async fn run_types(
    args: &TypesArgs,
    api: Arc<dyn CotacoesApi>,
) -> Result<CommandResult, CliError> {
    let sector = args
        .sector
        .as_deref()
        .map(str::parse::<Sector>)
        .transpose()?;
    let selected = args
        .selected
        .as_deref()
        .map(str::parse::<AssetType>)
        .transpose()?;

    let cascade = MetadataCascade::new(api);
    cascade.select_type(selected)?;
    let types = applied(SurfaceKind::Types, cascade.select_sector(sector).await)?;

    let selection = cascade.filters();
    let cleared = selected.is_some() && selection.asset_type.is_none();

    let entries: Vec<TypeEntry> = types
        .iter()
        .map(|asset_type| TypeEntry {
            asset_type: *asset_type,
            label: asset_type.label_pt(),
        })
        .collect();

    let mut table = Table::new(vec!["TYPE", "LABEL"]);
    for entry in &entries {
        table.push_row(vec![entry.asset_type.to_string(), entry.label.to_owned()]);
    }
    if let Some(selected) = selected {
        table.push_footer(if cleared {
            format!("selection '{selected}' cleared: not offered for this sector")
        } else {
            format!("selection '{selected}' kept")
        });
    }

    let data = serde_json::to_value(TypesResponseData {
        sector,
        types: entries,
        selection,
        cleared,
    })?;
    Ok(CommandResult::new(data, table))
}
