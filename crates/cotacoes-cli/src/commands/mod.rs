mod detail;
mod dividends;
mod list;
mod metadata;

use std::sync::Arc;

use cotacoes_core::{ClientConfig, CotacoesApi, HttpCotacoesApi, LoadOutcome, SurfaceKind};
use serde_json::Value;

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// Format-independent result of one command.
pub struct CommandResult {
    pub data: Value,
    pub table: Table,
}

impl CommandResult {
    pub fn new(data: Value, table: Table) -> Self {
        Self { data, table }
    }
}

/// Column-aligned view of a result for `--format table`.
#[derive(Debug, Default)]
pub struct Table {
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
    pub footer: Vec<String>,
}

impl Table {
    pub fn new(headers: Vec<&'static str>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
            footer: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn push_footer(&mut self, line: impl Into<String>) {
        self.footer.push(line.into());
    }
}

pub async fn run(cli: &Cli) -> Result<CommandResult, CliError> {
    let config = resolve_config(cli)?;
    let api: Arc<dyn CotacoesApi> = Arc::new(HttpCotacoesApi::with_reqwest(config.clone())?);

    match &cli.command {
        Command::List(args) => list::run(args, api, &config).await,
        Command::Sectors => metadata::run_sectors(api).await,
        Command::Types(args) => metadata::run_types(args, api).await,
        Command::Detail(args) => detail::run(args, api).await,
        Command::Dividends(args) => dividends::run(args, api).await,
    }
}

/// Environment first, then command-line overrides.
fn resolve_config(cli: &Cli) -> Result<ClientConfig, CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url)?;
    }
    if let Some(per_page) = cli.per_page {
        config = config.with_per_page(per_page)?;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config = config.with_list_timeout_ms(timeout_ms);
    }
    log::debug!("using quotes API at {}", config.base_url);
    Ok(config)
}

fn applied<T>(surface: SurfaceKind, outcome: LoadOutcome<T>) -> Result<T, CliError> {
    match outcome {
        LoadOutcome::Applied(value) => Ok(value),
        LoadOutcome::Failed(error) => Err(CliError::Load(error)),
        LoadOutcome::Superseded => Err(CliError::Superseded { surface }),
    }
}

fn number(value: Option<f64>) -> String {
    value.map_or_else(|| String::from("-"), |value| format!("{value:.2}"))
}

fn compact(value: Option<f64>) -> String {
    let Some(value) = value else {
        return String::from("-");
    };
    let magnitude = value.abs();
    if magnitude >= 1e12 {
        format!("{:.2}T", value / 1e12)
    } else if magnitude >= 1e9 {
        format!("{:.2}B", value / 1e9)
    } else if magnitude >= 1e6 {
        format!("{:.2}M", value / 1e6)
    } else if magnitude >= 1e3 {
        format!("{:.2}K", value / 1e3)
    } else {
        format!("{value:.0}")
    }
}
