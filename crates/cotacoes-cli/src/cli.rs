//! CLI argument definitions for cotacoes.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `list` | Load one page of quotes |
//! | `sectors` | List the sector catalog |
//! | `types` | List asset types, optionally for one sector |
//! | `detail` | Show one asset with its price history |
//! | `dividends` | Show the dividend timeline of one asset |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--base-url` | `COTACOES_API_URL` or `http://localhost:8080` | Quotes API origin |
//! | `--per-page` | `COTACOES_PER_PAGE` or `10` | Page size for `list` |
//! | `--timeout-ms` | `COTACOES_TIMEOUT_MS` or `3000` | List request timeout |
//! | `--verbose` | `false` | Debug logging |
//!
//! # Examples
//!
//! ```bash
//! cotacoes list --sector Finance --type stock --sort-by price --order asc
//! cotacoes types --sector Finance --selected bdr
//! cotacoes detail PETR4 --range 1mo --format table
//! cotacoes dividends ITUB4 --period 6m
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Browse B3 quotes from the command line.
#[derive(Debug, Parser)]
#[command(
    name = "cotacoes",
    author,
    version,
    about = "Quote list, sector filters and dividend history from the cotacoes API"
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Quotes API origin. Overrides COTACOES_API_URL.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Rows per page for `list`. Overrides COTACOES_PER_PAGE.
    #[arg(long, global = true)]
    pub per_page: Option<u32>,

    /// List request timeout in milliseconds. Overrides COTACOES_TIMEOUT_MS.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Log at debug level (RUST_LOG still wins when set).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned columns for terminal display.
    Table,
    /// Single JSON document.
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load one page of quotes.
    ///
    ///   cotacoes list
    ///   cotacoes list --sector "Energy Minerals" --sort-by changePercent --order desc
    ///   cotacoes list --page 3
    List(ListArgs),

    /// List the sector catalog.
    Sectors,

    /// List the asset types offered, for one sector or the whole market.
    ///
    /// With --selected, reports whether that type survives the sector change.
    Types(TypesArgs),

    /// Show one asset: quote summary and price history.
    Detail(DetailArgs),

    /// Show the merged cash/split timeline of one asset.
    Dividends(DividendsArgs),
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Sector label, e.g. "Finance".
    #[arg(long)]
    pub sector: Option<String>,

    /// Asset type: stock, fund or bdr. Must be offered for --sector.
    #[arg(long = "type")]
    pub asset_type: Option<String>,

    /// Sort column: price, changePercent, marketCap, volume or ticker.
    #[arg(long)]
    pub sort_by: Option<String>,

    /// Sort order: asc or desc.
    #[arg(long)]
    pub order: Option<String>,

    /// 1-based page number.
    #[arg(long, default_value_t = 1)]
    pub page: u32,
}

#[derive(Debug, Args)]
pub struct TypesArgs {
    /// Sector label; omit for the whole market.
    #[arg(long)]
    pub sector: Option<String>,

    /// Asset type selected before the sector change.
    #[arg(long)]
    pub selected: Option<String>,
}

#[derive(Debug, Args)]
pub struct DetailArgs {
    /// Ticker, e.g. PETR4.
    pub symbol: String,

    /// History window: 5d, 1mo, 3mo, 6mo, 1y, 2y or 5y.
    #[arg(long, default_value = "5d")]
    pub range: String,

    /// Candle interval; defaults to the one implied by --range.
    #[arg(long)]
    pub interval: Option<String>,
}

#[derive(Debug, Args)]
pub struct DividendsArgs {
    /// Ticker, e.g. ITUB4.
    pub symbol: String,

    /// Look-back window: 1m, 6m, 1y, 5y or all.
    #[arg(long, default_value = "all")]
    pub period: String,
}
