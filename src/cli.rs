use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ccs")]
#[command(version = concat!("Ver:", env!("CARGO_PKG_VERSION")))]
#[command(about = "Claude API config switcher with endpoint health checks")]
pub struct Cli {
    /// Path to apiConfigs.json (default: ~/.claude/apiConfigs.json)
    #[arg(long = "configs", global = true, value_name = "PATH")]
    pub configs: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List stored API configs
    List,

    /// Check reachability and latency of every stored endpoint
    Health(HealthArgs),
}

#[derive(clap::Args, Debug, Default)]
pub struct HealthArgs {
    /// Path to settings.toml (default: ~/.claude/ccs/settings.toml)
    #[arg(long = "settings", value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Per-probe timeout in milliseconds
    #[arg(long = "timeout-ms", value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Maximum endpoints checked at once
    #[arg(long = "concurrency", value_name = "N")]
    pub concurrency: Option<usize>,

    /// Emit JSON records instead of a table
    #[arg(long = "json")]
    pub json: bool,

    /// Connect directly, ignoring proxy environment variables
    #[arg(long = "no-proxy")]
    pub no_proxy: bool,

    /// Disable coloured output
    #[arg(long = "no-color")]
    pub no_color: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
