//! CLI module for rpcwatch
//!
//! Command-line interface definitions and handlers.
//!
//! # Commands
//!
//! - `status` - Fetch providers once and show their health
//! - `check` - Ask the backend to probe a provider, then show health
//! - `watch` - Poll continuously until interrupted
//! - `alerts` - List recent alerts
//! - `uptime` - Seven-day uptime series
//! - `usage` - Daily probe counts per provider
//! - `login` / `logout` / `whoami` - Account sign-in and the stored token
//! - `keys` - API key management (list, create, delete)
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # One-shot status against a remote backend
//! rpcwatch --api-url https://monitor.example.com status
//!
//! # Probe provider 5 now and print the refreshed table
//! rpcwatch check 5
//!
//! # Refresh every 10 seconds until Ctrl-C
//! rpcwatch watch --interval 10
//! ```

pub mod alerts;
pub mod auth;
pub mod completions;
pub mod config;
pub mod keys;
pub mod metrics;
pub mod output;
pub mod status;
pub mod watch;

pub use completions::handle_completions;
pub use config::handle_config_init;

use crate::config::RpcWatchConfig;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// rpcwatch - RPC provider health monitor
#[derive(Parser, Debug)]
#[command(
    name = "rpcwatch",
    version,
    about = "Monitor RPC provider health through a monitoring backend"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "rpcwatch.toml")]
    pub config: PathBuf,

    /// Override backend base URL
    #[arg(long, global = true, env = "RPCWATCH_API_URL")]
    pub api_url: Option<String>,

    /// Bearer token for the backend
    #[arg(long, global = true, env = "RPCWATCH_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// File holding the bearer token; `login` writes it
    #[arg(long, global = true, env = "RPCWATCH_TOKEN_FILE")]
    pub token_file: Option<PathBuf>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, env = "RPCWATCH_LOG_LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show current provider health
    Status(StatusArgs),
    /// Probe a provider now and show refreshed health
    Check(CheckArgs),
    /// Poll provider health until interrupted
    Watch(WatchArgs),
    /// List recent alerts
    Alerts(AlertsArgs),
    /// Show seven-day uptime
    Uptime(SeriesArgs),
    /// Show daily probe counts per provider
    Usage(SeriesArgs),
    /// Sign in and store the access token
    Login(LoginArgs),
    /// Remove the stored access token
    Logout,
    /// Show the signed-in account
    Whoami(WhoamiArgs),
    /// Manage API keys
    #[command(subcommand)]
    Keys(KeysCommands),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Provider ID to probe; omit to only refresh
    pub provider_id: Option<i64>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Seconds between refreshes (overrides config)
    #[arg(short, long)]
    pub interval: Option<u64>,
}

#[derive(Args, Debug)]
pub struct AlertsArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Maximum number of alerts to show
    #[arg(short = 'n', long, default_value = "10")]
    pub limit: usize,
}

#[derive(Args, Debug)]
pub struct SeriesArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct LoginArgs {
    /// Account email
    #[arg(long, env = "RPCWATCH_EMAIL")]
    pub email: String,

    /// Account password
    #[arg(long, env = "RPCWATCH_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Create the account instead of signing in to an existing one
    #[arg(long)]
    pub register: bool,
}

impl std::fmt::Debug for LoginArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginArgs")
            .field("email", &self.email)
            .field("password", &"***")
            .field("register", &self.register)
            .finish()
    }
}

#[derive(Args, Debug)]
pub struct WhoamiArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum KeysCommands {
    /// List active API keys
    List(KeysListArgs),
    /// Create an API key and print it once
    Create(KeysCreateArgs),
    /// Deactivate an API key
    Delete(KeysDeleteArgs),
}

#[derive(Args, Debug)]
pub struct KeysListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct KeysCreateArgs {
    /// Label for the new key
    pub name: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct KeysDeleteArgs {
    /// ID of the key to delete
    pub id: i64,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "rpcwatch.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Load configuration with CLI overrides
///
/// A missing config file is not an error; defaults are used instead.
pub fn load_config(args: &GlobalArgs) -> Result<RpcWatchConfig, Box<dyn std::error::Error>> {
    let mut config = if args.config.exists() {
        RpcWatchConfig::load(Some(&args.config))?
    } else {
        RpcWatchConfig::default()
    };

    config = config.with_env_overrides();

    if let Some(ref url) = args.api_url {
        config.api.base_url = url.clone();
    }
    if let Some(ref token) = args.token {
        config.api.token = Some(token.clone());
    }
    if let Some(ref path) = args.token_file {
        config.api.token_file = Some(path.clone());
    }
    if let Some(ref level) = args.log_level {
        config.logging.level = level.clone();
    }

    config.validate()?;
    Ok(config)
}
