//! Status and check command implementations

use crate::cli::output::{format_providers_json, format_providers_pretty};
use crate::cli::{CheckArgs, StatusArgs};
use crate::health::{HealthPoller, ProviderTable};

fn render(table: &ProviderTable, json: bool) -> Result<String, Box<dyn std::error::Error>> {
    if json {
        Ok(format_providers_json(table)?)
    } else {
        Ok(format_providers_pretty(table, chrono::Utc::now()))
    }
}

/// Handle `rpcwatch status`: one fetch, then print the table
pub async fn handle_status(
    args: &StatusArgs,
    poller: &HealthPoller,
) -> Result<String, Box<dyn std::error::Error>> {
    poller.fetch_providers().await?;
    render(&poller.snapshot(), args.json)
}

/// Handle `rpcwatch check`: optional probe, fetch, then print the table
pub async fn handle_check(
    args: &CheckArgs,
    poller: &HealthPoller,
) -> Result<String, Box<dyn std::error::Error>> {
    poller.trigger_health_check(args.provider_id).await?;
    render(&poller.snapshot(), args.json)
}
