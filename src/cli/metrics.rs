//! Uptime and usage command implementations

use crate::cli::output::{format_uptime_table, format_usage_table};
use crate::cli::SeriesArgs;
use crate::client::ApiClient;

/// Handle `rpcwatch uptime`
pub async fn handle_uptime(
    args: &SeriesArgs,
    client: &ApiClient,
) -> Result<String, Box<dyn std::error::Error>> {
    let points = client.uptime_series().await?;

    if args.json {
        Ok(serde_json::to_string_pretty(&points)?)
    } else {
        Ok(format_uptime_table(&points))
    }
}

/// Handle `rpcwatch usage`
pub async fn handle_usage(
    args: &SeriesArgs,
    client: &ApiClient,
) -> Result<String, Box<dyn std::error::Error>> {
    let points = client.usage_series().await?;

    if args.json {
        Ok(serde_json::to_string_pretty(&points)?)
    } else {
        Ok(format_usage_table(&points))
    }
}
