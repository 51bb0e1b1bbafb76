//! Alerts command implementation

use crate::cli::output::format_alerts_table;
use crate::cli::AlertsArgs;
use crate::client::ApiClient;

/// Handle `rpcwatch alerts`
pub async fn handle_alerts(
    args: &AlertsArgs,
    client: &ApiClient,
) -> Result<String, Box<dyn std::error::Error>> {
    let mut alerts = client.list_alerts().await?;
    alerts.truncate(args.limit);

    if args.json {
        Ok(serde_json::to_string_pretty(&alerts)?)
    } else {
        Ok(format_alerts_table(&alerts, chrono::Utc::now()))
    }
}
