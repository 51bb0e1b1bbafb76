//! API key command implementations

use crate::cli::output::format_api_keys_table;
use crate::cli::{KeysCreateArgs, KeysDeleteArgs, KeysListArgs};
use crate::client::ApiClient;
use colored::Colorize;

/// Handle `rpcwatch keys list`
pub async fn handle_keys_list(
    args: &KeysListArgs,
    client: &ApiClient,
) -> Result<String, Box<dyn std::error::Error>> {
    let keys = client.list_api_keys().await?;

    if args.json {
        Ok(serde_json::to_string_pretty(&keys)?)
    } else {
        Ok(format_api_keys_table(&keys, chrono::Utc::now()))
    }
}

/// Handle `rpcwatch keys create`
///
/// The full key is only shown here; listings mask it.
pub async fn handle_keys_create(
    args: &KeysCreateArgs,
    client: &ApiClient,
) -> Result<String, Box<dyn std::error::Error>> {
    let key = client.create_api_key(&args.name).await?;

    if args.json {
        return Ok(serde_json::to_string_pretty(&key)?);
    }
    Ok(format!(
        "{} Created API key '{}' (id {})\n{}",
        "✓".green(),
        key.name,
        key.id,
        key.key.bold()
    ))
}

/// Handle `rpcwatch keys delete`
pub async fn handle_keys_delete(
    args: &KeysDeleteArgs,
    client: &ApiClient,
) -> Result<String, Box<dyn std::error::Error>> {
    client.delete_api_key(args.id).await?;
    Ok(format!("{} Deleted API key {}", "✓".green(), args.id))
}
