//! Login, logout and whoami command implementations
//!
//! The access token is persisted to `api.token_file`, which the client
//! re-reads on every request.

use crate::cli::{LoginArgs, WhoamiArgs};
use crate::client::{ApiClient, User};
use crate::config::{ConfigError, RpcWatchConfig};
use colored::Colorize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

fn token_file(config: &RpcWatchConfig) -> Result<&PathBuf, ConfigError> {
    config
        .api
        .token_file
        .as_ref()
        .ok_or_else(|| ConfigError::Validation {
            field: "api.token_file".to_string(),
            message: "no token file configured (use --token-file or RPCWATCH_TOKEN_FILE)"
                .to_string(),
        })
}

/// Write the token, readable only by the owner on unix
pub fn store_token(path: &Path, token: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    writeln!(file, "{}", token)?;
    Ok(())
}

fn format_user(user: &User) -> String {
    format!("Logged in as {} (id {})", user.email.bold(), user.id)
}

/// Handle `rpcwatch login`
pub async fn handle_login(
    args: &LoginArgs,
    config: &RpcWatchConfig,
) -> Result<String, Box<dyn std::error::Error>> {
    let path = token_file(config)?;
    let client = ApiClient::new(&config.api)?;

    let issued = if args.register {
        client.register(&args.email, &args.password).await?
    } else {
        client.login(&args.email, &args.password).await?
    };
    store_token(path, &issued.access_token)?;
    tracing::info!(path = %path.display(), "Stored access token");

    // Confirm the new token, not whichever one is configured
    let mut api = config.api.clone();
    api.token = Some(issued.access_token);
    let user = ApiClient::new(&api)?.current_user().await?;

    let mut output = format_user(&user);
    if config.api.token.is_some() {
        output.push('\n');
        output.push_str(
            &"Warning: a static token is configured and takes precedence over the token file"
                .yellow()
                .to_string(),
        );
    }
    Ok(output)
}

/// Handle `rpcwatch logout`
pub fn handle_logout(config: &RpcWatchConfig) -> Result<String, Box<dyn std::error::Error>> {
    let path = token_file(config)?;
    if !path.exists() {
        return Ok("Not logged in".to_string());
    }
    fs::remove_file(path)?;
    Ok(format!("Logged out (removed {})", path.display()))
}

/// Handle `rpcwatch whoami`
pub async fn handle_whoami(
    args: &WhoamiArgs,
    client: &ApiClient,
) -> Result<String, Box<dyn std::error::Error>> {
    let user = client.current_user().await?;
    if args.json {
        Ok(serde_json::to_string_pretty(&user)?)
    } else {
        Ok(format_user(&user))
    }
}
