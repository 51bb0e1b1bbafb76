//! Watch command implementation

use crate::cli::output::format_providers_pretty;
use crate::cli::WatchArgs;
use crate::client::ApiClient;
use crate::config::RpcWatchConfig;
use crate::health::{HealthPoller, Notification, NotificationLevel};
use colored::Colorize;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

/// Wait for shutdown signal (SIGINT or SIGTERM)
async fn shutdown_signal(cancel_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, stopping watch...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, stopping watch...");
        }
        _ = cancel_token.cancelled() => {}
    }

    cancel_token.cancel();
}

fn format_notification(notification: &Notification) -> String {
    match notification.level {
        NotificationLevel::Success => format!("{} {}", "✓".green(), notification.message),
        NotificationLevel::Error => format!("{} {}", "✗".red(), notification.message.red()),
    }
}

/// Run a polling session until interrupted
pub async fn run_watch(
    args: &WatchArgs,
    mut config: RpcWatchConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(interval) = args.interval {
        config.poller.interval_seconds = interval;
    }
    config.validate()?;

    let session = CancellationToken::new();
    let client = ApiClient::new(&config.api)?;
    let poller = Arc::new(
        HealthPoller::new(client, config.poller.clone()).with_session(session.clone()),
    );

    let mut updates = poller.subscribe();
    let mut notifications = poller.notifications();

    let signal_handle = tokio::spawn(shutdown_signal(session.clone()));
    let poller_handle = Arc::clone(&poller).start();

    println!(
        "Watching {} every {}s (Ctrl-C to stop)",
        config.api.base_url, config.poller.interval_seconds
    );

    loop {
        tokio::select! {
            _ = session.cancelled() => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let table = updates.borrow_and_update().clone();
                println!();
                println!("{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
                println!("{}", format_providers_pretty(&table, chrono::Utc::now()));
            }
            received = notifications.recv() => match received {
                Ok(notification) => println!("{}", format_notification(&notification)),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Dropped notifications while rendering");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    session.cancel();
    poller_handle.await?;
    signal_handle.await?;
    Ok(())
}
