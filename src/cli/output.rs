//! Output formatting helpers for CLI commands

use crate::client::{Alert, ApiKey, HealthStatus, UptimePoint, UsagePoint};
use crate::health::derive::{
    alert_kind, alert_source, display_name, format_response_time, status_badge, BadgeTone,
};
use crate::health::{best_provider, ProviderHealthRecord, ProviderTable};
use chrono::{DateTime, Utc};
use colored::{ColoredString, Colorize};
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde_json::json;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

fn colored_badge(status: HealthStatus) -> ColoredString {
    let badge = status_badge(status);
    match badge.tone {
        BadgeTone::Success => badge.label.green(),
        BadgeTone::Warning => badge.label.yellow(),
        BadgeTone::Destructive => badge.label.red(),
    }
}

/// Get status icon for provider status
pub fn status_icon(status: HealthStatus) -> &'static str {
    match status {
        HealthStatus::Online => "✓",
        HealthStatus::Slow => "~",
        HealthStatus::Offline => "✗",
        HealthStatus::Unknown => "?",
    }
}

/// Age of a timestamp relative to `now`, e.g. "5m ago"
pub fn format_age(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - at).num_seconds();
    if seconds < 0 {
        return "just now".to_string();
    }
    let seconds = seconds as u64;
    if seconds < 60 {
        format!("{}s ago", seconds)
    } else if seconds < 3600 {
        format!("{}m ago", seconds / 60)
    } else if seconds < 86_400 {
        format!("{}h ago", seconds / 3600)
    } else {
        format!("{}d ago", seconds / 86_400)
    }
}

/// Format providers as a table
pub fn format_providers_table(providers: &ProviderTable, now: DateTime<Utc>) -> String {
    let mut table = new_table(vec![
        "ID",
        "Name",
        "Provider",
        "Status",
        "Response",
        "Uptime",
        "Last Checked",
    ]);

    for r in providers {
        table.add_row(vec![
            Cell::new(r.id),
            Cell::new(&r.name),
            Cell::new(display_name(&r.provider_url)),
            Cell::new(colored_badge(r.status).to_string()),
            Cell::new(format_response_time(r.response_time_ms)),
            Cell::new(format!("{:.1}%", r.uptime)),
            Cell::new(format_age(r.last_checked, now)),
        ]);
    }

    table.to_string()
}

/// One-line summary of the recommended provider
pub fn format_best_provider(record: &ProviderHealthRecord) -> String {
    format!(
        "Best provider: {} {} ({}, response {}, uptime {:.1}%)",
        status_icon(record.status),
        display_name(&record.provider_url).bold(),
        record.name,
        format_response_time(record.response_time_ms),
        record.uptime
    )
}

/// Provider table, counts and best provider as text
pub fn format_providers_pretty(providers: &ProviderTable, now: DateTime<Utc>) -> String {
    if providers.is_empty() {
        return "No providers configured".to_string();
    }

    let mut output = format_providers_table(providers, now);
    output.push('\n');
    output.push_str(&format!(
        "{}/{} online",
        providers.count_status(HealthStatus::Online),
        providers.len()
    ));
    if let Some(best) = best_provider(providers) {
        output.push('\n');
        output.push_str(&format_best_provider(best));
    }
    output
}

/// Format providers as JSON
pub fn format_providers_json(providers: &ProviderTable) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&json!({
        "providers": providers,
        "best_provider": best_provider(providers).map(|r| r.name.as_str()),
    }))
}

/// Format alerts as a table
pub fn format_alerts_table(alerts: &[Alert], now: DateTime<Utc>) -> String {
    if alerts.is_empty() {
        return "No alerts yet".to_string();
    }

    let mut table = new_table(vec!["Kind", "Provider", "Message", "Raised", "Resolved"]);
    for a in alerts {
        let kind = alert_kind(a);
        let kind_display = match kind {
            "offline" | "error" => kind.red(),
            "slow" | "warning" => kind.yellow(),
            "recovered" => kind.green(),
            _ => kind.normal(),
        };
        table.add_row(vec![
            Cell::new(kind_display.to_string()),
            Cell::new(alert_source(a)),
            Cell::new(&a.message),
            Cell::new(format_age(a.created_at, now)),
            Cell::new(if a.resolved { "yes" } else { "no" }),
        ]);
    }
    table.to_string()
}

/// Format the uptime series as a table
pub fn format_uptime_table(points: &[UptimePoint]) -> String {
    let mut table = new_table(vec!["Day", "Date", "Uptime"]);
    for p in points {
        let uptime = format!("{:.2}%", p.uptime);
        let uptime = if p.uptime >= 99.0 {
            uptime.green()
        } else if p.uptime >= 95.0 {
            uptime.yellow()
        } else {
            uptime.red()
        };
        table.add_row(vec![
            Cell::new(&p.name),
            Cell::new(&p.date),
            Cell::new(uptime.to_string()),
        ]);
    }
    table.to_string()
}

/// Format the usage series as a table
pub fn format_usage_table(points: &[UsagePoint]) -> String {
    if points.is_empty() {
        return "No probes recorded in the last 7 days".to_string();
    }

    let mut table = new_table(vec!["Date", "Provider", "Probes"]);
    for p in points {
        table.add_row(vec![
            Cell::new(&p.date),
            Cell::new(&p.provider),
            Cell::new(p.requests),
        ]);
    }
    table.to_string()
}

/// Key prefix followed by a fixed mask, e.g. `rpc_AbCd••••••••••••`
pub fn mask_key(key: &str) -> String {
    let prefix: String = key.chars().take(8).collect();
    format!("{}••••••••••••", prefix)
}

/// Format API keys as a table
pub fn format_api_keys_table(keys: &[ApiKey], now: DateTime<Utc>) -> String {
    if keys.is_empty() {
        return "No API keys yet. Create one with `rpcwatch keys create <NAME>`".to_string();
    }

    let mut table = new_table(vec!["ID", "Name", "Key", "Created", "Last Used"]);
    for k in keys {
        table.add_row(vec![
            Cell::new(k.id),
            Cell::new(&k.name),
            Cell::new(mask_key(&k.key)),
            Cell::new(k.created_at.format("%Y-%m-%d")),
            Cell::new(
                k.last_used
                    .map(|at| format_age(at, now))
                    .unwrap_or_else(|| "never".to_string()),
            ),
        ]);
    }
    table.to_string()
}
