//! Display values derived from provider records.
//!
//! All functions here are pure: they look at a record or table and never
//! touch poller state.

use super::state::{ProviderHealthRecord, ProviderTable};
use crate::client::{Alert, HealthStatus};

/// Provider currently recommended for use.
///
/// First record in table order whose status is online; when nothing is
/// online, the first record regardless of status. Ties among online
/// providers go to whichever the backend listed first.
pub fn best_provider(table: &ProviderTable) -> Option<&ProviderHealthRecord> {
    table
        .iter()
        .find(|r| r.status == HealthStatus::Online)
        .or_else(|| table.iter().next())
}

/// Visual weight of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Success,
    Warning,
    Destructive,
}

/// Label and tone shown for a provider status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusBadge {
    pub label: &'static str,
    pub tone: BadgeTone,
}

/// Badge for a status. Unknown renders like offline.
pub fn status_badge(status: HealthStatus) -> StatusBadge {
    match status {
        HealthStatus::Online => StatusBadge {
            label: "Online",
            tone: BadgeTone::Success,
        },
        HealthStatus::Slow => StatusBadge {
            label: "Slow",
            tone: BadgeTone::Warning,
        },
        HealthStatus::Offline | HealthStatus::Unknown => StatusBadge {
            label: "Offline",
            tone: BadgeTone::Destructive,
        },
    }
}

/// Friendly name for a provider URL.
pub fn display_name(url: &str) -> String {
    if url.is_empty() {
        "Unknown Provider".to_string()
    } else if url.contains("primordial") {
        "Primordial Node".to_string()
    } else if url.contains("awakening") {
        "Awakening Relay".to_string()
    } else {
        url.strip_prefix("https://").unwrap_or(url).to_string()
    }
}

/// Response time for display; zero means "not measured".
pub fn format_response_time(ms: f64) -> String {
    if ms > 0.0 {
        format!("{:.0}ms", ms)
    } else {
        "N/A".to_string()
    }
}

/// Alert category: explicit type, else severity, else "info".
pub fn alert_kind(alert: &Alert) -> &str {
    alert
        .alert_type
        .as_deref()
        .filter(|t| !t.is_empty())
        .or_else(|| Some(alert.severity.as_str()).filter(|s| !s.is_empty()))
        .unwrap_or("info")
}

/// Provider name shown next to an alert.
pub fn alert_source(alert: &Alert) -> String {
    match alert.provider_url.as_deref() {
        Some(url) => display_name(url),
        None if alert.provider_name.is_empty() => "Unknown Provider".to_string(),
        None => alert.provider_name.clone(),
    }
}
