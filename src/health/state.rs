//! Provider health table and the records it holds.

use crate::client::{HealthStatus, Provider};
use chrono::{DateTime, Utc};
use serde::ser::{Serialize, Serializer};
use std::collections::HashMap;

/// Client-side view of one provider, rebuilt from scratch on every fetch.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ProviderHealthRecord {
    pub name: String,
    pub id: i64,
    pub provider_url: String,
    pub status: HealthStatus,
    /// Latest latency, `0.0` when there is no probe or it measured nothing
    pub response_time_ms: f64,
    pub uptime: f64,
    pub last_checked: DateTime<Utc>,
}

impl From<&Provider> for ProviderHealthRecord {
    fn from(provider: &Provider) -> Self {
        let (status, response_time_ms, last_checked) = match &provider.latest_health {
            Some(health) => (
                health.status,
                health.response_time_ms.unwrap_or(0.0),
                health.checked_at,
            ),
            None => (HealthStatus::Unknown, 0.0, provider.created_at),
        };

        Self {
            name: provider.name.clone(),
            id: provider.id,
            provider_url: provider.url.clone(),
            status,
            response_time_ms,
            uptime: provider.uptime,
            last_checked,
        }
    }
}

/// Provider records keyed by name, iterated in the order the backend
/// returned them.
///
/// A repeated name replaces the earlier record but keeps its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderTable {
    records: Vec<ProviderHealthRecord>,
    index: HashMap<String, usize>,
}

impl ProviderTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from a backend provider list.
    pub fn from_providers(providers: &[Provider]) -> Self {
        providers.iter().map(ProviderHealthRecord::from).collect()
    }

    fn insert(&mut self, record: ProviderHealthRecord) {
        match self.index.get(&record.name) {
            Some(&pos) => self.records[pos] = record,
            None => {
                self.index.insert(record.name.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&ProviderHealthRecord> {
        self.index.get(name).map(|&pos| &self.records[pos])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, ProviderHealthRecord> {
        self.records.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.name.as_str())
    }

    /// Number of records with the given status.
    pub fn count_status(&self, status: HealthStatus) -> usize {
        self.records.iter().filter(|r| r.status == status).count()
    }
}

impl FromIterator<ProviderHealthRecord> for ProviderTable {
    fn from_iter<I: IntoIterator<Item = ProviderHealthRecord>>(iter: I) -> Self {
        let mut table = ProviderTable::new();
        for record in iter {
            table.insert(record);
        }
        table
    }
}

impl<'a> IntoIterator for &'a ProviderTable {
    type Item = &'a ProviderHealthRecord;
    type IntoIter = std::slice::Iter<'a, ProviderHealthRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for ProviderTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.records.iter())
    }
}

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// User-facing message raised by the poller.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// What happened to a successful fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The response replaced the table
    Applied(std::sync::Arc<ProviderTable>),
    /// A newer fetch was already applied, or the session ended first
    Discarded,
}

impl FetchOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, FetchOutcome::Applied(_))
    }
}
