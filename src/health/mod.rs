//! Provider health polling.
//!
//! [`HealthPoller`] keeps a snapshot of every provider's latest health as
//! reported by the backend, refreshes it on a fixed interval while a session
//! is active, and can ask the backend to probe a provider before refreshing.

mod config;
pub mod derive;
mod state;


pub use config::*;
pub use derive::best_provider;
pub use state::*;

use crate::client::{ApiClient, ClientError};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

const NOTIFICATION_CAPACITY: usize = 64;

/// Background service that keeps the provider health table current.
pub struct HealthPoller {
    client: ApiClient,
    config: PollerConfig,
    /// Latest applied table; receivers get read-only snapshots
    table: watch::Sender<Arc<ProviderTable>>,
    notifications: broadcast::Sender<Notification>,
    /// Sequence number of the most recently issued fetch
    issued: AtomicU64,
    /// Sequence number of the fetch currently shown in `table`
    applied: AtomicU64,
    in_flight: AtomicUsize,
    /// Cancelled when the consuming session ends
    session: CancellationToken,
}

impl HealthPoller {
    /// Create a poller with an empty table and an active session.
    pub fn new(client: ApiClient, config: PollerConfig) -> Self {
        let (table, _) = watch::channel(Arc::new(ProviderTable::new()));
        let (notifications, _) = broadcast::channel(NOTIFICATION_CAPACITY);

        Self {
            client,
            config,
            table,
            notifications,
            issued: AtomicU64::new(0),
            applied: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
            session: CancellationToken::new(),
        }
    }

    /// Tie the poller's session to an externally owned token.
    pub fn with_session(mut self, session: CancellationToken) -> Self {
        self.session = session;
        self
    }

    /// Current table.
    pub fn snapshot(&self) -> Arc<ProviderTable> {
        self.table.borrow().clone()
    }

    /// Watch table replacements.
    pub fn subscribe(&self) -> watch::Receiver<Arc<ProviderTable>> {
        self.table.subscribe()
    }

    /// Receive user-facing notifications raised from now on.
    pub fn notifications(&self) -> broadcast::Receiver<Notification> {
        self.notifications.subscribe()
    }

    /// Whether any fetch or trigger is awaiting the backend.
    pub fn is_refreshing(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub fn is_active(&self) -> bool {
        !self.session.is_cancelled()
    }

    /// End the session. In-flight requests still complete but their
    /// results are no longer applied.
    pub fn shutdown(&self) {
        self.session.cancel();
    }

    /// Fetch all providers and replace the table.
    ///
    /// On failure the table is left as it was and an error notification is
    /// raised with the backend's message.
    pub async fn fetch_providers(&self) -> Result<FetchOutcome, ClientError> {
        let _guard = InFlight::enter(&self.in_flight);
        let result = self.refresh().await;
        if let Err(e) = &result {
            self.notify(Notification::error(e.to_string()));
        }
        result
    }

    /// Optionally probe one provider, then refresh the whole table.
    ///
    /// The probe request resolves before the list fetch is issued. A failure
    /// in either step ends the sequence with a single error notification;
    /// a failed probe means no fetch is sent.
    pub async fn trigger_health_check(
        &self,
        provider_id: Option<i64>,
    ) -> Result<FetchOutcome, ClientError> {
        let _guard = InFlight::enter(&self.in_flight);

        let result = async {
            if let Some(id) = provider_id {
                tracing::debug!(provider_id = id, "Requesting provider probe");
                self.client.trigger_check(id).await?;
            }
            self.refresh().await
        }
        .await;

        match &result {
            Ok(_) => self.notify(Notification::success("Health check updated")),
            Err(e) => {
                tracing::debug!(provider_id = ?provider_id, "Health check failed");
                self.notify(Notification::error(e.to_string()));
            }
        }
        result
    }

    async fn refresh(&self) -> Result<FetchOutcome, ClientError> {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let providers = self.client.list_providers().await?;
        let table = ProviderTable::from_providers(&providers);

        tracing::debug!(seq, providers = table.len(), "Fetched providers");
        Ok(self.apply(seq, table))
    }

    /// Replace the table unless the session ended or a newer fetch already
    /// landed.
    fn apply(&self, seq: u64, table: ProviderTable) -> FetchOutcome {
        let table = Arc::new(table);
        let session = &self.session;
        let applied = &self.applied;

        // The closure runs under the channel's write lock, so the sequence
        // check and the replacement are a single step.
        let replaced = self.table.send_if_modified(|current| {
            if session.is_cancelled() || seq <= applied.load(Ordering::SeqCst) {
                return false;
            }
            *current = Arc::clone(&table);
            applied.store(seq, Ordering::SeqCst);
            true
        });

        if replaced {
            FetchOutcome::Applied(table)
        } else {
            tracing::debug!(
                seq,
                applied = self.applied.load(Ordering::SeqCst),
                active = self.is_active(),
                "Discarding stale provider response"
            );
            FetchOutcome::Discarded
        }
    }

    fn notify(&self, notification: Notification) {
        if !self.is_active() {
            return;
        }
        tracing::debug!(
            kind = ?notification.level,
            notification = %notification.message,
            "Poller notification"
        );
        // Ignore error if no receivers are listening
        let _ = self.notifications.send(notification);
    }

    /// Start periodic refresh: one tick immediately, then one every
    /// `interval_seconds` (at least one second) until the session ends.
    ///
    /// Each tick runs as its own task, so a slow backend does not delay or
    /// skip later ticks.
    pub fn start(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            // A zero period would panic inside tokio
            let interval_seconds = self.config.interval_seconds.max(1);
            let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds));

            tracing::info!(
                interval_seconds,
                base_url = %self.client.base_url(),
                "Health poller started"
            );

            loop {
                tokio::select! {
                    _ = self.session.cancelled() => {
                        tracing::info!("Health poller shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        let poller = Arc::clone(&self);
                        tokio::spawn(async move {
                            // Failures are already surfaced as notifications
                            let _ = poller.trigger_health_check(None).await;
                        });
                    }
                }
            }
        })
    }
}

/// Counts a request as in flight for as long as it is held.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
