//! Nearby-hospital discovery.
//!
//! [`DiscoveryQuery`] turns the user's source coordinate into a candidate set. It is the only
//! asynchronous step of the hospital finder and it suspends only inside the
//! [`NearbyTransport`].
//!
//! ## Superseding
//! Every issued request takes the next value of a monotonically increasing sequence number and
//! is keyed by its coordinate pair. When a response arrives it is applied only if its
//! `(key, sequence)` ticket is still the latest one issued. Completion order does not matter:
//! a slow response for a coordinate the user has since moved away from is dropped, even when it
//! lands after the newer response.
//!
//! ## Failure
//! Transport failures become [`QueryStatus::Error`]. The candidates already in the
//! [`SelectionStore`] are left as they were, and [`DiscoveryQuery::refetch`] retries the same
//! coordinate.

use crate::selection::{SelectionStore, SourceCoordinate};
use carenet_types::{Coordinate, Hospital};
use std::sync::{Mutex, MutexGuard};

/// Errors produced by a [`NearbyTransport`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DiscoveryError {
    /// The endpoint answered with a non-2xx status.
    #[error("HTTP error! status: {0}")]
    Http(u16),
    #[error("network error: {0}")]
    Network(String),
    #[error("failed to decode nearby response: {0}")]
    Decode(String),
}

/// Observable state of the discovery query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryStatus {
    /// Disabled: no complete source coordinate, nothing was sent.
    Idle,
    Loading,
    Success(Vec<Hospital>),
    Error(String),
}

/// Network boundary for nearby-hospital lookups.
#[async_trait::async_trait]
pub trait NearbyTransport: Send + Sync {
    async fn fetch_nearby(&self, at: Coordinate) -> Result<Vec<Hospital>, DiscoveryError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ticket {
    key: (u64, u64),
    seq: u64,
}

#[derive(Debug)]
struct QueryInner {
    next_seq: u64,
    latest: Option<Ticket>,
    last_source: Option<Coordinate>,
    status: QueryStatus,
}

/// Fetches candidates for a source coordinate and publishes them into the [`SelectionStore`].
pub struct DiscoveryQuery<T> {
    transport: T,
    store: SelectionStore,
    inner: Mutex<QueryInner>,
}

impl<T: NearbyTransport> DiscoveryQuery<T> {
    pub fn new(transport: T, store: SelectionStore) -> Self {
        Self {
            transport,
            store,
            inner: Mutex::new(QueryInner {
                next_seq: 0,
                latest: None,
                last_source: None,
                status: QueryStatus::Idle,
            }),
        }
    }

    pub fn status(&self) -> QueryStatus {
        self.lock().status.clone()
    }

    pub fn store(&self) -> &SelectionStore {
        &self.store
    }

    /// Run the query for `source`.
    ///
    /// Returns [`QueryStatus::Idle`] without touching the network when `source` is `None` or
    /// either half of it is missing. Otherwise returns the status after this request settled,
    /// which is the newer request's status if this one was superseded.
    pub async fn query(&self, source: Option<&SourceCoordinate>) -> QueryStatus {
        match source.and_then(SourceCoordinate::coordinate) {
            Some(at) => self.run(at).await,
            None => {
                let mut inner = self.lock();
                // Supersede anything in flight: its key is no longer the current one.
                inner.latest = None;
                inner.last_source = None;
                inner.status = QueryStatus::Idle;
                QueryStatus::Idle
            }
        }
    }

    /// Re-issue the last request with the same coordinate.
    pub async fn refetch(&self) -> QueryStatus {
        let last_source = self.lock().last_source;
        match last_source {
            Some(at) => self.run(at).await,
            None => QueryStatus::Idle,
        }
    }

    /// Reset to `Idle` and empty the candidate set.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.latest = None;
        inner.last_source = None;
        inner.status = QueryStatus::Idle;
        self.store.replace_candidates(Vec::new());
    }

    async fn run(&self, at: Coordinate) -> QueryStatus {
        let ticket = {
            let mut inner = self.lock();
            let ticket = Ticket {
                key: at.key(),
                seq: inner.next_seq,
            };
            inner.next_seq += 1;
            inner.latest = Some(ticket);
            inner.last_source = Some(at);
            inner.status = QueryStatus::Loading;
            ticket
        };
        tracing::debug!(source = %at, seq = ticket.seq, "discovery request issued");

        let result = self.transport.fetch_nearby(at).await;

        let mut inner = self.lock();
        if inner.latest != Some(ticket) {
            tracing::warn!(
                source = %at,
                seq = ticket.seq,
                "discarding superseded discovery response"
            );
            return inner.status.clone();
        }

        inner.status = match result {
            Ok(hospitals) => {
                tracing::debug!(source = %at, count = hospitals.len(), "discovery succeeded");
                self.store.replace_candidates(hospitals.clone());
                QueryStatus::Success(hospitals)
            }
            Err(e) => {
                tracing::warn!(source = %at, "discovery failed: {}", e);
                QueryStatus::Error(e.to_string())
            }
        };
        inner.status.clone()
    }

    fn lock(&self) -> MutexGuard<'_, QueryInner> {
        // The guarded data is plain bookkeeping that is valid after any panic.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
