//! Process-wide geo selection state.
//!
//! The store holds three values shared by every surface of the hospital finder:
//!
//! - `source`: where the user is (or searched for), written by the search box or geolocation
//! - `destination`: the hospital coordinate the user picked, written only by
//!   [`SelectionSync`](crate::sync::SelectionSync)
//! - `candidates`: the latest discovery result, written only by
//!   [`DiscoveryQuery`](crate::discovery::DiscoveryQuery)
//!
//! Replacing the candidates clears a destination that is no longer among them.
//!
//! Reads are synchronous snapshots. Writes replace the whole value and wake every
//! [`subscribe`](SelectionStore::subscribe)r; there is no partial-field patching.

use carenet_types::{Coordinate, Hospital};
use std::sync::Arc;
use tokio::sync::watch;

/// The user's position or search target.
///
/// Either half may be missing while the user is still typing or geolocation has not answered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceCoordinate {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    /// Transient: the map animates to this source once and then clears the flag.
    pub should_fly: bool,
    pub address: Option<String>,
}

impl SourceCoordinate {
    pub fn at(coordinate: Coordinate) -> Self {
        Self {
            lat: Some(coordinate.lat()),
            lng: Some(coordinate.lng()),
            should_fly: false,
            address: None,
        }
    }

    /// A source the map should fly to, as produced by an address search.
    pub fn fly_to(coordinate: Coordinate, address: Option<String>) -> Self {
        Self {
            should_fly: true,
            address,
            ..Self::at(coordinate)
        }
    }

    /// The complete coordinate, if both halves are present and valid.
    pub fn coordinate(&self) -> Option<Coordinate> {
        Coordinate::from_parts(self.lat, self.lng)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    pub source: SourceCoordinate,
    /// `None` is the cleared (`{null, null}`) destination.
    pub destination: Option<Coordinate>,
    pub candidates: Vec<Hospital>,
}

/// Shared handle to the selection state. Clones refer to the same state.
#[derive(Clone, Debug)]
pub struct SelectionStore {
    tx: Arc<watch::Sender<SelectionState>>,
}

impl Default for SelectionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SelectionState::default());
        Self { tx: Arc::new(tx) }
    }

    pub fn source(&self) -> SourceCoordinate {
        self.tx.borrow().source.clone()
    }

    pub fn set_source(&self, source: SourceCoordinate) {
        self.tx.send_if_modified(|state| {
            if state.source == source {
                return false;
            }
            state.source = source;
            true
        });
    }

    pub fn destination(&self) -> Option<Coordinate> {
        self.tx.borrow().destination
    }

    /// Replace the destination.
    ///
    /// Surfaces should go through [`SelectionSync`](crate::sync::SelectionSync), which only
    /// accepts members of the current candidate set.
    pub fn set_destination(&self, destination: Option<Coordinate>) {
        self.tx.send_if_modified(|state| {
            if state.destination == destination {
                return false;
            }
            state.destination = destination;
            true
        });
    }

    pub fn candidates(&self) -> Vec<Hospital> {
        self.tx.borrow().candidates.clone()
    }

    /// Whole-state snapshot, consistent across the three fields.
    pub fn snapshot(&self) -> SelectionState {
        self.tx.borrow().clone()
    }

    /// Receiver that always observes the latest state.
    pub fn subscribe(&self) -> watch::Receiver<SelectionState> {
        self.tx.subscribe()
    }

    /// Install a new candidate set.
    ///
    /// A destination that no longer matches any candidate location is cleared in the same write,
    /// so subscribers never see a selection the list cannot show.
    pub(crate) fn replace_candidates(&self, candidates: Vec<Hospital>) {
        self.tx.send_modify(|state| {
            if let Some(destination) = state.destination {
                if !candidates.iter().any(|h| h.location == destination) {
                    state.destination = None;
                }
            }
            state.candidates = candidates;
        });
    }
}
