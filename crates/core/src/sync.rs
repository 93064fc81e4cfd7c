//! Keeps the hospital list, the map marker and the destination in step.
//!
//! The list asks [`SelectionSync::is_selected`] for each row, the map asks
//! [`SelectionSync::map_center`] and [`SelectionSync::take_fly_target`], and a click on either
//! goes through [`SelectionSync::select`]. All of them read the same [`SelectionStore`].
//!
//! Selection is matched by coordinate, not by id: a hospital is selected when its location is
//! exactly equal to the destination. Two candidates at the same coordinates are therefore both
//! reported as selected.

use crate::selection::{SelectionStore, SourceCoordinate};
use carenet_types::{Coordinate, Hospital};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SelectionError {
    #[error("hospital {0} is not in the current candidate set")]
    NotACandidate(String),
}

#[derive(Clone, Debug)]
pub struct SelectionSync {
    store: SelectionStore,
}

impl SelectionSync {
    pub fn new(store: SelectionStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &SelectionStore {
        &self.store
    }

    /// `true` when the destination equals `hospital.location` on both fields.
    pub fn is_selected(&self, hospital: &Hospital) -> bool {
        self.store.destination() == Some(hospital.location)
    }

    /// Make `hospital` the destination.
    ///
    /// Only members of the current candidate set (same id and location) are accepted. Source and
    /// candidates are never modified.
    pub fn select(&self, hospital: &Hospital) -> Result<Coordinate, SelectionError> {
        let is_candidate = self
            .store
            .candidates()
            .iter()
            .any(|c| c.id == hospital.id && c.location == hospital.location);
        if !is_candidate {
            return Err(SelectionError::NotACandidate(hospital.id.to_string()));
        }

        tracing::debug!(hospital = %hospital.id, location = %hospital.location, "destination selected");
        self.store.set_destination(Some(hospital.location));
        Ok(hospital.location)
    }

    pub fn clear_selection(&self) {
        self.store.set_destination(None);
    }

    /// Every candidate currently matching the destination.
    pub fn selected_hospitals(&self) -> Vec<Hospital> {
        let state = self.store.snapshot();
        match state.destination {
            Some(destination) => state
                .candidates
                .into_iter()
                .filter(|h| h.location == destination)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Where the map should be centred: the destination, else the source.
    pub fn map_center(&self) -> Option<Coordinate> {
        let state = self.store.snapshot();
        state.destination.or_else(|| state.source.coordinate())
    }

    /// Consume the one-shot fly request on the source.
    ///
    /// Returns the coordinate to animate to and writes the source back with `should_fly`
    /// cleared, so a second call returns `None`.
    pub fn take_fly_target(&self) -> Option<Coordinate> {
        let source = self.store.source();
        if !source.should_fly {
            return None;
        }
        let target = source.coordinate();
        self.store.set_source(SourceCoordinate {
            should_fly: false,
            ..source
        });
        target
    }
}
