//! Hospital, department and bed model as returned by the nearby-hospital endpoint.

use crate::{Coordinate, NonEmptyText};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
#[error("bed state must be 0 (free) or 1 (occupied), got {0}")]
pub struct BedStateError(u8);

/// Occupancy of a single bed. Encoded on the wire as `0` (free) or `1` (occupied).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum BedState {
    Free,
    Occupied,
}

impl TryFrom<u8> for BedState {
    type Error = BedStateError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(BedState::Free),
            1 => Ok(BedState::Occupied),
            other => Err(BedStateError(other)),
        }
    }
}

impl From<BedState> for u8 {
    fn from(state: BedState) -> Self {
        match state {
            BedState::Free => 0,
            BedState::Occupied => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    #[serde(alias = "_id")]
    pub id: NonEmptyText,
    pub name: String,
    #[serde(default)]
    pub beds: Vec<BedState>,
}

/// A candidate hospital.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hospital {
    #[serde(alias = "_id")]
    pub id: NonEmptyText,
    pub name: NonEmptyText,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    pub location: Coordinate,
    #[serde(default)]
    pub departments: Vec<Department>,
}

/// Bed totals across every department of a hospital.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BedStats {
    pub total_beds: usize,
    pub available_beds: usize,
}

impl Hospital {
    /// Reduces the department bed lists on every call; the result is never stored.
    pub fn bed_stats(&self) -> BedStats {
        self.departments
            .iter()
            .fold(BedStats::default(), |acc, department| BedStats {
                total_beds: acc.total_beds + department.beds.len(),
                available_beds: acc.available_beds
                    + department
                        .beds
                        .iter()
                        .filter(|bed| **bed == BedState::Free)
                        .count(),
            })
    }
}
