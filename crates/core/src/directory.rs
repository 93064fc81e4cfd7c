//! Hospital directory backing the `/api/getNearby` endpoint.
//!
//! The directory is a YAML file loaded once at startup:
//!
//! ```yaml
//! hospitals:
//!   - id: aiims-delhi
//!     name: AIIMS New Delhi
//!     address: Ansari Nagar
//!     phone: 011-26588500
//!     location: { lat: 28.5672, lng: 77.2100 }
//!     departments:
//!       - id: aiims-icu
//!         name: ICU
//!         beds: [0, 1, 1, 0]
//! ```
//!
//! Searches are linear scans with a haversine distance; the directory covers a hospital network,
//! not a national registry.

use crate::{CoreError, CoreResult};
use carenet_types::{Coordinate, Hospital};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

#[derive(Deserialize)]
struct DirectoryFile {
    #[serde(default)]
    hospitals: Vec<Hospital>,
}

#[derive(Clone, Debug, Default)]
pub struct HospitalDirectory {
    hospitals: Vec<Hospital>,
}

impl HospitalDirectory {
    /// Build a directory, rejecting duplicate hospital ids.
    pub fn new(hospitals: Vec<Hospital>) -> CoreResult<Self> {
        let mut seen = HashSet::new();
        for hospital in &hospitals {
            if !seen.insert(hospital.id.as_str()) {
                return Err(CoreError::DuplicateHospital(hospital.id.to_string()));
            }
        }
        Ok(Self { hospitals })
    }

    pub fn parse(yaml: &str) -> CoreResult<Self> {
        let file: DirectoryFile =
            serde_yaml::from_str(yaml).map_err(CoreError::DirectoryDeserialization)?;
        Self::new(file.hospitals)
    }

    pub fn load(path: &Path) -> CoreResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(CoreError::DirectoryRead)?;
        let directory = Self::parse(&contents)?;
        tracing::info!(
            "loaded {} hospitals from {}",
            directory.len(),
            path.display()
        );
        Ok(directory)
    }

    pub fn len(&self) -> usize {
        self.hospitals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hospitals.is_empty()
    }

    pub fn hospitals(&self) -> &[Hospital] {
        &self.hospitals
    }

    pub fn get(&self, id: &str) -> Option<&Hospital> {
        self.hospitals.iter().find(|h| h.id.as_str() == id)
    }

    /// Hospitals within `radius_km` of `at`, nearest first, at most `limit` of them.
    ///
    /// Equal distances are ordered by id so results are stable.
    pub fn nearby(&self, at: Coordinate, radius_km: f64, limit: usize) -> Vec<Hospital> {
        let mut in_range: Vec<(f64, &Hospital)> = self
            .hospitals
            .iter()
            .map(|h| (at.distance_km(&h.location), h))
            .filter(|(distance, _)| *distance <= radius_km)
            .collect();

        in_range.sort_by(|(da, ha), (db, hb)| {
            da.total_cmp(db)
                .then_with(|| ha.id.as_str().cmp(hb.id.as_str()))
        });

        in_range
            .into_iter()
            .take(limit)
            .map(|(_, h)| h.clone())
            .collect()
    }
}
