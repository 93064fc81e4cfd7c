//! # CareNet Core
//!
//! Decision and state logic for the CareNet hospital-network dashboard.
//!
//! This crate contains:
//! - Tier-based route authorization ([`access`]): which section a user may view and where to
//!   send them otherwise
//! - The shared geo selection state ([`selection`]) read and written by the list, map and
//!   search surfaces
//! - Nearby-hospital discovery ([`discovery`], [`transport`]) with stale-response superseding
//! - Selection synchronisation ([`sync`]) between the list, the map and the destination
//! - The YAML hospital directory ([`directory`]) that serves proximity searches
//!
//! **No API concerns**: HTTP routing and CLI parsing belong in `api-rest` and `carenet-cli`.

pub mod access;
pub mod config;
pub mod constants;
pub mod directory;
pub mod discovery;
pub mod error;
pub mod identity;
pub mod selection;
pub mod sync;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_support;

pub use access::{decide, home_path_for, Action, Navigator, RouteGuard};
pub use config::CoreConfig;
pub use constants::*;
pub use directory::HospitalDirectory;
pub use discovery::{DiscoveryError, DiscoveryQuery, NearbyTransport, QueryStatus};
pub use error::{CoreError, CoreResult};
pub use identity::{IdentityError, Resolution, Section, Tier, UserIdentity};
pub use selection::{SelectionState, SelectionStore, SourceCoordinate};
pub use sync::{SelectionError, SelectionSync};
pub use transport::HttpNearbyTransport;

// Shared value types, re-exported so callers need a single dependency.
pub use carenet_types::{
    BedState, BedStats, Coordinate, CoordinateError, Department, Hospital, NonEmptyText,
};
