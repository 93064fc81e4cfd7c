//! # CareNet Types
//!
//! Validated value types shared by every CareNet crate.
//!
//! Construction is the only place validation happens: once a [`NonEmptyText`] or a
//! [`Coordinate`] exists, downstream code can rely on its invariants without re-checking.
//! The hospital wire model ([`Hospital`], [`Department`], [`BedState`]) lives here too so the
//! REST server, the discovery client and the CLI all decode the same shape.

mod geo;
mod hospital;
mod text;

pub use geo::{Coordinate, CoordinateError};
pub use hospital::{BedState, BedStateError, BedStats, Department, Hospital};
pub use text::{NonEmptyText, TextError};
