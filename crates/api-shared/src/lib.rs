//! # API Shared
//!
//! Request and response bodies shared by the CareNet REST server and its clients.
//!
//! Contains:
//! - Wire types (`wire` module) with OpenAPI schemas
//! - Shared services like `HealthService`
//!
//! Used by `carenet-core` (discovery client), `api-rest` and the CLI.

pub mod health;
pub mod wire;

pub use health::HealthService;
pub use wire::*;
