//! Constants used throughout the CareNet core crate.
//!
//! Route paths, endpoint paths and configuration defaults live here so the guard, the
//! discovery client and the binaries agree on them.

/// Where unauthenticated users (and identities with no usable home) are sent.
pub const LOGIN_PATH: &str = "/auth/login";

/// Landing page for patients.
pub const PATIENT_HOME_PATH: &str = "/user/appointments";

/// Landing page for system administrators.
pub const ADMIN_HOME_PATH: &str = "/admin";

/// Path of the nearby-hospital discovery endpoint.
pub const NEARBY_ENDPOINT_PATH: &str = "/api/getNearby";

/// Path of the access decision endpoint.
pub const ACCESS_DECIDE_PATH: &str = "/api/access/decide";

/// Default REST listen address.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";

/// Default discovery endpoint used by clients when nothing is configured.
pub const DEFAULT_DISCOVERY_URL: &str = "http://127.0.0.1:3000/api/getNearby";

/// Default timeout for a single discovery request.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Default hospital directory file served by the REST API.
pub const DEFAULT_HOSPITAL_DIRECTORY_FILE: &str = "hospitals.yaml";

/// Default search radius for nearby hospitals.
pub const DEFAULT_NEARBY_RADIUS_KM: f64 = 25.0;

/// Default cap on the number of hospitals returned per nearby search.
pub const DEFAULT_NEARBY_LIMIT: usize = 20;
