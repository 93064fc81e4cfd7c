//! JSON bodies for the CareNet HTTP surface.

use carenet_types::Hospital;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Body of `POST /api/getNearby`.
///
/// The longitude field is spelled `long` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NearbyReq {
    pub lat: f64,
    pub long: f64,
}

/// Successful response of `POST /api/getNearby`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NearbyRes {
    #[schema(value_type = Vec<Object>)]
    pub hospitals: Vec<Hospital>,
}

/// Identity resolution state as reported by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionState {
    Pending,
    Unauthenticated,
    Resolved,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserIdentityReq {
    pub id: String,
    pub tier: u8,
    #[serde(default)]
    pub hospital_id: Option<String>,
}

/// Body of `POST /api/access/decide`. `user` is required when `state` is `resolved`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DecideReq {
    pub state: ResolutionState,
    #[serde(default)]
    pub user: Option<UserIdentityReq>,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum DecideRes {
    Noop,
    Redirect { to: String },
}
