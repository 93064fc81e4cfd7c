//! # API REST
//!
//! REST API implementation for CareNet.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON bodies, CORS, status codes)
//!
//! Uses `api-shared` for wire types and `carenet-core` for the decisions behind them.

#![warn(rust_2018_idioms)]

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{
    DecideReq, DecideRes, HealthRes, HealthService, NearbyReq, NearbyRes, ResolutionState,
    UserIdentityReq,
};
use carenet_core::{
    decide, Action, Coordinate, CoreConfig, HospitalDirectory, NonEmptyText, Resolution,
    UserIdentity, ACCESS_DECIDE_PATH, NEARBY_ENDPOINT_PATH,
};

/// Application state shared across REST API handlers.
///
/// The directory is loaded once at startup and never mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    directory: Arc<HospitalDirectory>,
    nearby_radius_km: f64,
    nearby_limit: usize,
}

impl AppState {
    pub fn new(directory: HospitalDirectory, cfg: &CoreConfig) -> Self {
        Self {
            directory: Arc::new(directory),
            nearby_radius_km: cfg.nearby_radius_km(),
            nearby_limit: cfg.nearby_limit(),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health, get_nearby, decide_access),
    components(schemas(
        HealthRes,
        NearbyReq,
        NearbyRes,
        DecideReq,
        DecideRes,
        ResolutionState,
        UserIdentityReq,
    ))
)]
pub struct ApiDoc;

/// Build the CareNet router with Swagger UI and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(NEARBY_ENDPOINT_PATH, post(get_nearby))
        .route(ACCESS_DECIDE_PATH, post(decide_access))
        .merge(
            SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/api/getNearby",
    request_body = NearbyReq,
    responses(
        (status = 200, description = "Hospitals near the coordinate, nearest first", body = NearbyRes),
        (status = 400, description = "Invalid coordinate")
    )
)]
/// Find hospitals near a coordinate
///
/// Searches the hospital directory within the configured radius and returns at most the
/// configured number of hospitals, nearest first.
///
/// # Errors
/// Returns `400 Bad Request` if `lat`/`long` are not finite, in-range degrees.
#[axum::debug_handler]
async fn get_nearby(
    State(state): State<AppState>,
    Json(req): Json<NearbyReq>,
) -> Result<Json<NearbyRes>, (StatusCode, &'static str)> {
    let at = match Coordinate::new(req.lat, req.long) {
        Ok(at) => at,
        Err(e) => {
            tracing::warn!("Rejected nearby search: {}", e);
            return Err((StatusCode::BAD_REQUEST, "Invalid coordinate"));
        }
    };

    let hospitals = state
        .directory
        .nearby(at, state.nearby_radius_km, state.nearby_limit);
    tracing::debug!(source = %at, count = hospitals.len(), "nearby search");

    Ok(Json(NearbyRes { hospitals }))
}

#[utoipa::path(
    post,
    path = "/api/access/decide",
    request_body = DecideReq,
    responses(
        (status = 200, description = "Guard decision for the path", body = DecideRes),
        (status = 400, description = "Bad request")
    )
)]
/// Evaluate the route guard
///
/// Returns whether a user in the given resolution state may stay on `path`, or where they
/// should be redirected.
///
/// # Errors
/// Returns `400 Bad Request` if `state` is `resolved` but `user` is missing, has a blank id or
/// hospital id, or is a doctor or hospital staff member without a hospital id.
#[axum::debug_handler]
async fn decide_access(
    State(_state): State<AppState>,
    Json(req): Json<DecideReq>,
) -> Result<Json<DecideRes>, (StatusCode, &'static str)> {
    let resolution = match resolution_from_req(req.state, req.user) {
        Ok(resolution) => resolution,
        Err(msg) => {
            tracing::warn!("Rejected access decision: {}", msg);
            return Err((StatusCode::BAD_REQUEST, msg));
        }
    };

    let res = match decide(&resolution, &req.path) {
        Action::NoOp => DecideRes::Noop,
        Action::RedirectTo(to) => DecideRes::Redirect { to },
    };
    Ok(Json(res))
}

fn resolution_from_req(
    state: ResolutionState,
    user: Option<UserIdentityReq>,
) -> Result<Resolution, &'static str> {
    match state {
        ResolutionState::Pending => Ok(Resolution::Pending),
        ResolutionState::Unauthenticated => Ok(Resolution::Unauthenticated),
        ResolutionState::Resolved => {
            let user = user.ok_or("user is required when state is resolved")?;
            let id = NonEmptyText::new(&user.id).map_err(|_| "user id cannot be empty")?;
            let hospital_id = user
                .hospital_id
                .map(NonEmptyText::new)
                .transpose()
                .map_err(|_| "hospital_id cannot be empty")?;
            let user = UserIdentity::new(id, user.tier, hospital_id)
                .map_err(|_| "hospital_id is required for doctors and hospital staff")?;
            Ok(Resolution::Resolved(user))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use carenet_core::config::discovery_url_from_env_value;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::path::PathBuf;
    use std::time::Duration;
    use tower::ServiceExt;

    const DIRECTORY: &str = r#"
hospitals:
  - id: aiims
    name: AIIMS New Delhi
    location: { lat: 28.5672, lng: 77.2100 }
  - id: safdarjung
    name: Safdarjung Hospital
    location: { lat: 28.5685, lng: 77.2066 }
  - id: rml
    name: Ram Manohar Lohia
    location: { lat: 28.6262, lng: 77.2008 }
  - id: kem
    name: KEM Mumbai
    location: { lat: 19.0025, lng: 72.8423 }
"#;

    fn app() -> Router {
        let cfg = CoreConfig::new(
            discovery_url_from_env_value(None).unwrap(),
            Duration::from_secs(5),
            PathBuf::from("hospitals.yaml"),
            25.0,
            20,
        )
        .unwrap();
        let directory = HospitalDirectory::parse(DIRECTORY).unwrap();
        router(AppState::new(directory, &cfg))
    }

    async fn post_json(uri: &str, body: Value) -> (StatusCode, Vec<u8>) {
        let response = app()
            .oneshot(
                Request::post(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn health_reports_alive() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let health: HealthRes = serde_json::from_slice(&bytes).unwrap();
        assert!(health.ok);
    }

    #[tokio::test]
    async fn nearby_returns_the_three_delhi_hospitals() {
        let (status, body) =
            post_json("/api/getNearby", json!({"lat": 28.70, "long": 77.10})).await;

        assert_eq!(status, StatusCode::OK);
        let res: NearbyRes = serde_json::from_slice(&body).unwrap();
        let ids: Vec<&str> = res.hospitals.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids.len(), 3);
        assert_eq!(ids[0], "rml");
        assert!(!ids.contains(&"kem"));
    }

    #[tokio::test]
    async fn nearby_rejects_out_of_range_coordinates() {
        let (status, _) = post_json("/api/getNearby", json!({"lat": 128.0, "long": 77.10})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn decide_redirects_doctor_off_admin() {
        let (status, body) = post_json(
            "/api/access/decide",
            json!({
                "state": "resolved",
                "user": {"id": "u-1", "tier": 1, "hospital_id": "H1"},
                "path": "/admin"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let res: DecideRes = serde_json::from_slice(&body).unwrap();
        assert_eq!(res, DecideRes::Redirect { to: "/doctor/H1".into() });
    }

    #[tokio::test]
    async fn decide_pending_is_noop() {
        let (_, body) =
            post_json("/api/access/decide", json!({"state": "pending", "path": "/admin"})).await;
        let res: DecideRes = serde_json::from_slice(&body).unwrap();
        assert_eq!(res, DecideRes::Noop);
    }

    #[tokio::test]
    async fn decide_rejects_doctor_without_hospital() {
        let (status, body) = post_json(
            "/api/access/decide",
            json!({
                "state": "resolved",
                "user": {"id": "u-1", "tier": 1},
                "path": "/auth/login"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            String::from_utf8(body).unwrap(),
            "hospital_id is required for doctors and hospital staff"
        );
    }

    #[tokio::test]
    async fn decide_rejects_blank_hospital_id() {
        let (status, body) = post_json(
            "/api/access/decide",
            json!({
                "state": "resolved",
                "user": {"id": "u-1", "tier": 2, "hospital_id": "  "},
                "path": "/hospital/u-1"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(String::from_utf8(body).unwrap(), "hospital_id cannot be empty");
    }

    #[tokio::test]
    async fn decide_requires_user_when_resolved() {
        let (status, _) =
            post_json("/api/access/decide", json!({"state": "resolved", "path": "/admin"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
