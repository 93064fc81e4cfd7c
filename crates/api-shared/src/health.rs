use crate::wire::HealthRes;

/// Health check served at `/health`.
pub struct HealthService;

impl HealthService {
    /// Reports the service as alive.
    ///
    /// There are no downstream dependencies to probe: the hospital directory is loaded once at
    /// startup and the server refuses to start without it.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "CareNet is alive".into(),
        }
    }
}
