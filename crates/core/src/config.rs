//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into services. Request
//! handlers and the discovery flow never read environment variables themselves, which keeps
//! behaviour consistent across threads and test harnesses.
//!
//! Each setting has a pure `*_from_env_value` parser taking the raw `Option<String>`, so the
//! parsing rules are testable without mutating the process environment.

use crate::constants::{
    DEFAULT_DISCOVERY_URL, DEFAULT_HOSPITAL_DIRECTORY_FILE, DEFAULT_NEARBY_LIMIT,
    DEFAULT_NEARBY_RADIUS_KM, DEFAULT_REQUEST_TIMEOUT_SECS,
};
use crate::{CoreError, CoreResult};
use reqwest::Url;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    discovery_url: Url,
    request_timeout: Duration,
    directory_file: PathBuf,
    nearby_radius_km: f64,
    nearby_limit: usize,
}

impl CoreConfig {
    pub fn new(
        discovery_url: Url,
        request_timeout: Duration,
        directory_file: PathBuf,
        nearby_radius_km: f64,
        nearby_limit: usize,
    ) -> CoreResult<Self> {
        if request_timeout.is_zero() {
            return Err(CoreError::InvalidConfig(
                "request timeout must be greater than zero".into(),
            ));
        }
        if !nearby_radius_km.is_finite() || nearby_radius_km <= 0.0 {
            return Err(CoreError::InvalidConfig(
                "nearby radius must be a positive number of kilometres".into(),
            ));
        }
        if nearby_limit == 0 {
            return Err(CoreError::InvalidConfig(
                "nearby limit must be at least 1".into(),
            ));
        }

        Ok(Self {
            discovery_url,
            request_timeout,
            directory_file,
            nearby_radius_km,
            nearby_limit,
        })
    }

    /// Resolve every setting from the process environment.
    ///
    /// Call this once from `main`, after `dotenvy::dotenv()`.
    pub fn from_env() -> CoreResult<Self> {
        let var = |name: &str| std::env::var(name).ok();

        Self::new(
            discovery_url_from_env_value(var("CARENET_DISCOVERY_URL"))?,
            request_timeout_from_env_value(var("CARENET_REQUEST_TIMEOUT_SECS"))?,
            var("HOSPITAL_DIRECTORY_FILE")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_HOSPITAL_DIRECTORY_FILE)),
            nearby_radius_from_env_value(var("NEARBY_RADIUS_KM"))?,
            nearby_limit_from_env_value(var("NEARBY_LIMIT"))?,
        )
    }

    pub fn discovery_url(&self) -> &Url {
        &self.discovery_url
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn directory_file(&self) -> &Path {
        &self.directory_file
    }

    pub fn nearby_radius_km(&self) -> f64 {
        self.nearby_radius_km
    }

    pub fn nearby_limit(&self) -> usize {
        self.nearby_limit
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse the discovery endpoint URL. Only `http` and `https` are accepted.
pub fn discovery_url_from_env_value(value: Option<String>) -> CoreResult<Url> {
    let raw = non_blank(value).unwrap_or_else(|| DEFAULT_DISCOVERY_URL.to_string());
    let url = Url::parse(&raw)
        .map_err(|e| CoreError::InvalidConfig(format!("discovery URL {raw:?}: {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(CoreError::InvalidConfig(format!(
            "discovery URL scheme must be http or https, got {other}"
        ))),
    }
}

/// Parse the discovery request timeout in whole seconds.
pub fn request_timeout_from_env_value(value: Option<String>) -> CoreResult<Duration> {
    let secs = match non_blank(value) {
        Some(v) => v
            .parse::<u64>()
            .map_err(|_| CoreError::InvalidConfig(format!("request timeout {v:?} is not a number")))?,
        None => DEFAULT_REQUEST_TIMEOUT_SECS,
    };
    Ok(Duration::from_secs(secs))
}

pub fn nearby_radius_from_env_value(value: Option<String>) -> CoreResult<f64> {
    match non_blank(value) {
        Some(v) => v
            .parse::<f64>()
            .map_err(|_| CoreError::InvalidConfig(format!("nearby radius {v:?} is not a number"))),
        None => Ok(DEFAULT_NEARBY_RADIUS_KM),
    }
}

pub fn nearby_limit_from_env_value(value: Option<String>) -> CoreResult<usize> {
    match non_blank(value) {
        Some(v) => v
            .parse::<usize>()
            .map_err(|_| CoreError::InvalidConfig(format!("nearby limit {v:?} is not a number"))),
        None => Ok(DEFAULT_NEARBY_LIMIT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_fall_back_to_defaults() {
        assert_eq!(
            discovery_url_from_env_value(Some("   ".into()))
                .unwrap()
                .as_str(),
            DEFAULT_DISCOVERY_URL
        );
        assert_eq!(
            request_timeout_from_env_value(None).unwrap(),
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
        );
        assert_eq!(nearby_radius_from_env_value(None).unwrap(), DEFAULT_NEARBY_RADIUS_KM);
        assert_eq!(nearby_limit_from_env_value(Some("".into())).unwrap(), DEFAULT_NEARBY_LIMIT);
    }

    #[test]
    fn rejects_non_http_discovery_url() {
        let err = discovery_url_from_env_value(Some("ftp://example.com/api/getNearby".into()))
            .expect_err("ftp is not allowed");
        assert!(matches!(err, CoreError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_garbage_numbers() {
        assert!(request_timeout_from_env_value(Some("soon".into())).is_err());
        assert!(nearby_radius_from_env_value(Some("far".into())).is_err());
        assert!(nearby_limit_from_env_value(Some("-3".into())).is_err());
    }

    #[test]
    fn new_validates_ranges() {
        let url = discovery_url_from_env_value(None).unwrap();
        let dir = PathBuf::from("hospitals.yaml");

        assert!(CoreConfig::new(url.clone(), Duration::ZERO, dir.clone(), 25.0, 20).is_err());
        assert!(
            CoreConfig::new(url.clone(), Duration::from_secs(5), dir.clone(), -1.0, 20).is_err()
        );
        assert!(CoreConfig::new(url.clone(), Duration::from_secs(5), dir.clone(), 25.0, 0).is_err());

        let cfg = CoreConfig::new(url, Duration::from_secs(5), dir, 12.5, 3).expect("valid config");
        assert_eq!(cfg.nearby_radius_km(), 12.5);
        assert_eq!(cfg.nearby_limit(), 3);
    }
}
