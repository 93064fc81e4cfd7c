//! HTTP transport for the nearby-hospital endpoint.

use crate::config::CoreConfig;
use crate::discovery::{DiscoveryError, NearbyTransport};
use crate::{CoreError, CoreResult};
use api_shared::{NearbyReq, NearbyRes};
use carenet_types::{Coordinate, Hospital};
use reqwest::Url;
use std::time::Duration;

/// Calls `POST /api/getNearby` with `{lat, long}` and decodes `{hospitals}`.
#[derive(Clone, Debug)]
pub struct HttpNearbyTransport {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpNearbyTransport {
    pub fn new(endpoint: Url, request_timeout: Duration) -> CoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(CoreError::HttpClient)?;

        Ok(Self { client, endpoint })
    }

    pub fn from_config(cfg: &CoreConfig) -> CoreResult<Self> {
        Self::new(cfg.discovery_url().clone(), cfg.request_timeout())
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl NearbyTransport for HttpNearbyTransport {
    async fn fetch_nearby(&self, at: Coordinate) -> Result<Vec<Hospital>, DiscoveryError> {
        let body = NearbyReq {
            lat: at.lat(),
            long: at.lng(),
        };

        let resp = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| DiscoveryError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DiscoveryError::Http(status.as_u16()));
        }

        let parsed: NearbyRes = resp
            .json()
            .await
            .map_err(|e| DiscoveryError::Decode(e.to_string()))?;

        Ok(parsed.hospitals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::{DiscoveryQuery, QueryStatus};
    use crate::selection::{SelectionStore, SourceCoordinate};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn hospital_json(id: &str, lat: f64, lng: f64) -> serde_json::Value {
        json!({
            "_id": id,
            "name": format!("Hospital {id}"),
            "address": "Ring Road",
            "phone": "011-0000",
            "location": {"lat": lat, "lng": lng},
            "departments": [{"_id": format!("{id}-er"), "name": "Emergency", "beds": [0, 1]}]
        })
    }

    async fn transport_for(server: &MockServer) -> HttpNearbyTransport {
        let endpoint = Url::parse(&format!("{}/api/getNearby", server.uri())).unwrap();
        HttpNearbyTransport::new(endpoint, Duration::from_secs(5)).expect("client builds")
    }

    #[tokio::test]
    async fn three_hospitals_near_delhi() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/getNearby"))
            .and(body_json(json!({"lat": 28.70, "long": 77.10})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "hospitals": [
                    hospital_json("h1", 28.71, 77.11),
                    hospital_json("h2", 28.69, 77.12),
                    hospital_json("h3", 28.72, 77.08),
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let query = DiscoveryQuery::new(transport_for(&server).await, SelectionStore::new());
        let source = SourceCoordinate::at(Coordinate::new(28.70, 77.10).unwrap());

        let status = query.query(Some(&source)).await;

        assert!(matches!(status, QueryStatus::Success(ref h) if h.len() == 3));
        assert_eq!(query.store().candidates().len(), 3);
        assert_eq!(query.store().candidates()[0].bed_stats().available_beds, 1);
    }

    #[tokio::test]
    async fn non_success_status_becomes_http_error_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/getNearby"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let query = DiscoveryQuery::new(transport_for(&server).await, SelectionStore::new());
        let source = SourceCoordinate::at(Coordinate::new(28.70, 77.10).unwrap());

        assert_eq!(
            query.query(Some(&source)).await,
            QueryStatus::Error("HTTP error! status: 503".into())
        );
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let transport = transport_for(&server).await;
        let err = transport
            .fetch_nearby(Coordinate::new(1.0, 1.0).unwrap())
            .await
            .expect_err("html is not a nearby response");

        assert!(matches!(err, DiscoveryError::Decode(_)));
    }
}
