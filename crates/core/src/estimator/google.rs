//! Google Maps Routes API backend.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::RoutesConfig;

use super::{DurationEstimator, EstimateError};

/// Only the route duration is requested from the API.
const FIELD_MASK: &str = "routes.duration";

/// Duration estimator backed by the Google Maps Routes API.
pub struct GoogleRoutesClient {
    client: Client,
    config: RoutesConfig,
}

impl GoogleRoutesClient {
    /// Create a new client from the routes configuration.
    pub fn new(config: RoutesConfig) -> Result<Self, EstimateError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| EstimateError::Http(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn compute_routes_url(&self) -> String {
        format!(
            "{}/directions/v2:computeRoutes",
            self.config.api_base.trim_end_matches('/')
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ComputeRoutesRequest<'a> {
    origin: Waypoint<'a>,
    destination: Waypoint<'a>,
    travel_mode: &'a str,
}

#[derive(Debug, Serialize)]
struct Waypoint<'a> {
    address: &'a str,
}

#[derive(Debug, Deserialize)]
struct ComputeRoutesResponse {
    #[serde(default)]
    routes: Vec<RouteEntry>,
}

#[derive(Debug, Deserialize)]
struct RouteEntry {
    #[serde(default)]
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorResponse {
    error: GoogleErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorDetail {
    message: String,
}

/// Parse a protobuf JSON duration such as `"1234s"` or `"1234.5s"` into whole seconds.
fn parse_duration_seconds(raw: &str) -> Option<i64> {
    let number = raw.trim().strip_suffix('s')?;
    let whole = number.split('.').next()?;
    whole.parse().ok()
}

#[async_trait]
impl DurationEstimator for GoogleRoutesClient {
    fn name(&self) -> &str {
        "google_routes"
    }

    async fn estimate_duration(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<i64, EstimateError> {
        let request = ComputeRoutesRequest {
            origin: Waypoint { address: origin },
            destination: Waypoint {
                address: destination,
            },
            travel_mode: &self.config.travel_mode,
        };

        debug!(origin, destination, "Requesting route duration");

        let response = self
            .client
            .post(self.compute_routes_url())
            .header("X-Goog-Api-Key", &self.config.api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EstimateError::Timeout
                } else {
                    EstimateError::Http(e.to_string())
                }
            })?;

        let status = response.status().as_u16();

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GoogleErrorResponse>(&error_text)
                .map(|e| e.error.message)
                .unwrap_or(error_text);
            return Err(EstimateError::Api { status, message });
        }

        let body: ComputeRoutesResponse = response
            .json()
            .await
            .map_err(|e| EstimateError::Parse(e.to_string()))?;

        let route = body.routes.first().ok_or(EstimateError::NoRoutes)?;
        let seconds = route
            .duration
            .as_deref()
            .and_then(parse_duration_seconds)
            .ok_or(EstimateError::DurationUnavailable)?;

        info!(
            "Estimated duration in traffic for route {} - {} is: {} seconds",
            origin, destination, seconds
        );

        Ok(seconds)
    }
}
