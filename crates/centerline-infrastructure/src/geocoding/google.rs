//! Google Geocoding API client

use std::num::NonZeroU32;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use centerline_core::domain::{Address, GeoPoint};
use centerline_core::repositories::{GeocodeResult, Geocoder};

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeCandidate>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeCandidate {
    geometry: Geometry,
    place_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

/// Rate-limited geocoder. Calls are spaced at least `min_interval` apart
/// regardless of how many tasks share the client.
pub struct GoogleGeocoder {
    client: Client,
    base_url: String,
    api_key: String,
    limiter: DefaultDirectRateLimiter,
}

impl GoogleGeocoder {
    pub fn new(api_key: String, base_url: String, min_interval: Duration, timeout: Duration) -> Self {
        let quota = Quota::with_period(min_interval)
            .unwrap_or_else(|| Quota::per_second(NonZeroU32::MIN));

        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url,
            api_key,
            limiter: RateLimiter::direct(quota),
        }
    }

    async fn lookup(&self, address: &str) -> Result<Option<GeocodeResult>> {
        let url = Url::parse_with_params(
            &self.base_url,
            &[("address", address), ("key", self.api_key.as_str())],
        )
        .context("Invalid geocoding base URL")?;

        self.limiter.until_ready().await;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to connect to geocoding service")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Geocoding API error ({}): {}", status, body);
        }

        let body: GeocodeResponse = response
            .json()
            .await
            .context("Failed to parse geocoding response")?;

        match body.status.as_str() {
            "OK" => {}
            "ZERO_RESULTS" => return Ok(None),
            other => anyhow::bail!(
                "Geocoding status {}: {}",
                other,
                body.error_message.unwrap_or_default()
            ),
        }

        Ok(body.results.into_iter().next().map(|candidate| GeocodeResult {
            location: GeoPoint {
                latitude: candidate.geometry.location.lat,
                longitude: candidate.geometry.location.lng,
            },
            place_id: candidate.place_id,
        }))
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn geocode(&self, address: &Address) -> Option<GeocodeResult> {
        let query = address.one_line();
        if query.is_empty() {
            return None;
        }

        match self.lookup(&query).await {
            Ok(Some(result)) => {
                debug!("Geocoded '{}'", query);
                Some(result)
            }
            Ok(None) => {
                warn!("No geocoding result for '{}'", query);
                None
            }
            Err(e) => {
                warn!("Geocoding failed for '{}': {:#}", query, e);
                None
            }
        }
    }
}
