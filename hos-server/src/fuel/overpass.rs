//! Overpass API client for fuel station lookups.
//!
//! Queries OpenStreetMap for `amenity=fuel` nodes, ways and relations.
//! Ways and relations come back with a computed `center`, so every
//! element reduces to one coordinate.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::{BoundingBox, DEFAULT_STATION_NAME, FuelStation, GeoPoint};

use super::error::FuelSearchError;
use super::search::StationSearch;

/// Default Overpass interpreter endpoint.
const DEFAULT_BASE_URL: &str = "https://overpass-api.de/api/interpreter";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Server-side query timeout sent in the Overpass QL header.
const QUERY_TIMEOUT_SECS: u64 = 25;

/// Configuration for the Overpass client.
#[derive(Debug, Clone)]
pub struct OverpassConfig {
    /// Interpreter endpoint URL
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
}

impl OverpassConfig {
    /// Set a custom endpoint (for testing or a private instance).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }
}

/// Overpass API client.
///
/// Uses a semaphore to cap concurrent requests; public Overpass
/// instances rate-limit aggressively.
#[derive(Debug, Clone)]
pub struct OverpassClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl OverpassClient {
    /// Create a new client with the given configuration.
    pub fn new(config: OverpassConfig) -> Result<Self, FuelSearchError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("hos-server/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    async fn fetch(
        &self,
        bbox: BoundingBox,
        limit: usize,
    ) -> Result<Vec<FuelStation>, FuelSearchError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| FuelSearchError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let query = fuel_query(&bbox, limit);
        debug!(?bbox, limit, "querying Overpass for fuel stations");

        let response = self
            .http
            .post(&self.base_url)
            .form(&[("data", query)])
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FuelSearchError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FuelSearchError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        parse_response(&body)
    }
}

impl StationSearch for OverpassClient {
    async fn search(
        &self,
        bbox: BoundingBox,
        limit: usize,
    ) -> Result<Vec<FuelStation>, FuelSearchError> {
        self.fetch(bbox, limit).await
    }
}

/// Build the Overpass QL query for fuel stations inside `bbox`.
///
/// Overpass orders bbox edges south, west, north, east.
pub fn fuel_query(bbox: &BoundingBox, limit: usize) -> String {
    let area = format!(
        "({},{},{},{})",
        bbox.south, bbox.west, bbox.north, bbox.east
    );
    format!(
        "[out:json][timeout:{QUERY_TIMEOUT_SECS}];\
         (node[\"amenity\"=\"fuel\"]{area};\
         way[\"amenity\"=\"fuel\"]{area};\
         relation[\"amenity\"=\"fuel\"]{area};);\
         out center {limit};"
    )
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    #[serde(rename = "type")]
    kind: String,
    lat: Option<f64>,
    lon: Option<f64>,
    center: Option<OverpassCenter>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct OverpassCenter {
    lat: Option<f64>,
    lon: Option<f64>,
}

impl OverpassElement {
    /// Nodes carry their own coordinates; ways and relations a center.
    fn into_station(self) -> Option<FuelStation> {
        let (lat, lon) = if self.kind == "node" {
            (self.lat?, self.lon?)
        } else {
            let center = self.center?;
            (center.lat?, center.lon?)
        };
        let location = GeoPoint::new(lat, lon).ok()?;
        let name = self
            .tags
            .get("name")
            .cloned()
            .unwrap_or_else(|| DEFAULT_STATION_NAME.to_string());
        Some(FuelStation::new(location, name))
    }
}

/// Parse an Overpass JSON body into stations.
///
/// Elements without usable coordinates are skipped.
pub fn parse_response(body: &str) -> Result<Vec<FuelStation>, FuelSearchError> {
    let response: OverpassResponse =
        serde_json::from_str(body).map_err(|e| FuelSearchError::Json {
            message: e.to_string(),
        })?;

    Ok(response
        .elements
        .into_iter()
        .filter_map(OverpassElement::into_station)
        .collect())
}
