use std::path::Path;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_bind_host")]
    pub bind_host: String,
    #[serde(default = "Config::default_bind_port")]
    pub bind_port: u16,
    #[serde(default = "Config::default_osrm_base_url")]
    pub osrm_base_url: String,
    #[serde(default = "Config::default_nominatim_base_url")]
    pub nominatim_base_url: String,
    #[serde(default = "Config::default_route_timeout_secs")]
    pub route_timeout_secs: u64,
    #[serde(default = "Config::default_geocode_timeout_secs")]
    pub geocode_timeout_secs: u64,
    #[serde(default = "Config::default_geocode_cache_dir")]
    pub geocode_cache_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_host: Self::default_bind_host(),
            bind_port: Self::default_bind_port(),
            osrm_base_url: Self::default_osrm_base_url(),
            nominatim_base_url: Self::default_nominatim_base_url(),
            route_timeout_secs: Self::default_route_timeout_secs(),
            geocode_timeout_secs: Self::default_geocode_timeout_secs(),
            geocode_cache_dir: Self::default_geocode_cache_dir(),
        }
    }
}

impl Config {
    fn default_bind_host() -> String {
        "127.0.0.1".to_string()
    }
    fn default_bind_port() -> u16 {
        8080
    }
    fn default_osrm_base_url() -> String {
        "https://router.project-osrm.org".to_string()
    }
    fn default_nominatim_base_url() -> String {
        "https://nominatim.openstreetmap.org".to_string()
    }
    fn default_route_timeout_secs() -> u64 {
        10
    }
    fn default_geocode_timeout_secs() -> u64 {
        5
    }
    fn default_geocode_cache_dir() -> String {
        "location_cache".to_string()
    }

    /// Loads config from an optional YAML file, then applies environment
    /// variable overrides. A missing file is not an error: defaults apply.
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) if p.as_ref().exists() => {
                let content = std::fs::read_to_string(p.as_ref())
                    .map_err(|e| ConfigError::ReadError(e.to_string()))?;
                serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?
            }
            _ => Config::default(),
        };

        if let Ok(v) = std::env::var("ELD_BIND_HOST") {
            config.bind_host = v;
        }
        if let Ok(v) = std::env::var("ELD_BIND_PORT") {
            config.bind_port = v
                .parse()
                .map_err(|_| ConfigError::ParseError(format!("ELD_BIND_PORT not a valid port: {v}")))?;
        }
        if let Ok(v) = std::env::var("ELD_OSRM_BASE_URL") {
            config.osrm_base_url = v;
        }
        if let Ok(v) = std::env::var("ELD_NOMINATIM_BASE_URL") {
            config.nominatim_base_url = v;
        }
        if let Ok(v) = std::env::var("ELD_GEOCODE_CACHE_DIR") {
            config.geocode_cache_dir = v;
        }

        Ok(config)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse config: {0}")]
    ParseError(String),
}
