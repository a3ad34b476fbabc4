use crate::constants::{
    API_KEY_ENV, CACHE_DIR, DEFAULT_CENTER, DEFAULT_DEBOUNCE_MILLIS, DEFAULT_MAX_MARKERS,
    DEFAULT_RADIUS_METERS,
};
use crate::models::Coordinate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacesConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default)]
    pub language: Option<String>,
}

fn default_base_url() -> String {
    "https://maps.googleapis.com/maps/api/place".to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
            language: None,
        }
    }
}

impl PlacesConfig {
    /// Key from the environment wins over the one in the file.
    pub fn resolved_api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| Some(self.api_key.clone()).filter(|k| !k.trim().is_empty()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_radius_meters")]
    pub default_radius_meters: u32,
    #[serde(default = "default_debounce_millis")]
    pub debounce_millis: u64,
    #[serde(default = "default_center")]
    pub default_center: Coordinate,
    #[serde(default = "default_max_markers")]
    pub max_markers: usize,
}

fn default_radius_meters() -> u32 {
    DEFAULT_RADIUS_METERS
}

fn default_debounce_millis() -> u64 {
    DEFAULT_DEBOUNCE_MILLIS
}

fn default_center() -> Coordinate {
    DEFAULT_CENTER
}

fn default_max_markers() -> usize {
    DEFAULT_MAX_MARKERS
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_radius_meters: default_radius_meters(),
            debounce_millis: default_debounce_millis(),
            default_center: default_center(),
            max_markers: default_max_markers(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LocationConfig {
    #[serde(default)]
    pub fixed: Option<Coordinate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    #[serde(default = "default_cache_directory")]
    pub directory: PathBuf,
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_directory() -> PathBuf {
    CACHE_DIR.clone()
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            directory: default_cache_directory(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub places: PlacesConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

pub fn load_config(config_path: &Path) -> Config {
    if !config_path.exists() {
        return Config::default();
    }

    match fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("Invalid config at {:?}, using defaults: {}", config_path, e);
            Config::default()
        }),
        Err(_) => Config::default(),
    }
}

pub fn save_default_config(config_path: &Path) -> std::io::Result<()> {
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let config = Config::default();
    let yaml = serde_yaml::to_string(&config).map_err(|e| std::io::Error::other(e.to_string()))?;
    fs::write(config_path, yaml)
}
