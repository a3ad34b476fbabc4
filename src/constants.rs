use once_cell::sync::Lazy;
use std::path::PathBuf;

use crate::models::Coordinate;

pub static DATA_DIR: Lazy<PathBuf> = Lazy::new(|| {
    std::env::var("CAFE_FINDER_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./data"))
});

pub static CONFIG_PATH: Lazy<PathBuf> = Lazy::new(|| DATA_DIR.join("config.yaml"));
pub static CACHE_DIR: Lazy<PathBuf> = Lazy::new(|| DATA_DIR.join("cache"));

pub const API_KEY_ENV: &str = "GOOGLE_MAPS_API_KEY";

pub const MIN_RADIUS_METERS: u32 = 500;
pub const MAX_RADIUS_METERS: u32 = 20_000;
pub const DEFAULT_RADIUS_METERS: u32 = 2_000;

pub const DEFAULT_DEBOUNCE_MILLIS: u64 = 600;
pub const DEFAULT_MAX_MARKERS: usize = 200;

pub const DEFAULT_CENTER: Coordinate = Coordinate {
    lat: 28.6139,
    lng: 77.2090,
};

pub const RESTAURANT_KEYWORD: &str = "restaurant";
pub const CAFE_KEYWORD: &str = "cafe";
pub const INTERNET_CAFE_TYPE: &str = "internet_cafe";

pub const SNAPSHOT_KEY: &str = "lastCafeResults";

pub const FALLBACK_PHOTO_URL: &str =
    "https://images.unsplash.com/photo-1504754524776-8f4f37790ca0?q=80&w=1200&auto=format&fit=crop";

pub const DETAILS_PHOTO_LIMIT: usize = 6;
pub const DETAILS_REVIEW_LIMIT: usize = 5;
pub const TAG_REVIEW_LIMIT: usize = 10;
pub const MAX_MINI_TAGS: usize = 3;
pub const REVIEW_SUMMARY_MAX_CHARS: usize = 160;
