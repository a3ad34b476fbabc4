use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Coordinate, PlaceResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CachedGeometry {
    pub location: Coordinate,
}

/// The persisted subset of a [`PlaceResult`]. Photos and reviews are not kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedPlace {
    #[serde(default)]
    pub name: String,
    pub vicinity: Option<String>,
    pub rating: Option<f64>,
    pub price_level: Option<u8>,
    #[serde(default)]
    pub types: Vec<String>,
    pub geometry: CachedGeometry,
    pub place_id: Option<String>,
    #[serde(rename = "distanceMeters")]
    pub distance_meters: Option<f64>,
}

impl CachedPlace {
    /// `None` for places without geometry, which never reach the cache anyway.
    pub fn from_place(place: &PlaceResult) -> Option<Self> {
        let location = place.location?;
        Some(Self {
            name: place.name.clone(),
            vicinity: place.address().map(str::to_string),
            rating: place.rating,
            price_level: place.price_level,
            types: place.types.clone(),
            geometry: CachedGeometry { location },
            place_id: place.place_id.clone(),
            distance_meters: place.distance_meters,
        })
    }
}

impl From<CachedPlace> for PlaceResult {
    fn from(cached: CachedPlace) -> Self {
        PlaceResult {
            place_id: cached.place_id,
            name: cached.name,
            vicinity: cached.vicinity,
            rating: cached.rating,
            price_level: cached.price_level,
            types: cached.types,
            location: Some(cached.geometry.location),
            distance_meters: cached.distance_meters,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedSnapshot {
    pub results: Vec<CachedPlace>,
    #[serde(rename = "userLocation", alias = "originLocation")]
    pub origin_location: Option<Coordinate>,
    #[serde(rename = "savedAt", default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl CachedSnapshot {
    pub fn new(results: &[PlaceResult], origin: Coordinate) -> Self {
        Self {
            results: results.iter().filter_map(CachedPlace::from_place).collect(),
            origin_location: Some(origin),
            saved_at: Some(Utc::now()),
        }
    }

    pub fn places(&self) -> Vec<PlaceResult> {
        self.results.iter().cloned().map(PlaceResult::from).collect()
    }
}
