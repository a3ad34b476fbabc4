//! External place-search service. Failures are logged by the implementation
//! and surface as "nothing found".

mod google;

pub use google::{GooglePlacesClient, PlacesError};

use async_trait::async_trait;

use crate::models::{Coordinate, DetailField, PlaceDetails, PlaceResult};

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Ok(Vec<PlaceResult>),
    Empty,
}

impl SearchOutcome {
    pub fn is_empty(&self) -> bool {
        match self {
            SearchOutcome::Ok(results) => results.is_empty(),
            SearchOutcome::Empty => true,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SearchOutcome::Ok(results) => results.len(),
            SearchOutcome::Empty => 0,
        }
    }

    pub fn into_results(self) -> Vec<PlaceResult> {
        match self {
            SearchOutcome::Ok(results) => results,
            SearchOutcome::Empty => Vec::new(),
        }
    }
}

impl From<Vec<PlaceResult>> for SearchOutcome {
    fn from(results: Vec<PlaceResult>) -> Self {
        if results.is_empty() {
            SearchOutcome::Empty
        } else {
            SearchOutcome::Ok(results)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextSearchRequest {
    pub location: Coordinate,
    pub radius_meters: u32,
    pub query: String,
    pub category_type: Option<String>,
    pub open_now: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NearbySearchRequest {
    pub location: Coordinate,
    pub radius_meters: u32,
    pub keyword: String,
    pub place_type: String,
    pub open_now: bool,
}

#[async_trait]
pub trait PlacesService: Send + Sync {
    async fn text_search(&self, request: &TextSearchRequest) -> SearchOutcome;

    async fn nearby_search(&self, request: &NearbySearchRequest) -> SearchOutcome;

    async fn place_details(&self, place_id: &str, fields: &[DetailField]) -> Option<PlaceDetails>;

    fn photo_url(&self, photo_ref: &str, max_width: u32, max_height: u32) -> Option<String>;
}
