use serde::Serialize;

use super::Coordinate;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceCard {
    pub place_id: Option<String>,
    pub name: String,
    pub address: String,
    pub distance_meters: Option<f64>,
    pub distance_text: String,
    pub rating: Option<f64>,
    pub rating_text: String,
    pub stars: String,
    pub price_text: String,
    pub open_now: bool,
    pub badge: String,
    pub photo_url: String,
    pub maps_url: String,
    pub directions_url: Option<String>,
    pub location: Option<Coordinate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerView {
    pub place_id: Option<String>,
    pub title: String,
    pub position: Coordinate,
    pub address: String,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub count: usize,
    pub offline: bool,
    pub origin: Option<Coordinate>,
    pub results: Vec<PlaceCard>,
    pub markers: Vec<MarkerView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub author: String,
    pub rating: Option<f64>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailsView {
    pub title: String,
    pub available: bool,
    pub message: Option<String>,
    pub address: String,
    pub summary: String,
    pub phone: String,
    pub website: Option<String>,
    pub hours: Vec<String>,
    pub photos: Vec<String>,
    pub reviews: Vec<ReviewSummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagsResponse {
    pub place_id: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConnectivityResponse {
    pub online: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocateResponse {
    pub location: Coordinate,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoResponse {
    pub place_id: String,
    pub url: String,
}
