use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use super::{NearbySearchRequest, PlacesService, SearchOutcome, TextSearchRequest};
use crate::config::PlacesConfig;
use crate::models::{Coordinate, DetailField, PlaceDetails, PlaceResult, Review};

#[derive(Error, Debug)]
pub enum PlacesError {
    #[error("No API key configured")]
    MissingApiKey,

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Service returned {status}: {message}")]
    Status { status: String, message: String },
}

#[derive(Debug, Clone)]
pub struct GooglePlacesClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    language: Option<String>,
}

impl GooglePlacesClient {
    pub fn new(config: &PlacesConfig) -> Result<Self, PlacesError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("cafe-finder-api/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.resolved_api_key(),
            language: config.language.clone(),
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    async fn get<T>(&self, endpoint: &str, mut params: Vec<(&'static str, String)>) -> Result<T, PlacesError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let key = self.api_key.as_ref().ok_or(PlacesError::MissingApiKey)?;
        params.push(("key", key.clone()));
        if let Some(language) = &self.language {
            params.push(("language", language.clone()));
        }

        let url = format!("{}/{}/json", self.base_url, endpoint);
        let response = self
            .http
            .get(&url)
            .query(&params)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<T>().await?)
    }

    async fn search(&self, endpoint: &str, params: Vec<(&'static str, String)>) -> SearchOutcome {
        let result = self
            .get::<RawSearchResponse>(endpoint, params)
            .await
            .and_then(parse_search_response);

        match result {
            Ok(results) => {
                debug!("{} returned {} results", endpoint, results.len());
                SearchOutcome::from(results)
            }
            Err(e) => {
                warn!("{} failed, treating as no results: {}", endpoint, e);
                SearchOutcome::Empty
            }
        }
    }
}

#[async_trait]
impl PlacesService for GooglePlacesClient {
    async fn text_search(&self, request: &TextSearchRequest) -> SearchOutcome {
        self.search("textsearch", text_search_params(request)).await
    }

    async fn nearby_search(&self, request: &NearbySearchRequest) -> SearchOutcome {
        self.search("nearbysearch", nearby_search_params(request)).await
    }

    async fn place_details(&self, place_id: &str, fields: &[DetailField]) -> Option<PlaceDetails> {
        let field_list = fields
            .iter()
            .map(DetailField::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let params = vec![("place_id", place_id.to_string()), ("fields", field_list)];

        let result = self
            .get::<RawDetailsResponse>("details", params)
            .await
            .and_then(|raw| parse_details_response(raw, place_id));

        match result {
            Ok(details) => Some(details),
            Err(e) => {
                warn!("Details lookup for {} failed: {}", place_id, e);
                None
            }
        }
    }

    fn photo_url(&self, photo_ref: &str, max_width: u32, max_height: u32) -> Option<String> {
        let key = self.api_key.as_ref()?;
        reqwest::Url::parse_with_params(
            &format!("{}/photo", self.base_url),
            &[
                ("maxwidth", max_width.to_string()),
                ("maxheight", max_height.to_string()),
                ("photo_reference", photo_ref.to_string()),
                ("key", key.clone()),
            ],
        )
        .ok()
        .map(|url| url.to_string())
    }
}

fn location_param(location: &Coordinate) -> String {
    format!("{},{}", location.lat, location.lng)
}

fn text_search_params(request: &TextSearchRequest) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("query", request.query.clone()),
        ("location", location_param(&request.location)),
        ("radius", request.radius_meters.to_string()),
    ];
    if let Some(category) = &request.category_type {
        params.push(("type", category.clone()));
    }
    if request.open_now {
        params.push(("opennow", "true".to_string()));
    }
    params
}

fn nearby_search_params(request: &NearbySearchRequest) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("location", location_param(&request.location)),
        ("radius", request.radius_meters.to_string()),
        ("keyword", request.keyword.clone()),
        ("type", request.place_type.clone()),
    ];
    if request.open_now {
        params.push(("opennow", "true".to_string()));
    }
    params
}

#[derive(Debug, Deserialize)]
struct RawSearchResponse {
    status: String,
    #[serde(default)]
    results: Vec<RawPlace>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawDetailsResponse {
    status: String,
    result: Option<RawPlace>,
    error_message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawPlace {
    place_id: Option<String>,
    name: Option<String>,
    vicinity: Option<String>,
    formatted_address: Option<String>,
    formatted_phone_number: Option<String>,
    website: Option<String>,
    rating: Option<f64>,
    user_ratings_total: Option<u32>,
    price_level: Option<u8>,
    #[serde(default)]
    types: Vec<String>,
    #[serde(default)]
    photos: Vec<RawPhoto>,
    opening_hours: Option<RawOpeningHours>,
    geometry: Option<RawGeometry>,
    #[serde(default)]
    reviews: Vec<RawReview>,
}

#[derive(Debug, Deserialize)]
struct RawPhoto {
    photo_reference: String,
}

#[derive(Debug, Deserialize)]
struct RawOpeningHours {
    open_now: Option<bool>,
    #[serde(default)]
    weekday_text: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    location: Option<Coordinate>,
}

#[derive(Debug, Deserialize)]
struct RawReview {
    author_name: Option<String>,
    rating: Option<f64>,
    text: Option<String>,
}

fn check_status(status: &str, message: Option<String>) -> Result<(), PlacesError> {
    match status {
        "OK" | "ZERO_RESULTS" => Ok(()),
        other => Err(PlacesError::Status {
            status: other.to_string(),
            message: message.unwrap_or_default(),
        }),
    }
}

fn parse_search_response(raw: RawSearchResponse) -> Result<Vec<PlaceResult>, PlacesError> {
    check_status(&raw.status, raw.error_message)?;
    Ok(raw.results.into_iter().map(PlaceResult::from).collect())
}

fn parse_details_response(raw: RawDetailsResponse, place_id: &str) -> Result<PlaceDetails, PlacesError> {
    check_status(&raw.status, raw.error_message)?;
    let place = raw.result.ok_or_else(|| PlacesError::Status {
        status: raw.status.clone(),
        message: "missing result".to_string(),
    })?;

    let mut details = PlaceDetails::from(place);
    details.place_id.get_or_insert_with(|| place_id.to_string());
    Ok(details)
}

impl From<RawPlace> for PlaceResult {
    fn from(raw: RawPlace) -> Self {
        PlaceResult {
            place_id: raw.place_id,
            name: raw.name.unwrap_or_default(),
            vicinity: raw.vicinity,
            formatted_address: raw.formatted_address,
            rating: raw.rating,
            user_ratings_total: raw.user_ratings_total,
            price_level: raw.price_level,
            types: raw.types,
            photo_refs: raw.photos.into_iter().map(|p| p.photo_reference).collect(),
            open_now: raw.opening_hours.and_then(|h| h.open_now),
            location: raw.geometry.and_then(|g| g.location),
            distance_meters: None,
        }
    }
}

impl From<RawPlace> for PlaceDetails {
    fn from(raw: RawPlace) -> Self {
        PlaceDetails {
            place_id: raw.place_id,
            name: raw.name,
            rating: raw.rating,
            user_ratings_total: raw.user_ratings_total,
            formatted_address: raw.formatted_address,
            formatted_phone_number: raw.formatted_phone_number,
            website: raw.website,
            weekday_text: raw.opening_hours.map(|h| h.weekday_text).unwrap_or_default(),
            photo_refs: raw.photos.into_iter().map(|p| p.photo_reference).collect(),
            price_level: raw.price_level,
            reviews: raw
                .reviews
                .into_iter()
                .map(|r| Review {
                    author_name: r.author_name,
                    rating: r.rating,
                    text: r.text.unwrap_or_default(),
                })
                .collect(),
            types: raw.types,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with_key(key: Option<&str>) -> GooglePlacesClient {
        GooglePlacesClient {
            http: reqwest::Client::new(),
            base_url: "https://maps.example.com/api/place".to_string(),
            api_key: key.map(str::to_string),
            language: None,
        }
    }

    #[test]
    fn test_parse_search_response() {
        let raw: RawSearchResponse = serde_json::from_str(
            r#"{
                "status": "OK",
                "results": [
                    {
                        "place_id": "p1",
                        "name": "Indian Coffee House",
                        "vicinity": "Connaught Place",
                        "rating": 4.1,
                        "user_ratings_total": 9000,
                        "price_level": 1,
                        "types": ["cafe", "food"],
                        "photos": [{"photo_reference": "ref-1", "width": 400}],
                        "opening_hours": {"open_now": true},
                        "geometry": {"location": {"lat": 28.63, "lng": 77.22}}
                    },
                    {"name": "Nowhere"}
                ]
            }"#,
        )
        .unwrap();

        let results = parse_search_response(raw).unwrap();
        assert_eq!(results.len(), 2);

        let first = &results[0];
        assert_eq!(first.place_id.as_deref(), Some("p1"));
        assert_eq!(first.photo_refs, vec!["ref-1".to_string()]);
        assert_eq!(first.open_now, Some(true));
        assert_eq!(first.location, Some(Coordinate::new(28.63, 77.22)));
        assert_eq!(first.distance_meters, None);

        assert_eq!(results[1].location, None);
        assert!(results[1].types.is_empty());
    }

    #[test]
    fn test_zero_results_is_empty_not_error() {
        let raw: RawSearchResponse =
            serde_json::from_str(r#"{"status": "ZERO_RESULTS", "results": []}"#).unwrap();
        assert!(parse_search_response(raw).unwrap().is_empty());
    }

    #[test]
    fn test_denied_status_is_error() {
        let raw: RawSearchResponse = serde_json::from_str(
            r#"{"status": "REQUEST_DENIED", "error_message": "bad key", "results": []}"#,
        )
        .unwrap();

        match parse_search_response(raw) {
            Err(PlacesError::Status { status, message }) => {
                assert_eq!(status, "REQUEST_DENIED");
                assert_eq!(message, "bad key");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_parse_details_response() {
        let raw: RawDetailsResponse = serde_json::from_str(
            r#"{
                "status": "OK",
                "result": {
                    "name": "Cafe Lota",
                    "formatted_phone_number": "011 2345 6789",
                    "opening_hours": {"weekday_text": ["Monday: 8 AM - 10 PM"]},
                    "reviews": [{"author_name": "A", "rating": 5, "text": "Cozy vibe"}, {"rating": 3}]
                }
            }"#,
        )
        .unwrap();

        let details = parse_details_response(raw, "lota").unwrap();
        assert_eq!(details.place_id.as_deref(), Some("lota"));
        assert_eq!(details.weekday_text, vec!["Monday: 8 AM - 10 PM".to_string()]);
        assert_eq!(details.reviews.len(), 2);
        assert_eq!(details.reviews[0].rating, Some(5.0));
        assert_eq!(details.reviews[1].text, "");
    }

    #[test]
    fn test_text_search_params() {
        let params = text_search_params(&TextSearchRequest {
            location: Coordinate::new(28.61, 77.21),
            radius_meters: 1500,
            query: "filter coffee".to_string(),
            category_type: Some("cafe".to_string()),
            open_now: true,
        });

        assert!(params.contains(&("query", "filter coffee".to_string())));
        assert!(params.contains(&("location", "28.61,77.21".to_string())));
        assert!(params.contains(&("radius", "1500".to_string())));
        assert!(params.contains(&("type", "cafe".to_string())));
        assert!(params.contains(&("opennow", "true".to_string())));
    }

    #[test]
    fn test_nearby_search_params_omit_open_now_when_unset() {
        let params = nearby_search_params(&NearbySearchRequest {
            location: Coordinate::new(1.0, 2.0),
            radius_meters: 500,
            keyword: "restaurant".to_string(),
            place_type: "restaurant".to_string(),
            open_now: false,
        });

        assert!(params.contains(&("keyword", "restaurant".to_string())));
        assert!(params.contains(&("type", "restaurant".to_string())));
        assert!(!params.iter().any(|(k, _)| *k == "opennow"));
    }

    #[test]
    fn test_photo_url_requires_key() {
        assert!(client_with_key(None).photo_url("ref", 600, 400).is_none());

        let url = client_with_key(Some("k")).photo_url("ref", 600, 400).unwrap();
        assert!(url.starts_with("https://maps.example.com/api/place/photo?"));
        assert!(url.contains("maxwidth=600"));
        assert!(url.contains("photo_reference=ref"));
        assert!(url.contains("key=k"));
    }

    #[tokio::test]
    async fn test_missing_key_degrades_to_empty() {
        let client = client_with_key(None);
        let outcome = client
            .nearby_search(&NearbySearchRequest {
                location: Coordinate::new(0.0, 0.0),
                radius_meters: 500,
                keyword: "cafe".to_string(),
                place_type: "cafe".to_string(),
                open_now: false,
            })
            .await;

        assert_eq!(outcome, SearchOutcome::Empty);
        assert!(client.place_details("x", &DetailField::PHOTOS).await.is_none());
    }
}
