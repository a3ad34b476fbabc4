#![cfg(test)]

use async_trait::async_trait;
use axum::Router;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::app::{create_app, AppState};
use crate::config::Config;
use crate::connectivity::Connectivity;
use crate::details::PlaceInfoService;
use crate::geolocation::StaticGeolocation;
use crate::models::{Coordinate, DetailField, PlaceDetails, PlaceResult};
use crate::places::{NearbySearchRequest, PlacesService, SearchOutcome, TextSearchRequest};
use crate::search::{SearchPipeline, SearchSession};
use crate::storage::{MemoryStore, SnapshotCache};
use crate::utils::geo::{DistanceMetric, Haversine};

pub fn place_at(id: &str, lat: f64, lng: f64) -> PlaceResult {
    PlaceResult {
        place_id: Some(id.to_string()),
        name: format!("Place {id}"),
        vicinity: Some(format!("{id} street")),
        types: vec!["cafe".to_string()],
        location: Some(Coordinate::new(lat, lng)),
        ..Default::default()
    }
}

pub fn rated(id: &str, rating: Option<f64>) -> PlaceResult {
    PlaceResult {
        rating,
        ..place_at(id, 28.62, 77.22)
    }
}

// Keyed on destination latitude; unknown latitudes are 0 m away
pub struct FixedDistances {
    by_latitude: Vec<(f64, f64)>,
}

impl FixedDistances {
    pub fn by_latitude(entries: &[(f64, f64)]) -> Self {
        Self {
            by_latitude: entries.to_vec(),
        }
    }
}

impl DistanceMetric for FixedDistances {
    fn distance_meters(&self, _a: Coordinate, b: Coordinate) -> f64 {
        self.by_latitude
            .iter()
            .find(|(lat, _)| (lat - b.lat).abs() < 1e-9)
            .map(|(_, distance)| *distance)
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Text(TextSearchRequest),
    Nearby(NearbySearchRequest),
    Details(String),
}

#[derive(Default)]
struct MockState {
    outcomes: VecDeque<(SearchOutcome, Duration)>,
    calls: Vec<RecordedCall>,
    details: HashMap<String, PlaceDetails>,
}

#[derive(Default)]
pub struct MockPlacesService {
    state: Mutex<MockState>,
}

impl MockPlacesService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, outcome: SearchOutcome) {
        self.push_delayed(outcome, Duration::ZERO);
    }

    pub fn push_delayed(&self, outcome: SearchOutcome, delay: Duration) {
        self.state
            .lock()
            .unwrap()
            .outcomes
            .push_back((outcome, delay));
    }

    pub fn set_details(&self, place_id: &str, details: PlaceDetails) {
        self.state
            .lock()
            .unwrap()
            .details
            .insert(place_id.to_string(), details);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().unwrap().calls.clone()
    }

    async fn answer(&self, call: RecordedCall) -> SearchOutcome {
        let (outcome, delay) = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(call);
            state
                .outcomes
                .pop_front()
                .unwrap_or((SearchOutcome::Empty, Duration::ZERO))
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        outcome
    }
}

#[async_trait]
impl PlacesService for MockPlacesService {
    async fn text_search(&self, request: &TextSearchRequest) -> SearchOutcome {
        self.answer(RecordedCall::Text(request.clone())).await
    }

    async fn nearby_search(&self, request: &NearbySearchRequest) -> SearchOutcome {
        self.answer(RecordedCall::Nearby(request.clone())).await
    }

    async fn place_details(&self, place_id: &str, _fields: &[DetailField]) -> Option<PlaceDetails> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(RecordedCall::Details(place_id.to_string()));
        state.details.get(place_id).cloned()
    }

    fn photo_url(&self, photo_ref: &str, max_width: u32, max_height: u32) -> Option<String> {
        Some(format!(
            "https://photos.test/{photo_ref}?w={max_width}&h={max_height}"
        ))
    }
}

pub fn create_test_state(
    mock: Arc<MockPlacesService>,
    position: Option<Coordinate>,
) -> AppState {
    let config = Arc::new(Config::default());
    let pipeline = Arc::new(SearchPipeline::new(
        mock.clone(),
        Arc::new(Haversine),
        SnapshotCache::new(Arc::new(MemoryStore::new())),
        Connectivity::new(true),
    ));
    let session = Arc::new(SearchSession::new(
        pipeline,
        Arc::new(StaticGeolocation::new(position)),
        &config.search,
    ));

    AppState {
        config,
        session,
        details: Arc::new(PlaceInfoService::new(mock)),
    }
}

/// Create a test app backed by a scripted places service
pub fn create_test_app() -> (Router, Arc<MockPlacesService>) {
    let mock = Arc::new(MockPlacesService::new());
    let state = create_test_state(mock.clone(), None);
    (create_app(state), mock)
}
