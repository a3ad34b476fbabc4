use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::{Debouncer, SearchPipeline};
use crate::config::SearchConfig;
use crate::geolocation::{GeolocationError, GeolocationProvider};
use crate::models::{
    CachedSnapshot, Coordinate, PlaceResult, SearchCriteria, SearchFilters, SearchRequest, Viewport,
};
use crate::utils::geo::effective_radius;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchView {
    pub results: Vec<PlaceResult>,
    pub origin: Option<Coordinate>,
    pub offline: bool,
}

#[derive(Debug, Clone)]
struct SessionState {
    query: String,
    category: Option<String>,
    filters: SearchFilters,
    user_location: Option<Coordinate>,
    map_center: Coordinate,
    viewport: Option<Viewport>,
}

pub struct SearchSession {
    pipeline: Arc<SearchPipeline>,
    geolocation: Arc<dyn GeolocationProvider>,
    state: RwLock<SessionState>,
    debouncer: Debouncer,
    default_radius: u32,
}

impl SearchSession {
    pub fn new(
        pipeline: Arc<SearchPipeline>,
        geolocation: Arc<dyn GeolocationProvider>,
        config: &SearchConfig,
    ) -> Self {
        Self {
            pipeline,
            geolocation,
            state: RwLock::new(SessionState {
                query: String::new(),
                category: None,
                filters: SearchFilters::default(),
                user_location: None,
                map_center: config.default_center,
                viewport: None,
            }),
            debouncer: Debouncer::new(Duration::from_millis(config.debounce_millis)),
            default_radius: config.default_radius_meters,
        }
    }

    pub fn pipeline(&self) -> &Arc<SearchPipeline> {
        &self.pipeline
    }

    /// Offline at startup shows the cached snapshot instead of searching.
    pub async fn start(&self) -> SearchView {
        if let Err(e) = self.locate().await {
            warn!("Startup location failed: {}", e.user_message());
        }

        if !self.pipeline.connectivity().is_online() {
            return match self.pipeline.cached_snapshot().await {
                Some(snapshot) if !snapshot.results.is_empty() => {
                    info!("Offline at startup, showing {} cached results", snapshot.results.len());
                    let results = self.pipeline.restore(&snapshot).await;
                    let origin = match snapshot.origin_location {
                        Some(origin) => Some(origin),
                        None => self.state.read().await.user_location,
                    };
                    SearchView {
                        results,
                        origin,
                        offline: true,
                    }
                }
                _ => self.last_view().await,
            };
        }

        self.run(None, None).await
    }

    /// Clears the previous fix first, so a failure leaves no stale location.
    pub async fn locate(&self) -> Result<Coordinate, GeolocationError> {
        self.state.write().await.user_location = None;
        let position = self.geolocation.current_position().await;
        self.report_position(position).await
    }

    pub async fn report_position(
        &self,
        position: Result<Coordinate, GeolocationError>,
    ) -> Result<Coordinate, GeolocationError> {
        let mut state = self.state.write().await;
        match position {
            Ok(location) if location.is_valid() => {
                info!("User located at {},{}", location.lat, location.lng);
                state.user_location = Some(location);
                state.map_center = location;
                Ok(location)
            }
            Ok(_) => {
                state.user_location = None;
                Err(GeolocationError::Unknown)
            }
            Err(e) => {
                state.user_location = None;
                Err(e)
            }
        }
    }

    pub async fn user_location(&self) -> Option<Coordinate> {
        self.state.read().await.user_location
    }

    pub async fn apply(&self, request: &SearchRequest) {
        let mut state = self.state.write().await;
        if let Some(query) = &request.query {
            state.query = query.trim().to_string();
        }
        if let Some(category) = &request.category {
            state.category = Some(category.trim().to_string()).filter(|c| !c.is_empty());
        }
        if let Some(filters) = &request.filters {
            state.filters = filters.clone();
        }
        if let Some(viewport) = request.viewport {
            state.viewport = Some(viewport);
        }
    }

    pub async fn search_now(&self, location: Option<Coordinate>) -> SearchView {
        self.debouncer.cancel();
        self.run(location, None).await
    }

    pub async fn update_filters(&self, filters: SearchFilters) -> SearchView {
        self.state.write().await.filters = filters;
        self.run(None, None).await
    }

    pub async fn on_query_input(self: &Arc<Self>, query: String) {
        self.state.write().await.query = query.trim().to_string();

        let session = Arc::clone(self);
        self.debouncer.schedule(async move {
            session.run(None, None).await;
        });
    }

    pub async fn select_category(&self, query: String, category: Option<String>) -> SearchView {
        let category = {
            let mut state = self.state.write().await;
            state.query = query.trim().to_string();
            state.category = category.filter(|c| !c.trim().is_empty());
            state.category.clone()
        };
        self.debouncer.cancel();
        self.run(None, category).await
    }

    pub async fn search_area(&self, center: Coordinate, viewport: Option<Viewport>) -> SearchView {
        let category = {
            let mut state = self.state.write().await;
            state.map_center = center;
            if viewport.is_some() {
                state.viewport = viewport;
            }
            state.category.clone()
        };
        self.run(Some(center), category).await
    }

    pub async fn select_place(
        &self,
        location: Option<Coordinate>,
        viewport: Option<Viewport>,
    ) -> SearchView {
        {
            let mut state = self.state.write().await;
            if let Some(location) = location {
                state.map_center = location;
            }
            if viewport.is_some() {
                state.viewport = viewport;
            }
        }
        self.run(location, None).await
    }

    pub async fn last_view(&self) -> SearchView {
        let (results, origin) = self.pipeline.last_results().await;
        SearchView {
            results,
            origin,
            offline: !self.pipeline.connectivity().is_online(),
        }
    }

    pub async fn cached_snapshot(&self) -> Option<CachedSnapshot> {
        self.pipeline.cached_snapshot().await
    }

    pub fn set_online(&self, online: bool) -> bool {
        self.pipeline.connectivity().set_online(online)
    }

    pub fn is_online(&self) -> bool {
        self.pipeline.connectivity().is_online()
    }

    /// Location precedence: explicit override, user location, map center.
    async fn criteria(
        &self,
        location: Option<Coordinate>,
        category: Option<String>,
    ) -> SearchCriteria {
        let state = self.state.read().await;
        let origin = location
            .or(state.user_location)
            .unwrap_or(state.map_center);
        let radius = effective_radius(
            state.filters.radius_meters,
            state.viewport.as_ref(),
            self.default_radius,
            self.pipeline.metric().as_ref(),
        );

        SearchCriteria::new(origin, radius)
            .with_keyword(state.query.clone())
            .with_category(category)
            .with_filters(&state.filters)
    }

    async fn run(&self, location: Option<Coordinate>, category: Option<String>) -> SearchView {
        let criteria = self.criteria(location, category).await;
        match self.pipeline.search(&criteria).await {
            Some(results) => SearchView {
                results,
                origin: Some(criteria.location),
                offline: false,
            },
            None => self.last_view().await,
        }
    }
}
