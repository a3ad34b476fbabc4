use std::cmp::Ordering as CmpOrdering;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::planner::{plan_stages, Stage, StageRequest};
use crate::connectivity::Connectivity;
use crate::constants::INTERNET_CAFE_TYPE;
use crate::models::{CachedSnapshot, Coordinate, PlaceResult, SearchCriteria};
use crate::places::{PlacesService, SearchOutcome};
use crate::storage::SnapshotCache;
use crate::utils::geo::DistanceMetric;

#[derive(Debug, Default)]
struct LastResults {
    results: Vec<PlaceResult>,
    origin: Option<Coordinate>,
}

pub struct SearchPipeline {
    places: Arc<dyn PlacesService>,
    metric: Arc<dyn DistanceMetric>,
    cache: SnapshotCache,
    connectivity: Connectivity,
    last: RwLock<LastResults>,
    generation: AtomicU64,
}

impl SearchPipeline {
    pub fn new(
        places: Arc<dyn PlacesService>,
        metric: Arc<dyn DistanceMetric>,
        cache: SnapshotCache,
        connectivity: Connectivity,
    ) -> Self {
        Self {
            places,
            metric,
            cache,
            connectivity,
            last: RwLock::new(LastResults::default()),
            generation: AtomicU64::new(0),
        }
    }

    pub fn places(&self) -> &Arc<dyn PlacesService> {
        &self.places
    }

    pub fn metric(&self) -> &Arc<dyn DistanceMetric> {
        &self.metric
    }

    pub fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    /// Returns `None` while offline. Only the newest generation updates the
    /// last results and the snapshot.
    pub async fn search(&self, criteria: &SearchCriteria) -> Option<Vec<PlaceResult>> {
        if !self.connectivity.is_online() {
            debug!("Offline, skipping search");
            return None;
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let candidates = self.run_stages(criteria).await;
        let filtered = apply_filters(candidates, criteria);
        let ranked = rank_by_distance(filtered, criteria.location, self.metric.as_ref());

        let mut last = self.last.write().await;
        if self.generation.load(Ordering::SeqCst) == generation {
            last.results = ranked.clone();
            last.origin = Some(criteria.location);
            self.cache.save(&ranked, criteria.location).await;
        } else {
            debug!("Search generation {} superseded, not storing results", generation);
        }

        Some(ranked)
    }

    async fn run_stages(&self, criteria: &SearchCriteria) -> Vec<PlaceResult> {
        for planned in plan_stages(criteria) {
            let outcome = match &planned.request {
                StageRequest::Text(request) => self.places.text_search(request).await,
                StageRequest::Nearby(request) => self.places.nearby_search(request).await,
            };
            debug!("{:?} stage returned {} results", planned.stage, outcome.len());

            if let SearchOutcome::Ok(results) = outcome {
                if !results.is_empty() {
                    return results;
                }
            }

            if planned.stage != Stage::CafeFallback {
                info!("{:?} stage found nothing, falling back", planned.stage);
            }
        }

        Vec::new()
    }

    pub async fn last_results(&self) -> (Vec<PlaceResult>, Option<Coordinate>) {
        let last = self.last.read().await;
        (last.results.clone(), last.origin)
    }

    /// Seeds the last results from a snapshot without persisting anything.
    pub async fn restore(&self, snapshot: &CachedSnapshot) -> Vec<PlaceResult> {
        let results = snapshot.places();
        let mut last = self.last.write().await;
        last.results = results.clone();
        last.origin = snapshot.origin_location;
        results
    }

    pub async fn cached_snapshot(&self) -> Option<CachedSnapshot> {
        self.cache.load().await
    }
}

/// Rating floor, exact price level, then the approximate wifi signal.
pub fn apply_filters(results: Vec<PlaceResult>, criteria: &SearchCriteria) -> Vec<PlaceResult> {
    results
        .into_iter()
        .filter(|place| place.rating.unwrap_or(0.0) >= criteria.min_rating)
        .filter(|place| match criteria.price_level {
            Some(level) => place.price_level == Some(level),
            None => true,
        })
        .filter(|place| {
            !criteria.require_wifi_signal
                || place.has_type(INTERNET_CAFE_TYPE)
                || place.user_ratings_total.unwrap_or(0) > 0
        })
        .collect()
}

/// Drops places without geometry, attaches the distance from `origin` and
/// sorts nearest first. Equal distances keep their incoming order.
pub fn rank_by_distance(
    results: Vec<PlaceResult>,
    origin: Coordinate,
    metric: &dyn DistanceMetric,
) -> Vec<PlaceResult> {
    let mut ranked: Vec<PlaceResult> = results
        .into_iter()
        .filter_map(|mut place| {
            let location = place.location?;
            place.distance_meters = Some(metric.distance_meters(origin, location));
            Some(place)
        })
        .collect();

    ranked.sort_by(|a, b| {
        let a = a.distance_meters.unwrap_or(0.0);
        let b = b.distance_meters.unwrap_or(0.0);
        a.partial_cmp(&b).unwrap_or(CmpOrdering::Equal)
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::places::{NearbySearchRequest, TextSearchRequest};
    use crate::storage::MemoryStore;
    use crate::test_utils::{place_at, rated, FixedDistances, MockPlacesService, RecordedCall};
    use crate::utils::geo::Haversine;
    use std::time::Duration;

    fn pipeline_with(mock: Arc<MockPlacesService>) -> SearchPipeline {
        SearchPipeline::new(
            mock,
            Arc::new(Haversine),
            SnapshotCache::new(Arc::new(MemoryStore::new())),
            Connectivity::new(true),
        )
    }

    fn origin() -> Coordinate {
        Coordinate::new(28.61, 77.21)
    }

    #[tokio::test]
    async fn test_text_results_skip_fallbacks() {
        let mock = Arc::new(MockPlacesService::new());
        mock.push(SearchOutcome::Ok(vec![place_at("a", 28.62, 77.22)]));
        let pipeline = pipeline_with(mock.clone());

        let criteria = SearchCriteria::new(origin(), 2000.0).with_keyword("coffee");
        let results = pipeline.search(&criteria).await.unwrap();

        assert_eq!(results.len(), 1);
        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert!(matches!(calls[0], RecordedCall::Text(_)));
    }

    #[tokio::test]
    async fn test_empty_text_search_falls_back_to_restaurant() {
        let mock = Arc::new(MockPlacesService::new());
        mock.push(SearchOutcome::Empty);
        mock.push(SearchOutcome::Ok(vec![place_at("r", 28.62, 77.22)]));
        let pipeline = pipeline_with(mock.clone());

        let criteria = SearchCriteria::new(origin(), 2000.0).with_keyword("zzzz");
        let results = pipeline.search(&criteria).await.unwrap();

        assert_eq!(results[0].place_id.as_deref(), Some("r"));
        let calls = mock.calls();
        assert_eq!(calls.len(), 2);
        match &calls[1] {
            RecordedCall::Nearby(req) => assert_eq!(req.keyword, "restaurant"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_full_chain_runs_literally_and_ranks_cafe_results() {
        let mock = Arc::new(MockPlacesService::new());
        mock.push(SearchOutcome::Empty);
        mock.push(SearchOutcome::Empty);
        mock.push(SearchOutcome::Ok(vec![
            place_at("far", 1.0, 0.0),
            place_at("near", 2.0, 0.0),
        ]));

        let metric = FixedDistances::by_latitude(&[(1.0, 800.0), (2.0, 150.0)]);
        let pipeline = SearchPipeline::new(
            mock.clone(),
            Arc::new(metric),
            SnapshotCache::new(Arc::new(MemoryStore::new())),
            Connectivity::new(true),
        );

        let criteria = SearchCriteria::new(origin(), 2000.0);
        let results = pipeline.search(&criteria).await.unwrap();

        let calls = mock.calls();
        assert_eq!(calls.len(), 3);
        let expected = |keyword: &str, place_type: &str| {
            RecordedCall::Nearby(NearbySearchRequest {
                location: origin(),
                radius_meters: 2000,
                keyword: keyword.to_string(),
                place_type: place_type.to_string(),
                open_now: false,
            })
        };
        assert_eq!(calls[0], expected("restaurant", "restaurant"));
        assert_eq!(calls[1], expected("restaurant", "restaurant"));
        assert_eq!(calls[2], expected("cafe", "cafe"));

        let ids: Vec<_> = results.iter().map(|p| p.place_id.as_deref().unwrap()).collect();
        assert_eq!(ids, vec!["near", "far"]);
        assert_eq!(results[0].distance_meters, Some(150.0));
        assert_eq!(results[1].distance_meters, Some(800.0));
    }

    #[tokio::test]
    async fn test_restaurant_fallback_hit_stops_chain() {
        let mock = Arc::new(MockPlacesService::new());
        mock.push(SearchOutcome::Empty);
        mock.push(SearchOutcome::Ok(vec![place_at("r", 28.62, 77.22)]));
        mock.push(SearchOutcome::Ok(vec![place_at("c", 28.62, 77.22)]));
        let pipeline = pipeline_with(mock.clone());

        let results = pipeline
            .search(&SearchCriteria::new(origin(), 2000.0))
            .await
            .unwrap();

        assert_eq!(mock.calls().len(), 2);
        assert_eq!(results[0].place_id.as_deref(), Some("r"));
    }

    #[tokio::test]
    async fn test_all_stages_empty_returns_empty() {
        let mock = Arc::new(MockPlacesService::new());
        let pipeline = pipeline_with(mock.clone());

        let results = pipeline
            .search(&SearchCriteria::new(origin(), 2000.0))
            .await
            .unwrap();

        assert!(results.is_empty());
        assert_eq!(mock.calls().len(), 3);
        let (last, last_origin) = pipeline.last_results().await;
        assert!(last.is_empty());
        assert_eq!(last_origin, Some(origin()));
    }

    #[tokio::test]
    async fn test_offline_search_is_a_no_op() {
        let mock = Arc::new(MockPlacesService::new());
        mock.push(SearchOutcome::Ok(vec![place_at("a", 28.62, 77.22)]));
        let pipeline = pipeline_with(mock.clone());

        pipeline
            .search(&SearchCriteria::new(origin(), 2000.0))
            .await
            .unwrap();
        pipeline.connectivity().set_online(false);

        let outcome = pipeline
            .search(&SearchCriteria::new(origin(), 2000.0).with_keyword("tea"))
            .await;

        assert!(outcome.is_none());
        assert_eq!(mock.calls().len(), 1);
        assert_eq!(pipeline.last_results().await.0.len(), 1);
    }

    #[tokio::test]
    async fn test_successful_search_overwrites_snapshot() {
        let mock = Arc::new(MockPlacesService::new());
        mock.push(SearchOutcome::Ok(vec![
            place_at("b", 28.63, 77.23),
            place_at("a", 28.611, 77.211),
        ]));
        let pipeline = pipeline_with(mock);

        let ranked = pipeline
            .search(&SearchCriteria::new(origin(), 2000.0))
            .await
            .unwrap();

        let snapshot = pipeline.cached_snapshot().await.unwrap();
        assert_eq!(snapshot.origin_location, Some(origin()));
        let cached_ids: Vec<_> = snapshot.places().into_iter().map(|p| p.place_id).collect();
        let ranked_ids: Vec<_> = ranked.into_iter().map(|p| p.place_id).collect();
        assert_eq!(cached_ids, ranked_ids);
        assert_eq!(cached_ids[0].as_deref(), Some("a"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_completion_does_not_overwrite_newer_results() {
        let mock = Arc::new(MockPlacesService::new());
        mock.push_delayed(
            SearchOutcome::Ok(vec![place_at("slow", 28.62, 77.22)]),
            Duration::from_millis(500),
        );
        mock.push_delayed(
            SearchOutcome::Ok(vec![place_at("fast", 28.62, 77.22)]),
            Duration::from_millis(10),
        );
        let pipeline = pipeline_with(mock);

        let slow = SearchCriteria::new(origin(), 2000.0).with_keyword("slow");
        let fast = SearchCriteria::new(origin(), 2000.0).with_keyword("fast");
        let (slow_results, fast_results) = tokio::join!(pipeline.search(&slow), pipeline.search(&fast));

        assert_eq!(slow_results.unwrap()[0].place_id.as_deref(), Some("slow"));
        assert_eq!(fast_results.unwrap()[0].place_id.as_deref(), Some("fast"));

        let (last, _) = pipeline.last_results().await;
        assert_eq!(last[0].place_id.as_deref(), Some("fast"));
        let cached = pipeline.cached_snapshot().await.unwrap().places();
        assert_eq!(cached[0].place_id.as_deref(), Some("fast"));
    }

    #[test]
    fn test_rating_filter_treats_missing_as_zero() {
        let places = vec![
            rated("a", Some(4.5)),
            rated("b", Some(3.9)),
            rated("c", None),
            rated("d", Some(4.0)),
        ];
        let mut criteria = SearchCriteria::new(origin(), 2000.0);
        criteria.min_rating = 4.0;

        let kept: Vec<_> = apply_filters(places, &criteria)
            .into_iter()
            .map(|p| p.rating)
            .collect();
        assert_eq!(kept, vec![Some(4.5), Some(4.0)]);
    }

    #[test]
    fn test_price_filter_is_exact() {
        let mut cheap = rated("cheap", Some(4.0));
        cheap.price_level = Some(1);
        let mut pricey = rated("pricey", Some(4.0));
        pricey.price_level = Some(3);
        let unknown = rated("unknown", Some(4.0));

        let mut criteria = SearchCriteria::new(origin(), 2000.0);
        criteria.price_level = Some(1);

        let kept = apply_filters(vec![cheap, pricey, unknown], &criteria);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].place_id.as_deref(), Some("cheap"));
    }

    #[test]
    fn test_wifi_signal_filter() {
        let mut internet = rated("internet", None);
        internet.types = vec![INTERNET_CAFE_TYPE.to_string()];
        let mut reviewed = rated("reviewed", None);
        reviewed.user_ratings_total = Some(3);
        let mut silent = rated("silent", None);
        silent.user_ratings_total = Some(0);

        let mut criteria = SearchCriteria::new(origin(), 2000.0);
        criteria.require_wifi_signal = true;

        let kept: Vec<_> = apply_filters(vec![internet, reviewed, silent], &criteria)
            .into_iter()
            .filter_map(|p| p.place_id)
            .collect();
        assert_eq!(kept, vec!["internet".to_string(), "reviewed".to_string()]);
    }

    #[test]
    fn test_ranking_drops_missing_geometry_and_is_stable() {
        let mut no_geometry = place_at("none", 4.0, 0.0);
        no_geometry.location = None;

        let places = vec![
            place_at("tie-1", 1.0, 0.0),
            no_geometry,
            place_at("closest", 2.0, 0.0),
            place_at("tie-2", 3.0, 0.0),
        ];
        let metric = FixedDistances::by_latitude(&[(1.0, 300.0), (2.0, 100.0), (3.0, 300.0)]);

        let ranked = rank_by_distance(places, origin(), &metric);
        let ids: Vec<_> = ranked.iter().map(|p| p.place_id.as_deref().unwrap()).collect();
        assert_eq!(ids, vec!["closest", "tie-1", "tie-2"]);
        assert!(ranked.iter().all(|p| p.location.is_some()));
    }

    #[test]
    fn test_ranking_is_sorted_by_real_distance() {
        let places = vec![
            place_at("far", 28.70, 77.30),
            place_at("near", 28.611, 77.211),
            place_at("mid", 28.63, 77.23),
        ];

        let ranked = rank_by_distance(places, origin(), &Haversine);
        let distances: Vec<f64> = ranked.iter().map(|p| p.distance_meters.unwrap()).collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(ranked[0].place_id.as_deref(), Some("near"));
    }

    #[tokio::test]
    async fn test_open_now_and_category_reach_text_search() {
        let mock = Arc::new(MockPlacesService::new());
        mock.push(SearchOutcome::Ok(vec![place_at("a", 28.62, 77.22)]));
        let pipeline = pipeline_with(mock.clone());

        let mut criteria = SearchCriteria::new(origin(), 100_000.0)
            .with_keyword("dosa")
            .with_category(Some("restaurant".to_string()));
        criteria.open_now_only = true;
        pipeline.search(&criteria).await;

        assert_eq!(
            mock.calls()[0],
            RecordedCall::Text(TextSearchRequest {
                location: origin(),
                radius_meters: 20_000,
                query: "dosa".to_string(),
                category_type: Some("restaurant".to_string()),
                open_now: true,
            })
        );
    }
}
