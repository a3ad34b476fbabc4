use crate::constants::{CAFE_KEYWORD, RESTAURANT_KEYWORD};
use crate::models::SearchCriteria;
use crate::places::{NearbySearchRequest, TextSearchRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Primary,
    RestaurantFallback,
    CafeFallback,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StageRequest {
    Text(TextSearchRequest),
    Nearby(NearbySearchRequest),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedStage {
    pub stage: Stage,
    pub request: StageRequest,
}

/// Fixed fallback chain. Stages are never skipped for repeating an earlier
/// stage's parameters.
pub fn plan_stages(criteria: &SearchCriteria) -> [PlannedStage; 3] {
    let category = criteria.category_type.clone();

    let primary = if criteria.keyword.is_empty() {
        let fallback = category
            .clone()
            .unwrap_or_else(|| RESTAURANT_KEYWORD.to_string());
        StageRequest::Nearby(NearbySearchRequest {
            location: criteria.location,
            radius_meters: criteria.radius_meters(),
            keyword: fallback.clone(),
            place_type: fallback,
            open_now: criteria.open_now_only,
        })
    } else {
        StageRequest::Text(TextSearchRequest {
            location: criteria.location,
            radius_meters: criteria.radius_meters(),
            query: criteria.keyword.clone(),
            category_type: category.clone(),
            open_now: criteria.open_now_only,
        })
    };

    let restaurant = StageRequest::Nearby(NearbySearchRequest {
        location: criteria.location,
        radius_meters: criteria.radius_meters(),
        keyword: RESTAURANT_KEYWORD.to_string(),
        place_type: category.unwrap_or_else(|| RESTAURANT_KEYWORD.to_string()),
        open_now: criteria.open_now_only,
    });

    let cafe = StageRequest::Nearby(NearbySearchRequest {
        location: criteria.location,
        radius_meters: criteria.radius_meters(),
        keyword: CAFE_KEYWORD.to_string(),
        place_type: CAFE_KEYWORD.to_string(),
        open_now: criteria.open_now_only,
    });

    [
        PlannedStage {
            stage: Stage::Primary,
            request: primary,
        },
        PlannedStage {
            stage: Stage::RestaurantFallback,
            request: restaurant,
        },
        PlannedStage {
            stage: Stage::CafeFallback,
            request: cafe,
        },
    ]
}
