use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{Coordinate, Viewport};
use crate::utils::geo::clamp_radius;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    #[validate(range(max = 4))]
    pub price_level: Option<u8>,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 5.0))]
    pub min_rating: f64,
    #[serde(default)]
    pub require_wifi_signal: bool,
    #[serde(default)]
    pub open_now_only: bool,
    #[validate(range(min = 1))]
    pub radius_meters: Option<u32>,
}

/// Everything one pipeline invocation needs. The radius is clamped on
/// construction and can't be set afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCriteria {
    pub location: Coordinate,
    radius_meters: u32,
    pub keyword: String,
    pub category_type: Option<String>,
    pub price_level: Option<u8>,
    pub min_rating: f64,
    pub require_wifi_signal: bool,
    pub open_now_only: bool,
}

impl SearchCriteria {
    pub fn new(location: Coordinate, radius_meters: f64) -> Self {
        Self {
            location,
            radius_meters: clamp_radius(radius_meters),
            keyword: String::new(),
            category_type: None,
            price_level: None,
            min_rating: 0.0,
            require_wifi_signal: false,
            open_now_only: false,
        }
    }

    pub fn radius_meters(&self) -> u32 {
        self.radius_meters
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = keyword.into().trim().to_string();
        self
    }

    pub fn with_category(mut self, category_type: Option<String>) -> Self {
        self.category_type = category_type.filter(|c| !c.trim().is_empty());
        self
    }

    pub fn with_filters(mut self, filters: &SearchFilters) -> Self {
        self.price_level = filters.price_level;
        self.min_rating = filters.min_rating;
        self.require_wifi_signal = filters.require_wifi_signal;
        self.open_now_only = filters.open_now_only;
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: Option<String>,
    /// `Some("")` clears the selected category.
    pub category: Option<String>,
    #[validate(nested)]
    pub filters: Option<SearchFilters>,
    pub location: Option<Coordinate>,
    pub viewport: Option<Viewport>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueryInputRequest {
    pub query: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryRequest {
    #[serde(default)]
    pub query: String,
    #[serde(rename = "type", default)]
    pub category_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaSearchRequest {
    pub center: Coordinate,
    pub viewport: Option<Viewport>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceSelectionRequest {
    pub location: Option<Coordinate>,
    pub viewport: Option<Viewport>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PlaceIdRequest {
    #[validate(length(min = 1))]
    pub place_id: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConnectivityRequest {
    pub online: bool,
}

/// A position fix or failure observed by the front-end. An empty request
/// asks the server-side provider instead.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocateRequest {
    pub position: Option<Coordinate>,
    /// Browser `GeolocationPositionError.code`.
    pub error_code: Option<u16>,
}
