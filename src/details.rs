use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::constants::{DETAILS_PHOTO_LIMIT, DETAILS_REVIEW_LIMIT, FALLBACK_PHOTO_URL};
use crate::models::{DetailField, DetailsView, PlaceDetails};
use crate::places::PlacesService;
use crate::presentation::{mini_tags, price_symbols, summarize_review};

const DETAILS_PHOTO_WIDTH: u32 = 900;
const DETAILS_PHOTO_HEIGHT: u32 = 600;
const LOOKUP_PHOTO_WIDTH: u32 = 800;
const LOOKUP_PHOTO_HEIGHT: u32 = 600;
const UNAVAILABLE_MESSAGE: &str = "Unable to load details right now.";

pub struct PlaceInfoService {
    places: Arc<dyn PlacesService>,
    tags: RwLock<HashMap<String, Vec<String>>>,
}

impl PlaceInfoService {
    pub fn new(places: Arc<dyn PlacesService>) -> Self {
        Self {
            places,
            tags: RwLock::new(HashMap::new()),
        }
    }

    pub async fn details_view(&self, place_id: &str, fallback_name: Option<&str>) -> DetailsView {
        match self.places.place_details(place_id, &DetailField::MODAL).await {
            Some(details) => self.render_details(details, fallback_name),
            None => DetailsView {
                title: fallback_name.unwrap_or("Details").to_string(),
                available: false,
                message: Some(UNAVAILABLE_MESSAGE.to_string()),
                address: String::new(),
                summary: String::new(),
                phone: String::new(),
                website: None,
                hours: Vec::new(),
                photos: Vec::new(),
                reviews: Vec::new(),
            },
        }
    }

    fn render_details(&self, details: PlaceDetails, fallback_name: Option<&str>) -> DetailsView {
        let photos = details
            .photo_refs
            .iter()
            .take(DETAILS_PHOTO_LIMIT)
            .filter_map(|r| self.places.photo_url(r, DETAILS_PHOTO_WIDTH, DETAILS_PHOTO_HEIGHT))
            .collect();

        let rating = details
            .rating
            .map(|r| r.to_string())
            .unwrap_or_else(|| "—".to_string());
        let summary = format!(
            "★ {} ({}) • {}",
            rating,
            details.user_ratings_total.unwrap_or(0),
            price_symbols(details.price_level)
        );

        DetailsView {
            title: details
                .name
                .clone()
                .or_else(|| fallback_name.map(str::to_string))
                .unwrap_or_else(|| "Details".to_string()),
            available: true,
            message: None,
            address: details.formatted_address.unwrap_or_default(),
            summary,
            phone: details.formatted_phone_number.unwrap_or_default(),
            website: details.website,
            hours: details.weekday_text,
            photos,
            reviews: details
                .reviews
                .iter()
                .take(DETAILS_REVIEW_LIMIT)
                .map(summarize_review)
                .collect(),
        }
    }

    pub async fn mini_tags(&self, place_id: &str) -> Vec<String> {
        if let Some(tags) = self.tags.read().await.get(place_id) {
            return tags.clone();
        }

        let tags = match self.places.place_details(place_id, &DetailField::TAGS).await {
            Some(details) => mini_tags(&details.reviews),
            None => return Vec::new(),
        };

        debug!("Derived {} tags for {}", tags.len(), place_id);
        self.tags
            .write()
            .await
            .entry(place_id.to_string())
            .or_insert(tags)
            .clone()
    }

    /// First photo from a details lookup, for results that came without one.
    pub async fn photo(&self, place_id: &str) -> String {
        self.places
            .place_details(place_id, &DetailField::PHOTOS)
            .await
            .and_then(|d| d.photo_refs.into_iter().next())
            .and_then(|r| self.places.photo_url(&r, LOOKUP_PHOTO_WIDTH, LOOKUP_PHOTO_HEIGHT))
            .unwrap_or_else(|| FALLBACK_PHOTO_URL.to_string())
    }
}
