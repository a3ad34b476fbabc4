//! Text shown on result cards, map markers and the details modal.

use crate::constants::{
    FALLBACK_PHOTO_URL, MAX_MINI_TAGS, REVIEW_SUMMARY_MAX_CHARS, TAG_REVIEW_LIMIT,
};
use crate::models::{Coordinate, MarkerView, PlaceCard, PlaceResult, Review, ReviewSummary};
use crate::places::PlacesService;

const CARD_PHOTO_WIDTH: u32 = 600;
const CARD_PHOTO_HEIGHT: u32 = 400;
const PLACEHOLDER: &str = "—";

pub fn format_distance(meters: Option<f64>) -> String {
    match meters {
        Some(m) if m < 1000.0 => format!("{} m", m.round()),
        Some(m) => format!("{:.1} km", m / 1000.0),
        None => String::new(),
    }
}

/// One rupee sign per price level. Level 0 is empty and an unknown level is a
/// dash. Marker and details summaries use this form.
pub fn price_symbols(level: Option<u8>) -> String {
    match level {
        Some(level) => "₹".repeat(level as usize),
        None => PLACEHOLDER.to_string(),
    }
}

/// Card form: never empty, so level 0 shows a dash too.
pub fn price_text(level: Option<u8>) -> String {
    match price_symbols(level) {
        symbols if symbols.is_empty() => PLACEHOLDER.to_string(),
        symbols => symbols,
    }
}

pub fn rating_text(rating: Option<f64>) -> String {
    rating
        .map(|r| format!("{r:.1}"))
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

pub fn star_text(rating: Option<f64>) -> String {
    let rating = match rating {
        Some(r) if r > 0.0 => r.min(5.0),
        _ => return "☆".repeat(5),
    };

    let full = rating.floor() as usize;
    let half = usize::from(rating.fract() >= 0.5);
    let empty = 5usize.saturating_sub(full + half);

    format!("{}{}{}", "★".repeat(full), "☆".repeat(half), "☆".repeat(empty))
}

pub fn badge(place: &PlaceResult) -> &'static str {
    if place.has_type("restaurant") {
        "Restaurant"
    } else {
        "Cafe"
    }
}

pub fn maps_url(name: &str, place_id: Option<&str>) -> String {
    let mut params = vec![("api", "1"), ("query", name)];
    if let Some(id) = place_id {
        params.push(("query_place_id", id));
    }
    reqwest::Url::parse_with_params("https://www.google.com/maps/search/", &params)
        .map(|url| url.to_string())
        .unwrap_or_default()
}

pub fn directions_url(origin: Coordinate, destination: Coordinate) -> String {
    format!(
        "https://www.google.com/maps/dir/?api=1&origin={},{}&destination={},{}&travelmode=walking",
        origin.lat, origin.lng, destination.lat, destination.lng
    )
}

pub fn primary_photo_url(place: &PlaceResult, places: &dyn PlacesService) -> String {
    place
        .photo_refs
        .first()
        .and_then(|r| places.photo_url(r, CARD_PHOTO_WIDTH, CARD_PHOTO_HEIGHT))
        .unwrap_or_else(|| FALLBACK_PHOTO_URL.to_string())
}

pub fn place_card(place: &PlaceResult, origin: Option<Coordinate>, places: &dyn PlacesService) -> PlaceCard {
    let name = if place.name.is_empty() {
        "Cafe".to_string()
    } else {
        place.name.clone()
    };

    PlaceCard {
        place_id: place.place_id.clone(),
        maps_url: maps_url(&place.name, place.place_id.as_deref()),
        name,
        address: place.address().unwrap_or_default().to_string(),
        distance_meters: place.distance_meters,
        distance_text: format_distance(place.distance_meters),
        rating: place.rating,
        rating_text: rating_text(place.rating),
        stars: star_text(place.rating),
        price_text: price_text(place.price_level),
        open_now: place.open_now.unwrap_or(false),
        badge: badge(place).to_string(),
        photo_url: primary_photo_url(place, places),
        directions_url: origin
            .zip(place.location)
            .map(|(from, to)| directions_url(from, to)),
        location: place.location,
    }
}

/// Markers for the first `limit` places that have geometry.
pub fn marker_views(places: &[PlaceResult], limit: usize) -> Vec<MarkerView> {
    places
        .iter()
        .take(limit)
        .filter_map(|place| {
            let position = place.location?;
            Some(MarkerView {
                place_id: place.place_id.clone(),
                title: place.name.clone(),
                position,
                address: place.address().unwrap_or_default().to_string(),
                summary: format!(
                    "★ {} • {}",
                    rating_text(place.rating),
                    price_symbols(place.price_level)
                ),
            })
        })
        .collect()
}

pub fn summarize_review(review: &Review) -> ReviewSummary {
    let text = review.text.split('\n').collect::<Vec<_>>().join(" ");
    let text = if text.chars().count() > REVIEW_SUMMARY_MAX_CHARS {
        let head: String = text.chars().take(REVIEW_SUMMARY_MAX_CHARS - 3).collect();
        format!("{head}…")
    } else {
        text
    };

    ReviewSummary {
        author: review
            .author_name
            .clone()
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| "Anonymous".to_string()),
        rating: review.rating,
        text,
    }
}

const TAG_RULES: [(&str, &[&str]); 4] = [
    ("must-try item", &["biryani", "pizza", "burger", "coffee"]),
    ("good food", &["taste", "tasty", "delicious", "yummy"]),
    ("good vibe", &["ambience", "vibe", "cozy", "music"]),
    ("friendly service", &["service", "staff", "friendly"]),
];

/// Short tags derived from keywords in the most recent reviews.
pub fn mini_tags(reviews: &[Review]) -> Vec<String> {
    let texts: Vec<String> = reviews
        .iter()
        .take(TAG_REVIEW_LIMIT)
        .map(|r| r.text.to_lowercase())
        .collect();

    TAG_RULES
        .iter()
        .filter(|(_, words)| texts.iter().any(|t| words.iter().any(|w| t.contains(w))))
        .map(|(tag, _)| tag.to_string())
        .take(MAX_MINI_TAGS)
        .collect()
}
