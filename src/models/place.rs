use serde::{Deserialize, Serialize};

use super::Coordinate;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceResult {
    pub place_id: Option<String>,
    pub name: String,
    pub vicinity: Option<String>,
    pub formatted_address: Option<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u32>,
    pub price_level: Option<u8>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub photo_refs: Vec<String>,
    pub open_now: Option<bool>,
    pub location: Option<Coordinate>,
    pub distance_meters: Option<f64>,
}

impl PlaceResult {
    pub fn address(&self) -> Option<&str> {
        self.vicinity
            .as_deref()
            .or(self.formatted_address.as_deref())
    }

    pub fn has_type(&self, tag: &str) -> bool {
        self.types.iter().any(|t| t == tag)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub author_name: Option<String>,
    pub rating: Option<f64>,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDetails {
    pub place_id: Option<String>,
    pub name: Option<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u32>,
    pub formatted_address: Option<String>,
    pub formatted_phone_number: Option<String>,
    pub website: Option<String>,
    #[serde(default)]
    pub weekday_text: Vec<String>,
    #[serde(default)]
    pub photo_refs: Vec<String>,
    pub price_level: Option<u8>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetailField {
    Name,
    Rating,
    UserRatingsTotal,
    FormattedAddress,
    FormattedPhoneNumber,
    Website,
    OpeningHours,
    Photos,
    PriceLevel,
    Reviews,
    Types,
}

impl DetailField {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetailField::Name => "name",
            DetailField::Rating => "rating",
            DetailField::UserRatingsTotal => "user_ratings_total",
            DetailField::FormattedAddress => "formatted_address",
            DetailField::FormattedPhoneNumber => "formatted_phone_number",
            DetailField::Website => "website",
            DetailField::OpeningHours => "opening_hours",
            DetailField::Photos => "photos",
            DetailField::PriceLevel => "price_level",
            DetailField::Reviews => "reviews",
            DetailField::Types => "types",
        }
    }

    pub const MODAL: [DetailField; 10] = [
        DetailField::Name,
        DetailField::Rating,
        DetailField::UserRatingsTotal,
        DetailField::FormattedAddress,
        DetailField::FormattedPhoneNumber,
        DetailField::Website,
        DetailField::OpeningHours,
        DetailField::Photos,
        DetailField::PriceLevel,
        DetailField::Reviews,
    ];

    pub const TAGS: [DetailField; 2] = [DetailField::Reviews, DetailField::Types];

    pub const PHOTOS: [DetailField; 1] = [DetailField::Photos];
}
