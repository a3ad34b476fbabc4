use axum::{extract::State, routing::post, Json, Router};
use validator::Validate;

use crate::app::AppState;
use crate::error::AppResult;
use crate::models::{DetailsView, PhotoResponse, PlaceIdRequest, TagsResponse};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/place/details", post(place_details))
        .route("/place/tags", post(place_tags))
        .route("/place/photo", post(place_photo))
}

async fn place_details(
    State(state): State<AppState>,
    Json(request): Json<PlaceIdRequest>,
) -> AppResult<Json<DetailsView>> {
    request.validate()?;

    let view = state
        .details
        .details_view(&request.place_id, request.name.as_deref())
        .await;

    Ok(Json(view))
}

async fn place_tags(
    State(state): State<AppState>,
    Json(request): Json<PlaceIdRequest>,
) -> AppResult<Json<TagsResponse>> {
    request.validate()?;

    let tags = state.details.mini_tags(&request.place_id).await;

    Ok(Json(TagsResponse {
        place_id: request.place_id,
        tags,
    }))
}

async fn place_photo(
    State(state): State<AppState>,
    Json(request): Json<PlaceIdRequest>,
) -> AppResult<Json<PhotoResponse>> {
    request.validate()?;

    let url = state.details.photo(&request.place_id).await;

    Ok(Json(PhotoResponse {
        place_id: request.place_id,
        url,
    }))
}
