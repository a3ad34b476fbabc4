use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use validator::Validate;

use crate::app::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{
    AreaSearchRequest, CachedSnapshot, CategoryRequest, Coordinate, PlaceSelectionRequest,
    QueryInputRequest, SearchFilters, SearchRequest, SearchResponse,
};
use crate::presentation::{marker_views, place_card};
use crate::search::SearchView;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/search", post(search))
        .route("/search/input", post(query_input))
        .route("/search/filters", post(update_filters))
        .route("/search/category", post(select_category))
        .route("/search/area", post(search_area))
        .route("/search/place", post(select_place))
        .route("/results", get(last_results))
        .route("/snapshot", get(snapshot))
}

fn render(state: &AppState, view: SearchView) -> SearchResponse {
    let places = state.session.pipeline().places();
    let results = view
        .results
        .iter()
        .map(|place| place_card(place, view.origin, places.as_ref()))
        .collect::<Vec<_>>();

    SearchResponse {
        count: results.len(),
        offline: view.offline,
        origin: view.origin,
        markers: marker_views(&view.results, state.config.search.max_markers),
        results,
    }
}

fn check_location(location: Option<Coordinate>) -> AppResult<()> {
    match location {
        Some(c) if !c.is_valid() => Err(AppError::BadRequest(format!(
            "Invalid coordinate {},{}",
            c.lat, c.lng
        ))),
        _ => Ok(()),
    }
}

async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> AppResult<Json<SearchResponse>> {
    request.validate()?;
    check_location(request.location)?;

    state.session.apply(&request).await;
    let view = state.session.search_now(request.location).await;

    Ok(Json(render(&state, view)))
}

async fn query_input(
    State(state): State<AppState>,
    Json(request): Json<QueryInputRequest>,
) -> StatusCode {
    state.session.on_query_input(request.query).await;
    StatusCode::ACCEPTED
}

async fn update_filters(
    State(state): State<AppState>,
    Json(filters): Json<SearchFilters>,
) -> AppResult<Json<SearchResponse>> {
    filters.validate()?;
    let view = state.session.update_filters(filters).await;
    Ok(Json(render(&state, view)))
}

async fn select_category(
    State(state): State<AppState>,
    Json(request): Json<CategoryRequest>,
) -> AppResult<Json<SearchResponse>> {
    let view = state
        .session
        .select_category(request.query, request.category_type)
        .await;
    Ok(Json(render(&state, view)))
}

async fn search_area(
    State(state): State<AppState>,
    Json(request): Json<AreaSearchRequest>,
) -> AppResult<Json<SearchResponse>> {
    check_location(Some(request.center))?;
    let view = state
        .session
        .search_area(request.center, request.viewport)
        .await;
    Ok(Json(render(&state, view)))
}

async fn select_place(
    State(state): State<AppState>,
    Json(request): Json<PlaceSelectionRequest>,
) -> AppResult<Json<SearchResponse>> {
    check_location(request.location)?;
    let view = state
        .session
        .select_place(request.location, request.viewport)
        .await;
    Ok(Json(render(&state, view)))
}

async fn last_results(State(state): State<AppState>) -> Json<SearchResponse> {
    let view = state.session.last_view().await;
    Json(render(&state, view))
}

async fn snapshot(State(state): State<AppState>) -> AppResult<Json<CachedSnapshot>> {
    state
        .session
        .cached_snapshot()
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No cached results".to_string()))
}
