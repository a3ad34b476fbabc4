use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::app::AppState;
use crate::error::AppResult;
use crate::geolocation::GeolocationError;
use crate::models::{ConnectivityRequest, ConnectivityResponse, LocateRequest, LocateResponse};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/connectivity", get(connectivity).post(set_connectivity))
        .route("/locate", post(locate))
}

async fn connectivity(State(state): State<AppState>) -> Json<ConnectivityResponse> {
    Json(ConnectivityResponse {
        online: state.session.is_online(),
    })
}

async fn set_connectivity(
    State(state): State<AppState>,
    Json(request): Json<ConnectivityRequest>,
) -> Json<ConnectivityResponse> {
    state.session.set_online(request.online);
    Json(ConnectivityResponse {
        online: state.session.is_online(),
    })
}

async fn locate(
    State(state): State<AppState>,
    request: Option<Json<LocateRequest>>,
) -> AppResult<Json<LocateResponse>> {
    let Json(request) = request.unwrap_or_default();

    let location = match (request.error_code, request.position) {
        (Some(code), _) => {
            state
                .session
                .report_position(Err(GeolocationError::from_code(code)))
                .await?
        }
        (None, Some(position)) => state.session.report_position(Ok(position)).await?,
        (None, None) => state.session.locate().await?,
    };

    Ok(Json(LocateResponse { location }))
}
