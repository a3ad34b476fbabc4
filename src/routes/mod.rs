mod device;
mod places;
mod search;

use axum::Router;
use crate::app::AppState;

pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(search::router())
        .merge(places::router())
        .merge(device::router())
}
