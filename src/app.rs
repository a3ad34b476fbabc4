use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, warn};

use crate::config::Config;
use crate::connectivity::Connectivity;
use crate::details::PlaceInfoService;
use crate::geolocation::StaticGeolocation;
use crate::logging::request_logger;
use crate::places::{GooglePlacesClient, PlacesError, PlacesService};
use crate::routes::api_router;
use crate::search::{SearchPipeline, SearchSession};
use crate::storage::{FileStore, KeyValueStore, MemoryStore, SnapshotCache};
use crate::utils::geo::Haversine;
use crate::VERSION;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub session: Arc<SearchSession>,
    pub details: Arc<PlaceInfoService>,
}

impl AppState {
    pub fn from_config(config: Arc<Config>) -> Result<Self, PlacesError> {
        let client = GooglePlacesClient::new(&config.places)?;
        if !client.has_api_key() {
            error!("No Places API key configured, searches will come back empty");
        }
        let places: Arc<dyn PlacesService> = Arc::new(client);

        let cache = if config.cache.enabled {
            let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&config.cache.directory));
            SnapshotCache::new(store)
        } else {
            SnapshotCache::disabled(Arc::new(MemoryStore::new()))
        };

        let pipeline = Arc::new(SearchPipeline::new(
            Arc::clone(&places),
            Arc::new(Haversine),
            cache,
            Connectivity::default(),
        ));
        let session = Arc::new(SearchSession::new(
            pipeline,
            Arc::new(StaticGeolocation::new(config.location.fixed)),
            &config.search,
        ));

        Ok(Self {
            details: Arc::new(PlaceInfoService::new(places)),
            session,
            config,
        })
    }
}

#[derive(Serialize)]
struct HealthcheckResponse {
    status: String,
    version: String,
    online: bool,
}

async fn healthcheck(State(state): State<AppState>) -> Json<HealthcheckResponse> {
    Json(HealthcheckResponse {
        status: "healthy".to_string(),
        version: VERSION.to_string(),
        online: state.session.is_online(),
    })
}

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/healthcheck", get(healthcheck))
        .merge(api_router());

    let mut app = Router::new()
        .nest("/api/v1", api_routes)
        .layer(middleware::from_fn(request_logger))
        .layer(cors)
        .with_state(state);

    // Serve the map front-end if it has been built
    let static_dir = std::env::var("CAFE_FINDER_STATIC_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("../web/dist"));

    if static_dir.exists() {
        app = app.fallback(move |req: Request<Body>| serve_frontend(static_dir.clone(), req));
    }

    app
}

// Only plain segments, so nothing resolves outside `static_dir`
fn resolve_static_path(static_dir: &Path, request_path: &str) -> Option<PathBuf> {
    let relative = Path::new(request_path.strip_prefix('/').unwrap_or(request_path));
    if !relative
        .components()
        .all(|component| matches!(component, Component::Normal(_)))
    {
        return None;
    }
    Some(static_dir.join(relative))
}

async fn serve_frontend(static_dir: PathBuf, req: Request<Body>) -> Response {
    let path = req.uri().path();

    if path.trim_start_matches('/').starts_with("api/") {
        return (StatusCode::NOT_FOUND, "Not Found").into_response();
    }

    let Some(file_path) = resolve_static_path(&static_dir, path) else {
        warn!("Rejected static path outside the front-end: {}", path);
        return (StatusCode::NOT_FOUND, "Not Found").into_response();
    };

    if file_path.is_file() {
        return serve_static_file(file_path).await;
    }

    let index_path = static_dir.join("index.html");
    if index_path.exists() {
        return serve_static_file(index_path).await;
    }

    (StatusCode::NOT_FOUND, "Not Found").into_response()
}

async fn serve_static_file(path: PathBuf) -> Response {
    match tokio::fs::read(&path).await {
        Ok(contents) => {
            let mime_type = mime_guess::from_path(&path)
                .first_or_octet_stream()
                .to_string();

            ([(header::CONTENT_TYPE, mime_type)], contents).into_response()
        }
        Err(_) => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}
