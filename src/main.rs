use cafe_finder_api::app::{create_app, AppState};
use cafe_finder_api::config::{load_config, save_default_config};
use cafe_finder_api::constants::{CONFIG_PATH, DATA_DIR};
use cafe_finder_api::logging::{init_logging, install_panic_hook};
use std::sync::Arc;
use tracing::{error, info};

fn init_directories(config: &cafe_finder_api::config::Config) {
    for dir in [&*DATA_DIR, &config.cache.directory] {
        if let Err(e) = std::fs::create_dir_all(dir) {
            error!("Failed to create {:?}: {}", dir, e);
        }
    }
}

#[tokio::main]
async fn main() {
    if std::env::args().any(|arg| arg == "--init-config") {
        match save_default_config(&CONFIG_PATH) {
            Ok(_) => {
                println!("Default configuration saved to {:?}", *CONFIG_PATH);
                std::process::exit(0);
            }
            Err(e) => {
                eprintln!("Failed to save default configuration: {}", e);
                std::process::exit(1);
            }
        }
    }

    init_logging();
    install_panic_hook();

    let config = Arc::new(load_config(&CONFIG_PATH));
    init_directories(&config);

    let state = match AppState::from_config(Arc::clone(&config)) {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to build places client: {}", e);
            std::process::exit(1);
        }
    };

    // Initial locate and search, or the cached snapshot when offline
    let session = Arc::clone(&state.session);
    tokio::spawn(async move {
        let view = session.start().await;
        info!(
            "Startup search finished with {} results{}",
            view.results.len(),
            if view.offline { " (offline)" } else { "" }
        );
    });

    let app = create_app(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting cafe finder API on {}", addr);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server failed: {}", e);
        std::process::exit(1);
    }
}
