pub mod app;
pub mod config;
pub mod connectivity;
pub mod constants;
pub mod details;
pub mod error;
pub mod geolocation;
pub mod logging;
pub mod models;
pub mod places;
pub mod presentation;
pub mod routes;
pub mod search;
pub mod storage;
pub mod utils;

#[cfg(test)]
pub mod test_utils;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
