use async_trait::async_trait;
use thiserror::Error;

use crate::models::Coordinate;

const LOCATION_PREFIX: &str = "Unable to get your location. ";

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeolocationError {
    #[error("permission denied")]
    PermissionDenied,
    #[error("position unavailable")]
    PositionUnavailable,
    #[error("timed out")]
    Timeout,
    #[error("geolocation not supported")]
    Unsupported,
    #[error("unknown error")]
    Unknown,
}

impl GeolocationError {
    /// Browser `GeolocationPositionError.code` values.
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => GeolocationError::PermissionDenied,
            2 => GeolocationError::PositionUnavailable,
            3 => GeolocationError::Timeout,
            _ => GeolocationError::Unknown,
        }
    }

    pub fn user_message(&self) -> String {
        let cause = match self {
            GeolocationError::PermissionDenied => {
                "Please allow location access in your browser settings."
            }
            GeolocationError::PositionUnavailable => "Location information is unavailable.",
            GeolocationError::Timeout => "Location request timed out.",
            GeolocationError::Unsupported => {
                return "Geolocation is not supported in this browser.".to_string()
            }
            GeolocationError::Unknown => "An unknown error occurred.",
        };
        format!("{LOCATION_PREFIX}{cause}")
    }
}

#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    async fn current_position(&self) -> Result<Coordinate, GeolocationError>;
}

/// Position taken from configuration; absent means the position is unavailable.
#[derive(Debug, Clone, Default)]
pub struct StaticGeolocation {
    position: Option<Coordinate>,
}

impl StaticGeolocation {
    pub fn new(position: Option<Coordinate>) -> Self {
        Self { position }
    }
}

#[async_trait]
impl GeolocationProvider for StaticGeolocation {
    async fn current_position(&self) -> Result<Coordinate, GeolocationError> {
        match self.position {
            Some(position) if position.is_valid() => Ok(position),
            Some(_) => Err(GeolocationError::Unknown),
            None => Err(GeolocationError::PositionUnavailable),
        }
    }
}
