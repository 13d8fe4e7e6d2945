use thiserror::Error;

#[derive(Error, Debug)]
pub enum NewsMapError {
    #[error("Session not found or expired")]
    SessionNotFound,

    #[error("Location '{0}' not found")]
    LocationNotFound(String),

    #[error("Invalid coordinates: lat={lat}, lng={lng}")]
    InvalidCoordinates { lat: f64, lng: f64 },

    #[error("Current round already resolved")]
    RoundAlreadyResolved,

    #[error("Current round not yet resolved")]
    RoundNotResolved,

    #[error("Game already completed")]
    GameAlreadyComplete,

    #[error("Game not yet completed")]
    GameNotComplete,

    #[error("Need at least {needed} locations, but only {available} available")]
    InsufficientLocations { available: usize, needed: usize },

    #[error("No headline available from any provider")]
    HeadlinesUnavailable,

    #[error("Location dataset error: {0}")]
    Dataset(String),
}
