use thiserror::Error;

/// Failures surfaced across crate boundaries.
///
/// None of these are fatal to the process; every variant is scoped to one
/// session or one call. Locally-recovered conditions (insufficient indicator
/// history, rejected virtual trades) are deliberately not represented here;
/// they are handled where they occur and never cross a boundary as errors.
#[derive(Debug, Error)]
pub enum Error {
    #[error("feed error: {0}")]
    Feed(String),

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
