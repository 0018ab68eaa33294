use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Settings error: {0}")]
    Settings(String),
}

/// Failure talking to the rendering service.
///
/// `Display` yields the message meant for the user: for server errors that is
/// the `error` field of the response body (or a generic status line), never
/// the raw HTTP status.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("{0}")]
    Network(String),

    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Malformed response from render service: {0}")]
    MalformedResponse(String),
}

impl RenderError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Convenience type alias for Results with AppError
pub type Result<T> = std::result::Result<T, AppError>;
