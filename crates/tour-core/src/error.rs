use thiserror::Error;

#[derive(Debug, Error)]
pub enum TourError {
    #[error("invalid tour status: {0}")]
    InvalidStatus(String),

    #[error("invalid tour mode: {0}")]
    InvalidMode(String),

    #[error("invalid role: {0}")]
    InvalidRole(String),

    #[error("invalid launch tag: {0}")]
    InvalidLaunchTag(String),

    #[error("invalid placement: {0}")]
    InvalidPlacement(String),

    #[error("invalid tour id '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidTourId(String),

    #[error("no tour registered for page: {0}")]
    UnknownPage(String),

    #[error("navigation to '{path}' failed: {reason}")]
    Navigation { path: String, reason: String },

    #[error("store error: {0}")]
    Store(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TourError>;
