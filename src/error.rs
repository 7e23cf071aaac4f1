use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Start date {start} must not be later than end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Please provide {missing} value")]
    MissingDateParameter { missing: &'static str },

    #[error("No rooms left for unit {unit_id} in the requested date range")]
    InsufficientCapacity { unit_id: u64 },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: u64 },

    #[error("Invalid parameters: {reason}")]
    InvalidParams { reason: String },

    #[error("Storage failure: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yml::Error),
}

impl BookingError {
    /// Stable reason code surfaced to callers alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidDateRange { .. } => "InvalidDateRange",
            Self::MissingDateParameter { .. } => "MissingDateParameter",
            Self::InsufficientCapacity { .. } => "InsufficientCapacity",
            Self::NotFound { .. } => "NotFound",
            Self::InvalidParams { .. } => "InvalidParams",
            Self::Storage(_) => "StorageFailure",
            Self::Config(_) => "ConfigError",
            Self::Io(_) => "IoError",
            Self::Json(_) => "JsonError",
            Self::Yaml(_) => "YamlError",
        }
    }

    /// Request-level validation failures, as opposed to storage or ambient failures.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidDateRange { .. }
                | Self::MissingDateParameter { .. }
                | Self::InsufficientCapacity { .. }
                | Self::NotFound { .. }
                | Self::InvalidParams { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, BookingError>;
