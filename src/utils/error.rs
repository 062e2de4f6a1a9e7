use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Navigation error: {0}")]
    Navigation(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parsing error: {message}")]
    Parse { message: String },
}

impl AppError {
    pub fn navigation(message: impl Into<String>) -> Self {
        AppError::Navigation(message.into())
    }

    pub fn extraction(message: impl Into<String>) -> Self {
        AppError::Extraction(message.into())
    }

    pub fn session(message: impl Into<String>) -> Self {
        AppError::Session(message.into())
    }

    /// Violations carried by a validation failure, empty for every other kind.
    pub fn details(&self) -> &[String] {
        match self {
            AppError::Validation(details) => details,
            _ => &[],
        }
    }
}

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;
