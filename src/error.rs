use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Submission not found: {0}")]
    SubmissionNotFound(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

impl RegistrationError {
    /// Both not-found cases are recoverable and rendered as a "not found" view.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RegistrationError::PageNotFound(_) | RegistrationError::SubmissionNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, RegistrationError>;
