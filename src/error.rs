use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("No data block found for: {0}")]
    EntityNotFound(String),

    #[error("No header column matching '{0}'")]
    ColumnNotFound(String),

    #[error("No value in column '{0}' for the requested period")]
    ValueNotFound(String),

    #[error("Datasets are still loading")]
    DataNotReady,

    #[error("Completion endpoint error: {0}")]
    ExternalService(String),

    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "groq")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl AssistantError {
    /// Recoverable lookup misses: the caller can ask the user to clarify
    /// instead of failing the turn.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AssistantError::EntityNotFound(_)
                | AssistantError::ColumnNotFound(_)
                | AssistantError::ValueNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, AssistantError>;
