use crate::transform::TransformParseError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid dataset: {message}")]
    InvalidDataset { message: String },

    #[error("Invalid chart options: {message}")]
    InvalidOptions { message: String },

    #[error(transparent)]
    TransformParse(#[from] TransformParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_dataset(message: impl Into<String>) -> Self {
        Self::InvalidDataset {
            message: message.into(),
        }
    }
}
