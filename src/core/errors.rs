use thiserror::Error;

#[derive(Error, Debug)]
pub enum TorchLearnError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Reqwest error: {0}")]
    Reqwest(Box<reqwest::Error>),

    #[error("No API key found (set GEMINI_API_KEY or API_KEY)")]
    MissingApiKey,

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("No data returned from the card service")]
    EmptyResponse,

    #[error("TorchLearnError: {0}")]
    Custom(String),
}

impl From<std::io::Error> for TorchLearnError {
    fn from(error: std::io::Error) -> Self {
        TorchLearnError::Io(Box::new(error))
    }
}

impl From<reqwest::Error> for TorchLearnError {
    fn from(error: reqwest::Error) -> Self {
        TorchLearnError::Reqwest(Box::new(error))
    }
}
