use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Configuration(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("No user record found for the given identifier")]
    UserNotFound,
    #[error("Backend responded with status {status}: {code}")]
    Backend { status: u16, code: String },
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
    #[error("HTTP request failed: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    pub(crate) fn invalid<S: Into<String>>(message: S) -> Self {
        Error::InvalidArgument(message.into())
    }
}
