use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IoError: {0}")]
    IoError(#[from] io::Error),
    #[error("Hyper error: {0}")]
    HyperError(#[from] hyper::Error),
    #[error("The status code {0} is invalid")]
    InvalidStatusCode(u16),
    #[error("Invalid header name: {0}")]
    InvalidHeaderName(#[from] hyper::header::InvalidHeaderName),
    #[error("Invalid header value: {0}")]
    InvalidHeaderValue(#[from] hyper::header::InvalidHeaderValue),
    #[error("Invalid body in request #{index}: {reason}")]
    InvalidBody { index: usize, reason: String },
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("The path template has no value for {{{0}}}")]
    UnresolvedPlaceholder(String),
    #[error("The echo server thread exited before it was ready")]
    ServerExited,
    #[error("The echo server thread panicked")]
    ServerPanicked,
}
