use thiserror::Error;

use crate::runtime::Phase;

/// Errors surfaced by host operations and lifecycle transitions.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Precache of {url} failed with status {status}")]
    Precache { url: String, status: u16 },

    #[error("Client error: {0}")]
    Clients(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid state: expected {expected:?}, found {found:?}")]
    InvalidState { expected: Phase, found: Phase },
}
