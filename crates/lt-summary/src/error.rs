//! Summary client error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("unsupported AI provider '{0}' (expected openai or anthropic)")]
    UnsupportedProvider(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("provider response had no text content")]
    EmptyResponse,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SummaryResult<T> = Result<T, SummaryError>;
