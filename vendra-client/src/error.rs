use reqwest::StatusCode;

/// Failure taxonomy for marketplace calls.
///
/// `Transport` is a connection-level failure (refused, timeout, TLS),
/// `Status` is a completed exchange the marketplace rejected (non-2xx, with
/// whatever error body it sent), `Decode` is a data error in an otherwise
/// successful response, missing fields included.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("marketplace returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;
