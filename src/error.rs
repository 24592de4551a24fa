use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("no access token available")]
    MissingToken,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("authorization failed: {0}")]
    AuthorizationFailed(String),

    #[error("callback state mismatch: expected {expected}, received {received}")]
    StateMismatch { expected: String, received: String },

    #[error("token belongs to client {received}, expected {expected}")]
    ClientIdMismatch { expected: String, received: String },

    #[error("callback arrived on unexpected path: {0}")]
    UnexpectedCallbackPath(String),

    #[error("malformed token response: {0}")]
    MalformedTokenResponse(String),
}

pub type Result<T> = std::result::Result<T, Error>;
