use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("Response error: {0}")]
    Response(#[from] ResponseError),

    #[error("Invalid url: {0}")]
    InvalidUrl(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Failed to serialize request body: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Invalid client configuration: {0}")]
    Config(String),

    #[error("Rejected by interceptor: {0}")]
    Interceptor(String),
}

impl Error {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }

    /// Status code of a non-2xx response, if this error carries one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Response(e) => Some(e.status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Error::Timeout(e)
        } else {
            Error::Transport(e)
        }
    }
}

/// A response that came back with a non-2xx status.
#[derive(Debug, thiserror::Error)]
#[error("server returned {status}")]
pub struct ResponseError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ResponseError {
    pub fn new(status: StatusCode, body: &[u8]) -> Self {
        Self {
            status,
            body: ErrorBody::from_bytes(body),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    Json(serde_json::Value),
    Text(String),
    Empty,
}

impl ErrorBody {
    pub fn from_bytes(body: &[u8]) -> Self {
        if body.is_empty() {
            return ErrorBody::Empty;
        }
        match serde_json::from_slice(body) {
            Ok(value) => ErrorBody::Json(value),
            Err(_) => ErrorBody::Text(String::from_utf8_lossy(body).into_owned()),
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            ErrorBody::Json(value) => Some(value),
            _ => None,
        }
    }
}

#[cfg(feature = "date")]
#[derive(Debug, thiserror::Error)]
pub enum DateError {
    #[error("Invalid date: {0}")]
    Invalid(String),
}

pub type StdResult<T, E> = std::result::Result<T, E>;

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(feature = "date")]
pub type DateResult<T> = std::result::Result<T, DateError>;
