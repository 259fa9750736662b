use bytes::Bytes;
use reqwest::StatusCode;

use crate::{http::HttpRequest, Error, Result};

/// Extension points around every call made through an [`ApiClient`].
///
/// Every method defaults to passing its input through untouched, so an
/// implementation only overrides the stage it cares about.
///
/// [`ApiClient`]: crate::http::ApiClient
pub trait Interceptor: Send + Sync {
    /// Runs before dispatch. Returning an error aborts the call.
    fn on_request(&self, request: HttpRequest) -> Result<HttpRequest> {
        Ok(request)
    }

    /// Runs on a 2xx body before it is decoded.
    fn on_response(&self, _status: StatusCode, body: Bytes) -> Result<Bytes> {
        Ok(body)
    }

    /// Runs on every failure before it reaches the caller.
    fn on_error(&self, error: Error) -> Error {
        error
    }
}

impl<F> Interceptor for F
where
    F: Fn(HttpRequest) -> Result<HttpRequest> + Send + Sync,
{
    fn on_request(&self, request: HttpRequest) -> Result<HttpRequest> {
        self(request)
    }
}
