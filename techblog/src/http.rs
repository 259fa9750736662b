use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::{config::ClientConfig, interceptor::Interceptor, Error, ResponseError, Result, StdResult};
use std::{collections::HashMap, fmt, sync::Arc};
use url::Url;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Method(reqwest::Method);

impl Method {
    pub const GET: Method = Method(reqwest::Method::GET);
    pub const POST: Method = Method(reqwest::Method::POST);
    pub const PUT: Method = Method(reqwest::Method::PUT);
    pub const DELETE: Method = Method(reqwest::Method::DELETE);

    pub fn from_bytes(s: &[u8]) -> Result<Self> {
        reqwest::Method::from_bytes(s)
            .map(Method)
            .map_err(|_| Error::InvalidRequest(format!("invalid method: {:?}", s)))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub(self) fn into_inner(self) -> reqwest::Method {
        self.0
    }
}

impl AsRef<str> for Method {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<reqwest::Method> for Method {
    fn from(method: reqwest::Method) -> Self {
        Method(method)
    }
}

impl Serialize for Method {
    fn serialize<S>(&self, serializer: S) -> StdResult<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.as_str().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Method {
    fn deserialize<D>(deserializer: D) -> StdResult<Method, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Method::from_bytes(s.as_bytes()).map_err(serde::de::Error::custom)
    }
}

/// A call to be made relative to the client's base address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpRequest {
    pub path: String,
    #[serde(default)]
    pub method: Method,
    /// Overrides for the client's default headers.
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub body: Vec<u8>,
}

impl HttpRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn json<B>(mut self, body: &B) -> Result<Self>
    where
        B: Serialize + ?Sized,
    {
        self.body = serde_json::to_vec(body).map_err(Error::Serialize)?;
        Ok(self)
    }
}

/// Uniform entry point for the blog API.
///
/// Successful calls yield the decoded body only. Failures come back as the
/// [`Error`] produced by the transport or by a non-2xx status, after every
/// interceptor's [`Interceptor::on_error`] has seen them.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    config: Arc<ClientConfig>,
    default_headers: HeaderMap,
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .field("interceptors", &self.interceptors.len())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        Url::parse(&config.base_address)
            .map_err(|e| Error::InvalidUrl(format!("{} for {}", e, config.base_address)))?;
        let mut default_headers = HeaderMap::new();
        for (name, value) in config.default_headers.iter() {
            let (name, value) = parse_header(name, value)?;
            default_headers.insert(name, value);
        }
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;
        Ok(Self {
            client,
            config: Arc::new(config),
            default_headers,
            interceptors: Vec::new(),
        })
    }

    /// Interceptors run in the order they were added.
    pub fn with_interceptor(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub async fn get<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.request(HttpRequest::get(path)).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = HttpRequest::post(path).json(body);
        match request {
            Ok(request) => self.request(request).await,
            Err(e) => Err(self.fail(e)),
        }
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = HttpRequest::put(path).json(body);
        match request {
            Ok(request) => self.request(request).await,
            Err(e) => Err(self.fail(e)),
        }
    }

    pub async fn delete<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.request(HttpRequest::delete(path)).await
    }

    #[instrument(skip(self, request), fields(method = request.method.as_str(), path = %request.path))]
    pub async fn request<T>(&self, request: HttpRequest) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.execute(request)
            .await
            .and_then(|body| decode(&body))
            .map_err(|e| self.fail(e))
    }

    async fn execute(&self, request: HttpRequest) -> Result<Bytes> {
        let request = self
            .interceptors
            .iter()
            .try_fold(request, |request, interceptor| interceptor.on_request(request))?;
        let url = self.resolve_url(&request.path)?;
        let headers = self.merge_headers(&request.headers)?;
        debug!("dispatching {} {}", request.method.as_str(), url);

        let mut builder = self
            .client
            .request(request.method.into_inner(), url)
            .headers(headers);
        if !request.body.is_empty() {
            builder = builder.body(request.body);
        }
        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(ResponseError::new(status, &body).into());
        }
        debug!("received {} ({} bytes)", status, body.len());
        self.interceptors
            .iter()
            .try_fold(body, |body, interceptor| interceptor.on_response(status, body))
    }

    fn fail(&self, error: Error) -> Error {
        warn!("request failed: {}", error);
        self.interceptors
            .iter()
            .fold(error, |error, interceptor| interceptor.on_error(error))
    }

    fn resolve_url(&self, path: &str) -> Result<Url> {
        let base = self.config.base_address.as_str();
        if path.starts_with("//") {
            return Url::parse(base)
                .and_then(|base| base.join(path))
                .map_err(|e| Error::InvalidUrl(format!("{} for {}", e, path)));
        }
        let url = if has_scheme(path) {
            path.to_string()
        } else if path.is_empty() {
            base.to_string()
        } else {
            format!(
                "{}/{}",
                base.trim_end_matches('/'),
                path.trim_start_matches('/')
            )
        };
        Url::parse(&url).map_err(|e| Error::InvalidUrl(format!("{} for {}", e, url)))
    }

    fn merge_headers(&self, overrides: &HashMap<String, String>) -> Result<HeaderMap> {
        let mut headers = self.default_headers.clone();
        for (name, value) in overrides.iter() {
            let (name, value) = parse_header(name, value)?;
            headers.insert(name, value);
        }
        Ok(headers)
    }
}

fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue)> {
    let header_name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| Error::InvalidHeader(format!("{} for {}", e, name)))?;
    let header_value = HeaderValue::from_str(value)
        .map_err(|e| Error::InvalidHeader(format!("{} for {}", e, name)))?;
    Ok((header_name, header_value))
}

// `scheme://...`, where a scheme starts with a letter followed by letters,
// digits, `+`, `-` or `.`.
fn has_scheme(path: &str) -> bool {
    match path.split_once("://") {
        Some((scheme, _)) => {
            let mut chars = scheme.chars();
            chars.next().is_some_and(|c| c.is_ascii_alphabetic())
                && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

/// Empty bodies decode as `null`; bodies that are not JSON decode as a string.
fn decode<T>(body: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    let value = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(body).unwrap_or_else(|_| {
            serde_json::Value::String(String::from_utf8_lossy(body).into_owned())
        })
    };
    serde_json::from_value(value).map_err(Error::Decode)
}
