//! Request building and response unwrapping shared by all services

pub mod transport;

use std::sync::Arc;

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::config::ApiContext;
use crate::error::{TcError, TcResult};
use crate::models::{Envelope, empty_object};

pub use transport::{ApiRequest, ReqwestTransport, RequestBody, Transport};

pub const DEFAULT_RESULT_LIMIT: u32 = 500;

/// Paging, owner and include flags for listing calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    pub result_limit: u32,
    pub result_start: u32,
    pub owner: Option<String>,
    pub include_attributes: bool,
    pub include_tags: bool,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            result_limit: DEFAULT_RESULT_LIMIT,
            result_start: 0,
            owner: None,
            include_attributes: false,
            include_tags: false,
        }
    }
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn limit(mut self, result_limit: u32) -> Self {
        self.result_limit = result_limit;
        self
    }

    pub fn start(mut self, result_start: u32) -> Self {
        self.result_start = result_start;
        self
    }

    pub fn include_attributes(mut self) -> Self {
        self.include_attributes = true;
        self
    }

    pub fn include_tags(mut self) -> Self {
        self.include_tags = true;
        self
    }
}

/// Shared handle to the transport and the host environment.
///
/// Cheap to clone; every service holds one.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    context: Arc<dyn ApiContext>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, context: Arc<dyn ApiContext>) -> Self {
        Self { transport, context }
    }

    pub fn context(&self) -> &dyn ApiContext {
        self.context.as_ref()
    }

    /// Join the API base path, a registry URI and caller segments.
    ///
    /// Caller segments are percent-encoded, so an indicator value such as a URL
    /// stays a single path segment.
    pub fn endpoint(&self, uri: &str, segments: &[&str]) -> TcResult<Url> {
        let base = self.context.api_base_path();
        let mut url = Url::parse(&base).map_err(|source| TcError::InvalidBasePath {
            base: base.clone(),
            source,
        })?;

        if segments.iter().any(|s| s.is_empty()) || uri.split('/').any(str::is_empty) {
            return Err(TcError::InvalidPathSegment);
        }

        url.path_segments_mut()
            .map_err(|_| TcError::UnsupportedBasePath(base.clone()))?
            .pop_if_empty()
            .extend(uri.split('/'))
            .extend(segments);

        Ok(url)
    }

    /// Start a request carrying the current authorization token
    pub fn request(&self, method: Method, url: Url) -> RequestBuilder<'_> {
        let token = self.context.current_token();
        RequestBuilder::new(self, method, url)
            .header("Authorization", format!("TC-Token {}", token))
    }

    /// GET, unwrapping `data[data_key]` when a key is given
    pub async fn get(
        &self,
        url: Url,
        owner: Option<&str>,
        data_key: Option<&str>,
    ) -> TcResult<Value> {
        self.request_helper(Method::GET, url, owner, data_key, None).await
    }

    /// DELETE, returning the full body
    pub async fn delete(&self, url: Url, owner: Option<&str>) -> TcResult<Value> {
        self.request_helper(Method::DELETE, url, owner, None, None).await
    }

    /// POST, returning the full body
    pub async fn post(
        &self,
        url: Url,
        owner: Option<&str>,
        body: Option<Value>,
    ) -> TcResult<Value> {
        self.request_helper(Method::POST, url, owner, None, body).await
    }

    /// POST, unwrapping `data[data_key]`
    pub async fn post_with_data_key(
        &self,
        url: Url,
        owner: Option<&str>,
        data_key: &str,
        body: Option<Value>,
    ) -> TcResult<Value> {
        self.request_helper(Method::POST, url, owner, Some(data_key), body).await
    }

    /// PUT, unwrapping `data[data_key]`
    pub async fn put(
        &self,
        url: Url,
        owner: Option<&str>,
        data_key: &str,
        body: Option<Value>,
    ) -> TcResult<Value> {
        self.request_helper(Method::PUT, url, owner, Some(data_key), body).await
    }

    async fn request_helper(
        &self,
        method: Method,
        url: Url,
        owner: Option<&str>,
        data_key: Option<&str>,
        body: Option<Value>,
    ) -> TcResult<Value> {
        let mut request = self.request(method, url).owner(owner);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;

        Ok(match data_key {
            Some(key) => Envelope::from_body(response).into_field(key),
            None => response,
        })
    }
}

/// Builder for a single API request
pub struct RequestBuilder<'a> {
    client: &'a ApiClient,
    request: ApiRequest,
    lenient: bool,
}

impl<'a> RequestBuilder<'a> {
    fn new(client: &'a ApiClient, method: Method, url: Url) -> Self {
        Self {
            client,
            request: ApiRequest::new(method, url),
            lenient: false,
        }
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.headers.push((key.into(), value.into()));
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.request.query.push((key.into(), value.to_string()));
        self
    }

    /// Add `owner` unless it is absent or empty
    pub fn owner(self, owner: Option<&str>) -> Self {
        match owner {
            Some(owner) if !owner.is_empty() => self.param("owner", owner),
            _ => self,
        }
    }

    /// Add `resultLimit`, `resultStart`, `owner` and the include flags
    pub fn list_options(self, options: &ListOptions) -> Self {
        self.param("resultLimit", options.result_limit)
            .param("resultStart", options.result_start)
            .owner(options.owner.as_deref())
            .includes(options.include_attributes, options.include_tags)
    }

    pub fn includes(mut self, include_attributes: bool, include_tags: bool) -> Self {
        if include_attributes {
            self = self.param("includeAttributes", "true");
        }
        if include_tags {
            self = self.param("includeTags", "true");
        }
        self
    }

    pub fn include_additional(self) -> Self {
        self.param("includeAdditional", "true")
    }

    pub fn json(mut self, body: Value) -> Self {
        self.request.body = Some(RequestBody::Json(body));
        self
    }

    /// Serialize any record as the JSON body
    pub fn json_from<T: Serialize>(self, body: &T) -> TcResult<Self> {
        let body = serde_json::to_value(body).map_err(TcError::Serialization)?;
        Ok(self.json(body))
    }

    pub fn bytes(mut self, content_type: impl Into<String>, data: Vec<u8>) -> Self {
        self.request.body = Some(RequestBody::Bytes {
            content_type: content_type.into(),
            data,
        });
        self
    }

    /// Treat a body that is not JSON as `{}` instead of failing
    pub fn lenient(mut self) -> Self {
        self.lenient = true;
        self
    }

    pub fn build(self) -> ApiRequest {
        self.request
    }

    /// Issue the request and parse the response body
    pub async fn send(self) -> TcResult<Value> {
        let url = self.request.url.to_string();
        tracing::debug!(method = %self.request.method, url = %url, "Sending ThreatConnect request");

        let body = match self.client.transport.send(self.request).await {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(url = %url, error = %e, "ThreatConnect request failed");
                return Err(e);
            }
        };

        tracing::info!(url = %url, "ThreatConnect request complete");

        parse_body(&url, &body, self.lenient)
    }
}

/// Parse a response body; empty bodies are `{}`, and so is anything unparsable when lenient
pub fn parse_body(url: &str, body: &str, lenient: bool) -> TcResult<Value> {
    if body.trim().is_empty() {
        return Ok(empty_object());
    }

    match serde_json::from_str(body) {
        Ok(value) => Ok(value),
        Err(_) if lenient => {
            tracing::debug!(url = %url, "Response body is not JSON; using empty object");
            Ok(empty_object())
        }
        Err(source) => Err(TcError::UnparsableBody {
            url: url.to_string(),
            source,
        }),
    }
}
