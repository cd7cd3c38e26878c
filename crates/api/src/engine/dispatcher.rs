//! Outbound dispatch to third-party workflow platforms.
//!
//! One request per execution, bounded by the configured timeout. Any
//! upstream status is captured as data; only transport failures are
//! errors.

use std::collections::BTreeMap;
use std::time::Duration;

use flowgate_core::execution::{
    build_request, decode_body, CapturedResponse, ExecuteWorkflowRequest, ExecutionError,
    ExecutionRecord, ExecutionTarget, OutboundRequest,
};
use flowgate_core::workflow::HttpMethod;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use super::DispatchError;
use crate::error::{AppError, AppResult};

/// Sends synthesized requests with a shared client.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl Dispatcher {
    pub fn new(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Send `request` and capture the full response.
    ///
    /// Header names and values are checked before the connection is opened.
    pub async fn send(&self, request: &OutboundRequest) -> AppResult<CapturedResponse> {
        let headers = header_map(&request.headers)?;
        let url = reqwest::Url::parse(&request.url)
            .map_err(|e| DispatchError::InvalidUrl(e.to_string()))?;

        let response = self
            .client
            .request(method(request.method), url)
            .timeout(self.timeout)
            .headers(headers)
            .json(&request.body)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        let status = response.status();
        let headers = first_header_values(response.headers());
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        Ok(CapturedResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body: decode_body(&bytes),
        })
    }

    fn map_reqwest_error(&self, e: reqwest::Error) -> DispatchError {
        if e.is_timeout() {
            return DispatchError::Timeout(self.timeout.as_secs());
        }
        if e.is_connect() {
            return DispatchError::Connect(e.to_string());
        }
        if e.is_builder() {
            return DispatchError::InvalidUrl(e.to_string());
        }
        DispatchError::Transport(e.to_string())
    }
}

/// Synthesize the outbound request, send it, and return both halves.
///
/// Bad overrides are rejected before any network activity.
pub async fn execute(
    dispatcher: &Dispatcher,
    target: ExecutionTarget<'_>,
    overrides: &ExecuteWorkflowRequest,
) -> AppResult<ExecutionRecord> {
    let request = build_request(target, overrides)?;
    tracing::debug!(
        method = %request.method,
        url = %request.url,
        header_count = request.headers.len(),
        "Dispatching workflow request",
    );
    let response = dispatcher.send(&request).await?;
    Ok(ExecutionRecord { request, response })
}

fn method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
    }
}

fn header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap, AppError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
            ExecutionError::InvalidHeaders(format!("'{name}' is not a valid header name"))
        })?;
        let header_value = HeaderValue::from_str(value).map_err(|_| {
            ExecutionError::InvalidHeaders(format!("value for '{name}' is not a valid header value"))
        })?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

/// Collapse a multi-map to one value per name; the first value wins.
fn first_header_values(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    for (name, value) in headers {
        out.entry(name.as_str().to_string())
            .or_insert_with(|| String::from_utf8_lossy(value.as_bytes()).into_owned());
    }
    out
}
