//! Execution engine: request synthesis and response decoding.
//!
//! Turns a stored descriptor plus caller overrides into the exact outbound
//! request (method, URL, headers, JSON body). Network dispatch lives in the
//! API crate; everything here runs before any side effect, so malformed
//! input is rejected without touching the third party.
//!
//! Resolution order:
//!
//! 1. Parameters: a non-empty caller object replaces the stored defaults.
//! 2. Body: shaped per [`Platform`].
//! 3. Headers: baseline `Authorization` + `Content-Type`, overlaid by the
//!    caller's non-empty object or, failing that, the stored defaults.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::workflow::{HttpMethod, Platform};

/// Body field that carries the third party's workflow id.
pub const WORKFLOW_ID_FIELD: &str = "workflow_id";

const AUTHORIZATION: &str = "Authorization";
const CONTENT_TYPE: &str = "Content-Type";
const JSON_CONTENT_TYPE: &str = "application/json";

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Caller-supplied overrides for one execution.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExecuteWorkflowRequest {
    #[serde(default)]
    pub parameters: Option<Value>,
    #[serde(default)]
    pub headers: Option<Value>,
}

/// The parts of a stored descriptor the engine reads.
#[derive(Debug, Clone, Copy)]
pub struct ExecutionTarget<'a> {
    pub platform: Platform,
    pub method: HttpMethod,
    pub base_url: &'a str,
    pub bearer_token: &'a str,
    pub external_workflow_id: &'a str,
    pub default_parameters: &'a Value,
    pub default_headers: &'a Value,
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// The request as it is sent upstream. Echoed back to the caller verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Value,
}

/// The upstream response as received. Non-2xx statuses are data, not errors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapturedResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: BTreeMap<String, String>,
    /// Parsed JSON, or the raw text when the body is not JSON.
    pub body: Value,
}

/// Result of a successful execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionRecord {
    pub request: OutboundRequest,
    pub response: CapturedResponse,
}

/// Input rejected before dispatch.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExecutionError {
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Invalid headers: {0}")]
    InvalidHeaders(String),
}

// ---------------------------------------------------------------------------
// Step 1: parameters
// ---------------------------------------------------------------------------

/// Pick the parameter object for the outbound body.
///
/// A caller object with at least one key wholly replaces the defaults;
/// absent, `null` and `{}` fall back to them. No field-level merge.
pub fn resolve_parameters(
    supplied: Option<&Value>,
    defaults: &Value,
) -> Result<Map<String, Value>, ExecutionError> {
    if let Some(value) = supplied.filter(|v| is_supplied(v)) {
        return value
            .as_object()
            .cloned()
            .ok_or_else(|| ExecutionError::InvalidParameters("expected a JSON object".into()));
    }
    match defaults {
        Value::Null => Ok(Map::new()),
        Value::Object(map) => Ok(map.clone()),
        _ => Err(ExecutionError::InvalidParameters(
            "stored parameters are not a JSON object".into(),
        )),
    }
}

/// `null` and `{}` count as "not supplied"; anything else is an override,
/// including non-objects, which are then rejected.
fn is_supplied(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        _ => true,
    }
}

// ---------------------------------------------------------------------------
// Step 2: body shaping
// ---------------------------------------------------------------------------

impl Platform {
    /// Build the outbound body for this platform.
    pub fn shape_body(&self, external_workflow_id: &str, parameters: Map<String, Value>) -> Value {
        match self {
            Platform::Coze => shape_coze(external_workflow_id, parameters),
            Platform::N8n => shape_n8n(external_workflow_id, parameters),
        }
    }
}

/// `{ "workflow_id": .., "parameters": {..} }`
fn shape_coze(external_workflow_id: &str, parameters: Map<String, Value>) -> Value {
    let mut body = Map::new();
    body.insert(
        WORKFLOW_ID_FIELD.to_string(),
        Value::String(external_workflow_id.to_string()),
    );
    body.insert("parameters".to_string(), Value::Object(parameters));
    Value::Object(body)
}

/// The parameters themselves, with `workflow_id` injected at the top level.
fn shape_n8n(external_workflow_id: &str, mut parameters: Map<String, Value>) -> Value {
    parameters.insert(
        WORKFLOW_ID_FIELD.to_string(),
        Value::String(external_workflow_id.to_string()),
    );
    Value::Object(parameters)
}

// ---------------------------------------------------------------------------
// Step 3: headers
// ---------------------------------------------------------------------------

/// Build the outbound header set.
///
/// Overlay entries replace baseline entries whose names match
/// case-insensitively, `Authorization` included.
pub fn resolve_headers(
    bearer_token: &str,
    supplied: Option<&Value>,
    defaults: &Value,
) -> Result<BTreeMap<String, String>, ExecutionError> {
    let mut headers = BTreeMap::new();
    headers.insert(AUTHORIZATION.to_string(), format!("Bearer {bearer_token}"));
    headers.insert(CONTENT_TYPE.to_string(), JSON_CONTENT_TYPE.to_string());

    let overlay = match supplied.filter(|v| is_supplied(v)) {
        Some(value) => header_entries(value)?,
        None => match defaults {
            Value::Null => Vec::new(),
            other => header_entries(other)?,
        },
    };

    for (name, value) in overlay {
        headers.retain(|existing: &String, _| !existing.eq_ignore_ascii_case(&name));
        headers.insert(name, value);
    }
    Ok(headers)
}

fn header_entries(value: &Value) -> Result<Vec<(String, String)>, ExecutionError> {
    let map = value
        .as_object()
        .ok_or_else(|| ExecutionError::InvalidHeaders("expected a JSON object".into()))?;
    map.iter()
        .map(|(name, v)| match v {
            Value::String(s) => Ok((name.clone(), s.clone())),
            _ => Err(ExecutionError::InvalidHeaders(format!(
                "value for '{name}' must be a string"
            ))),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Resolve parameters, shape the body and resolve headers, in that order.
pub fn build_request(
    target: ExecutionTarget<'_>,
    overrides: &ExecuteWorkflowRequest,
) -> Result<OutboundRequest, ExecutionError> {
    let parameters = resolve_parameters(overrides.parameters.as_ref(), target.default_parameters)?;
    let body = target
        .platform
        .shape_body(target.external_workflow_id, parameters);
    let headers = resolve_headers(
        target.bearer_token,
        overrides.headers.as_ref(),
        target.default_headers,
    )?;

    Ok(OutboundRequest {
        method: target.method,
        url: target.base_url.to_string(),
        headers,
        body,
    })
}

/// Decode an upstream body: JSON when it parses, otherwise the raw text.
pub fn decode_body(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}
