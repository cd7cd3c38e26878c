//! Workflow descriptor vocabulary and write-time validation.
//!
//! A descriptor names a third-party automation (Coze or n8n) plus everything
//! needed to call it. The three enumerated columns are parsed here so a bad
//! value is rejected with a 400 before anything reaches the store.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::ProjectId;

// ---------------------------------------------------------------------------
// Enumerated fields
// ---------------------------------------------------------------------------

/// Third-party automation platform. Determines the outbound body shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Coze,
    N8n,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Coze => "coze",
            Platform::N8n => "n8n",
        }
    }
}

impl FromStr for Platform {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "coze" => Ok(Platform::Coze),
            "n8n" => Ok(Platform::N8n),
            _ => Err(CoreError::Validation(
                "Invalid source, must be 'coze' or 'n8n'".into(),
            )),
        }
    }
}

/// Invocation template. Stored as metadata; the engine does not interpret it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateName {
    Workflow,
    Streamflow,
}

impl TemplateName {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateName::Workflow => "workflow",
            TemplateName::Streamflow => "streamflow",
        }
    }
}

impl FromStr for TemplateName {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "workflow" => Ok(TemplateName::Workflow),
            "streamflow" => Ok(TemplateName::Streamflow),
            _ => Err(CoreError::Validation(
                "Invalid template_name, must be 'workflow' or 'streamflow'".into(),
            )),
        }
    }
}

/// HTTP methods a descriptor may use for its outbound call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }
}

impl FromStr for HttpMethod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            _ => Err(CoreError::Validation(
                "Invalid http_method, must be 'GET', 'POST', or 'PUT'".into(),
            )),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TemplateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// JSON shape checks
// ---------------------------------------------------------------------------

/// Require `value` to be a JSON object.
pub fn validate_json_object(field: &str, value: &serde_json::Value) -> Result<(), CoreError> {
    if value.is_object() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!("{field} must be a JSON object")))
    }
}

/// Require `value` to be a JSON object whose values are all strings.
pub fn validate_header_object(field: &str, value: &serde_json::Value) -> Result<(), CoreError> {
    let map = value
        .as_object()
        .ok_or_else(|| CoreError::Validation(format!("{field} must be a JSON object")))?;
    if let Some((name, _)) = map.iter().find(|(_, v)| !v.is_string()) {
        return Err(CoreError::Validation(format!(
            "{field}: value for '{name}' must be a string"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Create request
// ---------------------------------------------------------------------------

/// Request body for registering a new workflow descriptor.
///
/// String fields default to empty so a missing field and an empty one are
/// reported the same way by [`CreateWorkflowRequest::into_validated`].
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateWorkflowRequest {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub workflow_name: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub description: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub source: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub template_name: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub http_method: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub base_url: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub bearer_token: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub external_workflow_id: String,
    #[serde(default)]
    pub parameters: Option<serde_json::Value>,
    #[serde(default)]
    pub headers: Option<serde_json::Value>,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub project_id: ProjectId,
}

/// A create request whose enumerated and JSON fields have been checked.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedWorkflow {
    pub workflow_name: String,
    pub description: String,
    pub source: Platform,
    pub template_name: TemplateName,
    pub http_method: HttpMethod,
    pub base_url: String,
    pub bearer_token: String,
    pub external_workflow_id: String,
    pub parameters: serde_json::Value,
    pub headers: serde_json::Value,
    pub project_id: ProjectId,
}

impl CreateWorkflowRequest {
    /// Check required fields, enum values and JSON shapes.
    ///
    /// Absent or `null` parameters/headers default to `{}`.
    pub fn into_validated(self) -> Result<ValidatedWorkflow, CoreError> {
        self.validate()
            .map_err(|_| CoreError::Validation("Missing required fields".into()))?;

        let source: Platform = self.source.parse()?;
        let template_name: TemplateName = self.template_name.parse()?;
        let http_method: HttpMethod = self.http_method.parse()?;

        let parameters = non_null_or_empty(self.parameters);
        validate_json_object("parameters", &parameters)?;
        let headers = non_null_or_empty(self.headers);
        validate_header_object("headers", &headers)?;

        Ok(ValidatedWorkflow {
            workflow_name: self.workflow_name,
            description: self.description,
            source,
            template_name,
            http_method,
            base_url: self.base_url,
            bearer_token: self.bearer_token,
            external_workflow_id: self.external_workflow_id,
            parameters,
            headers,
            project_id: self.project_id,
        })
    }
}

fn non_null_or_empty(value: Option<serde_json::Value>) -> serde_json::Value {
    match value {
        Some(v) if !v.is_null() => v,
        _ => serde_json::Value::Object(serde_json::Map::new()),
    }
}

// ---------------------------------------------------------------------------
// Update request
// ---------------------------------------------------------------------------

/// Sparse update body. Only fields that are present change.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateWorkflowRequest {
    pub workflow_name: Option<String>,
    pub description: Option<String>,
    pub source: Option<String>,
    pub template_name: Option<String>,
    pub http_method: Option<String>,
    pub base_url: Option<String>,
    pub bearer_token: Option<String>,
    pub external_workflow_id: Option<String>,
    pub parameters: Option<serde_json::Value>,
    pub headers: Option<serde_json::Value>,
}

impl UpdateWorkflowRequest {
    /// Validate the enumerated and JSON fields that are present.
    pub fn validate_fields(&self) -> Result<(), CoreError> {
        if let Some(source) = &self.source {
            source.parse::<Platform>()?;
        }
        if let Some(template) = &self.template_name {
            template.parse::<TemplateName>()?;
        }
        if let Some(method) = &self.http_method {
            method.parse::<HttpMethod>()?;
        }
        if let Some(parameters) = &self.parameters {
            validate_json_object("parameters", parameters)?;
        }
        if let Some(headers) = &self.headers {
            validate_header_object("headers", headers)?;
        }
        Ok(())
    }

    /// True when no field was supplied.
    pub fn is_empty(&self) -> bool {
        self.workflow_name.is_none()
            && self.description.is_none()
            && self.source.is_none()
            && self.template_name.is_none()
            && self.http_method.is_none()
            && self.base_url.is_none()
            && self.bearer_token.is_none()
            && self.external_workflow_id.is_none()
            && self.parameters.is_none()
            && self.headers.is_none()
    }
}

/// Body of `PUT /workflows/{id}/share`.
#[derive(Debug, Clone, Deserialize)]
pub struct ShareWorkflowRequest {
    pub is_shared: bool,
}

/// Body of `PUT /projects/{project_id}/workflows/{workflow_id}/hide`.
#[derive(Debug, Clone, Deserialize)]
pub struct HideWorkflowRequest {
    pub is_hidden: bool,
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn valid_request() -> CreateWorkflowRequest {
        serde_json::from_value(json!({
            "workflow_name": "Summarize",
            "description": "Summarize a document",
            "source": "coze",
            "template_name": "workflow",
            "http_method": "POST",
            "base_url": "https://api.coze.com/v1/workflow/run",
            "bearer_token": "pat_123",
            "external_workflow_id": "wf-1",
            "project_id": "proj-1"
        }))
        .expect("fixture should deserialize")
    }

    #[test]
    fn enum_values_round_trip_through_as_str() {
        for p in [Platform::Coze, Platform::N8n] {
            assert_eq!(p.as_str().parse::<Platform>().unwrap(), p);
        }
        for t in [TemplateName::Workflow, TemplateName::Streamflow] {
            assert_eq!(t.as_str().parse::<TemplateName>().unwrap(), t);
        }
        for m in [HttpMethod::Get, HttpMethod::Post, HttpMethod::Put] {
            assert_eq!(m.as_str().parse::<HttpMethod>().unwrap(), m);
        }
    }

    #[test]
    fn enum_parsing_is_case_sensitive() {
        assert!("Coze".parse::<Platform>().is_err());
        assert!("post".parse::<HttpMethod>().is_err());
        assert!("DELETE".parse::<HttpMethod>().is_err());
        assert!("Workflow".parse::<TemplateName>().is_err());
    }

    #[test]
    fn valid_request_defaults_json_fields_to_empty_objects() {
        let validated = valid_request().into_validated().unwrap();
        assert_eq!(validated.source, Platform::Coze);
        assert_eq!(validated.http_method, HttpMethod::Post);
        assert_eq!(validated.parameters, json!({}));
        assert_eq!(validated.headers, json!({}));
    }

    #[test]
    fn missing_field_is_reported_as_missing() {
        let mut req = valid_request();
        req.description = String::new();
        let err = req.into_validated().unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg == "Missing required fields");
    }

    #[test]
    fn absent_field_deserializes_then_fails_validation() {
        let req: CreateWorkflowRequest =
            serde_json::from_value(json!({ "workflow_name": "x" })).unwrap();
        assert_matches!(req.into_validated(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn bad_enum_value_is_rejected_not_coerced() {
        let mut req = valid_request();
        req.source = "zapier".into();
        assert_matches!(
            req.into_validated(),
            Err(CoreError::Validation(msg)) if msg.contains("'coze' or 'n8n'")
        );

        let mut req = valid_request();
        req.http_method = "PATCH".into();
        assert_matches!(req.into_validated(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn non_object_parameters_are_rejected() {
        let mut req = valid_request();
        req.parameters = Some(json!([1, 2, 3]));
        assert_matches!(req.into_validated(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn non_string_header_values_are_rejected() {
        let mut req = valid_request();
        req.headers = Some(json!({ "X-Retry": 3 }));
        assert_matches!(
            req.into_validated(),
            Err(CoreError::Validation(msg)) if msg.contains("X-Retry")
        );
    }

    #[test]
    fn empty_update_is_empty_and_valid() {
        let req = UpdateWorkflowRequest::default();
        assert!(req.is_empty());
        assert!(req.validate_fields().is_ok());
    }

    #[test]
    fn update_validates_only_present_fields() {
        let req = UpdateWorkflowRequest {
            http_method: Some("GET".into()),
            ..Default::default()
        };
        assert!(!req.is_empty());
        assert!(req.validate_fields().is_ok());

        let req = UpdateWorkflowRequest {
            template_name: Some("batch".into()),
            ..Default::default()
        };
        assert_matches!(req.validate_fields(), Err(CoreError::Validation(_)));
    }
}
