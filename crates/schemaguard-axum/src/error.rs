//! # Validation Errors
//!
//! The propagated error form handed to centralized error handling, the
//! unexpected-fault channel, and the plain-text failure writer.
//!
//! Axum has no `next(err)` continuation; the centralized error path here is
//! [`ValidationError`]'s `IntoResponse` rendering, with a clone of the error
//! inserted into the response extensions so outer layers can observe and
//! re-map it. Unexpected faults never reach a client body in any form —
//! details go to the log and to the [`UnexpectedFault`] extension only.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Serialize, Serializer};
use serde_json::Value;

use schemaguard_core::{Issue, SchemaError};

use crate::container::Container;

/// A validation failure in its propagated form.
///
/// Constructed only when propagation mode is active; serializes as
/// `{"type", "issues", "message", "value", "statusCode"}`.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationError {
    /// Which container failed validation.
    #[serde(rename = "type")]
    pub container: Container,
    /// The raw issues reported by the schema, in backend order.
    pub issues: Vec<Issue>,
    /// The combined human-readable message.
    pub message: String,
    /// The offending raw value as read from the request or response.
    pub value: Value,
    /// The effective failure status.
    #[serde(rename = "statusCode", serialize_with = "serialize_status")]
    pub status_code: StatusCode,
}

fn serialize_status<S: Serializer>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u16(status.as_u16())
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        tracing::debug!(
            container = %self.container,
            status = %self.status_code,
            issues = self.issues.len(),
            "validation failure propagated to error path"
        );
        let payload = serde_json::to_value(&self).unwrap_or(Value::Null);
        let mut response = (self.status_code, Json(payload)).into_response();
        response.extensions_mut().insert(self);
        response
    }
}

/// Cloneable handle to a raw fault raised by a schema's validation routine.
///
/// Attached to the generic 500 response so outer layers can reach the
/// original error.
#[derive(Debug, Clone)]
pub struct UnexpectedFault(pub Arc<dyn std::error::Error + Send + Sync>);

impl std::fmt::Display for UnexpectedFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Short-circuit response for a failure with propagation off: the effective
/// status and the formatted issue string as a plain-text body.
pub(crate) fn failure_response(status: StatusCode, message: String) -> Response {
    (status, message).into_response()
}

/// Generic error path for faults raised by a validation routine itself.
///
/// Used regardless of propagation mode: the fault's shape is unknown and
/// must not be presented to a client as validation text. The body carries a
/// fixed generic string; the fault is logged and preserved in the response
/// extensions.
pub(crate) fn fault_response(container: Container, fault: SchemaError) -> Response {
    tracing::error!(container = %container, error = %fault, "schema validation routine failed");
    let fault = UnexpectedFault(Arc::from(fault));
    let mut response =
        (StatusCode::INTERNAL_SERVER_ERROR, "An internal error occurred").into_response();
    response.extensions_mut().insert(fault);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_error() -> ValidationError {
        ValidationError {
            container: Container::Body,
            issues: vec![Issue::new("email must be a valid email")],
            message: "Error validating request body: email must be a valid email.".to_string(),
            value: json!({"username": "john", "email": "not-an-email"}),
            status_code: StatusCode::BAD_REQUEST,
        }
    }

    #[test]
    fn serializes_with_documented_keys() {
        let serialized = serde_json::to_value(sample_error()).expect("serialize");
        assert_eq!(serialized["type"], json!("body"));
        assert_eq!(serialized["statusCode"], json!(400));
        assert_eq!(serialized["issues"][0]["message"], json!("email must be a valid email"));
        assert_eq!(serialized["value"]["username"], json!("john"));
        assert!(serialized["message"]
            .as_str()
            .is_some_and(|m| m.starts_with("Error validating request body:")));
    }

    #[test]
    fn display_is_the_combined_message() {
        let err = sample_error();
        assert_eq!(err.to_string(), err.message);
    }

    #[test]
    fn into_response_carries_status_and_extension() {
        let response = sample_error().into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let propagated = response
            .extensions()
            .get::<ValidationError>()
            .expect("error preserved in extensions");
        assert_eq!(propagated.container, Container::Body);
        assert_eq!(propagated.issues.len(), 1);
    }

    #[test]
    fn fault_response_never_echoes_fault_text() {
        let response = fault_response(Container::Query, "secret backend detail".into());
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let fault = response
            .extensions()
            .get::<UnexpectedFault>()
            .expect("fault preserved in extensions");
        assert_eq!(fault.to_string(), "secret backend detail");
    }
}
