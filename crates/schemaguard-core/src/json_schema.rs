//! # JSON Schema Backend
//!
//! Standard Schema adapter over the `jsonschema` engine, compiling Draft
//! 2020-12 schemas at construction time. Each violation maps to one
//! [`Issue`] whose path is derived from the violation's JSON Pointer.
//!
//! This backend does not coerce or transform: a clean input comes back as
//! the success output unchanged.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::outcome::{Issue, PathSegment, ValidationOutcome};
use crate::schema::{CapabilityBundle, SchemaError, StandardSchema};

/// Vendor tag reported by this backend's capability bundle.
pub const VENDOR: &str = "jsonschema";

/// Errors raised while constructing a [`JsonSchema`].
#[derive(Error, Debug)]
pub enum JsonSchemaError {
    /// The schema document could not be compiled into a validator.
    #[error("failed to compile schema: {reason}")]
    Compile {
        /// Human-readable reason from the engine.
        reason: String,
    },
}

/// A compiled JSON Schema usable as a [`StandardSchema`].
pub struct JsonSchema {
    validator: jsonschema::Validator,
}

impl std::fmt::Debug for JsonSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonSchema").finish_non_exhaustive()
    }
}

impl JsonSchema {
    /// Compile a Draft 2020-12 schema document.
    ///
    /// # Errors
    ///
    /// Returns [`JsonSchemaError::Compile`] when the document is not a
    /// valid schema.
    pub fn new(schema: &Value) -> Result<Self, JsonSchemaError> {
        let validator = jsonschema::options()
            .with_draft(jsonschema::Draft::Draft202012)
            .build(schema)
            .map_err(|e| JsonSchemaError::Compile {
                reason: e.to_string(),
            })?;
        Ok(Self { validator })
    }
}

#[async_trait]
impl StandardSchema for JsonSchema {
    fn bundle(&self) -> CapabilityBundle {
        CapabilityBundle::new(VENDOR)
    }

    async fn validate(&self, value: &Value) -> Result<ValidationOutcome, SchemaError> {
        let issues: Vec<Issue> = self
            .validator
            .iter_errors(value)
            .map(|err| Issue {
                message: err.to_string(),
                path: pointer_to_path(&err.instance_path.to_string()),
            })
            .collect();

        if issues.is_empty() {
            Ok(ValidationOutcome::Success(value.clone()))
        } else {
            Ok(ValidationOutcome::Failure(issues))
        }
    }
}

/// Parse a JSON Pointer (`"/items/2/name"`) into path segments. The empty
/// pointer (violation at the document root) maps to no path.
fn pointer_to_path(pointer: &str) -> Option<Vec<PathSegment>> {
    if pointer.is_empty() {
        return None;
    }
    let segments = pointer
        .trim_start_matches('/')
        .split('/')
        .map(|raw| {
            let unescaped = raw.replace("~1", "/").replace("~0", "~");
            match unescaped.parse::<usize>() {
                Ok(index) => PathSegment::Index(index),
                Err(_) => PathSegment::Key(unescaped),
            }
        })
        .collect();
    Some(segments)
}
