//! # schemaguard-axum — Standard-Schema Validation Middleware for Axum
//!
//! Route authors declare schemas for the parts of a request they care about
//! — query, body, path params, headers, form fields — and for the outgoing
//! response payload. Each declaration becomes a tower layer that validates
//! the named container once per request and either continues the chain with
//! the validated value installed, short-circuits with a diagnostic response,
//! or hands a structured [`ValidationError`] to centralized error handling.
//!
//! Schemas are anything implementing the Standard Schema contract from
//! `schemaguard-core`; the bundled backends cover JSON Schema and closures.
//!
//! ## Per-Request Flow
//!
//! ```text
//! ValidationLayer(query) → ValidationLayer(body) → … → Handler
//!                                                       │
//!                       ResponseValidationLayer ← JSON payload
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use axum::{routing::get, Json, Router};
//! use schemaguard_axum::{ValidatedQuery, ValidationConfig, Validator};
//! use schemaguard_core::JsonSchema;
//!
//! fn router() -> Result<Router, Box<dyn std::error::Error>> {
//!     let validator = Validator::new(ValidationConfig::new());
//!     let schema = Arc::new(JsonSchema::new(&serde_json::json!({
//!         "type": "object",
//!         "properties": {"name": {"type": "string"}},
//!         "required": ["name"]
//!     }))?);
//!
//!     Ok(Router::new()
//!         .route("/hello", get(hello))
//!         .route_layer(validator.query(schema)?))
//! }
//!
//! async fn hello(ValidatedQuery(query): ValidatedQuery) -> Json<serde_json::Value> {
//!     Json(query)
//! }
//! ```
//!
//! On failure the client receives a plain-text 400 (500 for the response
//! check) beginning with `"Error validating request query: …"`, unless
//! `pass_error` routes the failure to the error path instead. Successful
//! validations leave the pre-validation value in the [`OriginalValues`]
//! request extension.

pub mod config;
pub mod container;
pub mod error;
pub mod extract;
pub mod layer;
pub mod response;
pub mod validator;

// Re-export the public surface at crate root.
pub use config::ValidationConfig;
pub use container::{Container, ContainerDescriptor, OriginalValues, ValidatedValues, CONTAINERS};
pub use error::{UnexpectedFault, ValidationError};
pub use extract::{
    ValidatedBody, ValidatedFields, ValidatedHeaders, ValidatedParams, ValidatedQuery,
    ValidatedRejection,
};
pub use layer::{Validation, ValidationLayer};
pub use response::{ResponseValidation, ResponseValidationLayer};
pub use validator::Validator;
