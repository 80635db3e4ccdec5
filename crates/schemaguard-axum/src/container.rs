//! # Request Containers
//!
//! The named parts of an HTTP exchange this crate can validate, their static
//! descriptor table, and the typed request-extension slots that carry
//! pre-validation snapshots and validated values through to handlers.
//!
//! ## Replacement vs shadowing
//!
//! On an `http::Request` only the body is reassignable; query, path params,
//! and headers cannot be replaced wholesale. Successful validation therefore
//! rewrites the body bytes directly and installs every container's validated
//! value into the [`ValidatedValues`] shadow slot, which the
//! `Validated*` extractors read.

use std::collections::HashMap;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use serde::Serialize;
use serde_json::Value;

/// One named part of an HTTP request/response subject to validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Container {
    /// The query-string mapping.
    Query,
    /// The JSON request body.
    Body,
    /// Route path parameters.
    Params,
    /// Request headers.
    Headers,
    /// Urlencoded form fields.
    Fields,
    /// The outgoing JSON response payload.
    Response,
}

/// Static metadata for one container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerDescriptor {
    /// The container this row describes.
    pub container: Container,
    /// Tag used in propagated errors (the `type` field).
    pub name: &'static str,
    /// Label used in formatted diagnostics ("Error validating {label}: …").
    pub label: &'static str,
    /// Status used when neither the per-call nor the validator-level
    /// configuration supplies one.
    pub default_status: StatusCode,
}

/// The descriptor table. Read-only; one row per container.
pub const CONTAINERS: [ContainerDescriptor; 6] = [
    ContainerDescriptor {
        container: Container::Query,
        name: "query",
        label: "request query",
        default_status: StatusCode::BAD_REQUEST,
    },
    ContainerDescriptor {
        container: Container::Body,
        name: "body",
        label: "request body",
        default_status: StatusCode::BAD_REQUEST,
    },
    ContainerDescriptor {
        container: Container::Params,
        name: "params",
        label: "request params",
        default_status: StatusCode::BAD_REQUEST,
    },
    ContainerDescriptor {
        container: Container::Headers,
        name: "headers",
        label: "request headers",
        default_status: StatusCode::BAD_REQUEST,
    },
    ContainerDescriptor {
        container: Container::Fields,
        name: "fields",
        label: "request fields",
        default_status: StatusCode::BAD_REQUEST,
    },
    // An outgoing-response violation is a server-side contract breach, not a
    // client input error, hence the 500 fallback.
    ContainerDescriptor {
        container: Container::Response,
        name: "response",
        label: "response",
        default_status: StatusCode::INTERNAL_SERVER_ERROR,
    },
];

impl Container {
    /// The descriptor row for this container.
    pub const fn descriptor(self) -> &'static ContainerDescriptor {
        match self {
            Self::Query => &CONTAINERS[0],
            Self::Body => &CONTAINERS[1],
            Self::Params => &CONTAINERS[2],
            Self::Headers => &CONTAINERS[3],
            Self::Fields => &CONTAINERS[4],
            Self::Response => &CONTAINERS[5],
        }
    }

    /// Tag used in propagated errors.
    pub const fn name(self) -> &'static str {
        self.descriptor().name
    }

    /// Label used in formatted diagnostics.
    pub const fn label(self) -> &'static str {
        self.descriptor().label
    }

    /// Fallback failure status for this container.
    pub const fn default_status(self) -> StatusCode {
        self.descriptor().default_status
    }
}

impl std::fmt::Display for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Pre-validation snapshots, one slot per container.
///
/// The middleware inserts the raw value it read from the request *before*
/// installing the validated output, so downstream code can always
/// distinguish what the client sent from what validation produced. Each
/// snapshot is an owned value, structurally independent of the live one.
#[derive(Debug, Clone, Default)]
pub struct OriginalValues {
    slots: HashMap<Container, Value>,
}

impl OriginalValues {
    /// The snapshot for `container`, if that container was validated.
    pub fn get(&self, container: Container) -> Option<&Value> {
        self.slots.get(&container)
    }

    /// True when no container has been validated on this request.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub(crate) fn insert(&mut self, container: Container, value: Value) {
        self.slots.insert(container, value);
    }
}

impl<S: Send + Sync> FromRequestParts<S> for OriginalValues {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<OriginalValues>().cloned().unwrap_or_default())
    }
}

/// Validated values, one shadow slot per container.
///
/// Read by the `Validated*` extractors; the body container is additionally
/// written back into the request bytes so plain `axum::Json` sees the
/// validated shape.
#[derive(Debug, Clone, Default)]
pub struct ValidatedValues {
    slots: HashMap<Container, Value>,
}

impl ValidatedValues {
    /// The validated value for `container`, if present.
    pub fn get(&self, container: Container) -> Option<&Value> {
        self.slots.get(&container)
    }

    pub(crate) fn insert(&mut self, container: Container, value: Value) {
        self.slots.insert(container, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn descriptor_table_is_consistent() {
        for descriptor in &CONTAINERS {
            assert_eq!(descriptor.container.descriptor(), descriptor);
            assert_eq!(descriptor.container.name(), descriptor.name);
            assert_eq!(descriptor.container.label(), descriptor.label);
        }
    }

    #[test]
    fn inbound_containers_default_to_400() {
        for container in [
            Container::Query,
            Container::Body,
            Container::Params,
            Container::Headers,
            Container::Fields,
        ] {
            assert_eq!(container.default_status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn response_container_defaults_to_500() {
        assert_eq!(
            Container::Response.default_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn labels_prefix_inbound_containers_with_request() {
        assert_eq!(Container::Query.label(), "request query");
        assert_eq!(Container::Fields.label(), "request fields");
        assert_eq!(Container::Response.label(), "response");
    }

    #[test]
    fn container_serializes_to_its_tag() {
        assert_eq!(serde_json::to_value(Container::Body).unwrap(), json!("body"));
        assert_eq!(
            serde_json::to_value(Container::Response).unwrap(),
            json!("response")
        );
    }

    #[test]
    fn slots_store_per_container_values() {
        let mut originals = OriginalValues::default();
        assert!(originals.is_empty());
        originals.insert(Container::Query, json!({"a": "1"}));
        assert_eq!(originals.get(Container::Query), Some(&json!({"a": "1"})));
        assert_eq!(originals.get(Container::Body), None);
        assert!(!originals.is_empty());
    }
}
