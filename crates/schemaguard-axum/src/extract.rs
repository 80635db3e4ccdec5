//! Handler-side extractors for validated values.
//!
//! Each extractor reads the shadow slot its middleware populated and
//! deserializes it into the caller's type. A missing slot means the
//! middleware is not installed on the route — a wiring mistake, reported as
//! a 500, never blamed on the client.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::container::{Container, ValidatedValues};

/// Rejection for the `Validated*` extractors.
#[derive(Error, Debug)]
pub enum ValidatedRejection {
    /// No validated value is present for the container.
    #[error("no validated value for {0}; is the validation middleware installed on this route?")]
    Missing(Container),

    /// The validated value did not deserialize into the requested type.
    #[error("validated {container} value did not deserialize: {reason}")]
    Deserialize {
        /// Container whose value was requested.
        container: Container,
        /// Deserialization failure detail.
        reason: String,
    },
}

impl IntoResponse for ValidatedRejection {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "validated-value extraction failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "An internal error occurred").into_response()
    }
}

fn extract_validated<T: DeserializeOwned>(
    parts: &Parts,
    container: Container,
) -> Result<T, ValidatedRejection> {
    let value: Value = parts
        .extensions
        .get::<ValidatedValues>()
        .and_then(|validated| validated.get(container))
        .cloned()
        .ok_or(ValidatedRejection::Missing(container))?;
    serde_json::from_value(value).map_err(|err| ValidatedRejection::Deserialize {
        container,
        reason: err.to_string(),
    })
}

macro_rules! validated_extractor {
    ($(#[$doc:meta])* $name:ident, $container:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name<T = Value>(pub T);

        impl<T, S> FromRequestParts<S> for $name<T>
        where
            T: DeserializeOwned,
            S: Send + Sync,
        {
            type Rejection = ValidatedRejection;

            async fn from_request_parts(
                parts: &mut Parts,
                _state: &S,
            ) -> Result<Self, Self::Rejection> {
                extract_validated(parts, $container).map($name)
            }
        }
    };
}

validated_extractor! {
    /// The validated query mapping.
    ValidatedQuery, Container::Query
}
validated_extractor! {
    /// The validated request body.
    ValidatedBody, Container::Body
}
validated_extractor! {
    /// The validated path parameters.
    ValidatedParams, Container::Params
}
validated_extractor! {
    /// The validated request headers.
    ValidatedHeaders, Container::Headers
}
validated_extractor! {
    /// The validated form fields.
    ValidatedFields, Container::Fields
}
