//! # Response Validation Middleware
//!
//! Wraps the response-emission path: the JSON payload a handler produced is
//! validated before it reaches the wire, and the client receives the
//! validated (possibly transformed) shape.
//!
//! Unlike the inbound layers this does not gate the chain — the inner
//! service runs first, and only its eventual JSON write is intercepted.
//! Non-JSON responses, JSON the adapter cannot parse, and responses already
//! produced by the propagation path pass through untouched.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::extract::Request;
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use tower::{Layer, Service};

use schemaguard_core::{format_issues, StandardSchema, ValidationOutcome};

use crate::config::EffectiveConfig;
use crate::container::Container;
use crate::error::{failure_response, fault_response, ValidationError};

/// Layer validating outgoing JSON payloads against a verified schema.
#[derive(Clone)]
pub struct ResponseValidationLayer {
    schema: Arc<dyn StandardSchema>,
    config: EffectiveConfig,
}

impl std::fmt::Debug for ResponseValidationLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseValidationLayer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ResponseValidationLayer {
    pub(crate) fn new(schema: Arc<dyn StandardSchema>, config: EffectiveConfig) -> Self {
        Self { schema, config }
    }
}

impl<S> Layer<S> for ResponseValidationLayer {
    type Service = ResponseValidation<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ResponseValidation {
            inner,
            schema: Arc::clone(&self.schema),
            config: self.config,
        }
    }
}

/// Service produced by [`ResponseValidationLayer`].
#[derive(Clone)]
pub struct ResponseValidation<S> {
    inner: S,
    schema: Arc<dyn StandardSchema>,
    config: EffectiveConfig,
}

impl<S> Service<Request> for ResponseValidation<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response, S::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let schema = Arc::clone(&self.schema);
        let config = self.config;

        Box::pin(async move {
            let response = inner.call(req).await?;

            // The centralized error path's own output is never re-validated.
            if response.extensions().get::<ValidationError>().is_some() {
                return Ok(response);
            }
            if !is_json(&response) {
                return Ok(response);
            }

            let (mut parts, body) = response.into_parts();
            let bytes = match axum::body::to_bytes(body, usize::MAX).await {
                Ok(bytes) => bytes,
                Err(err) => {
                    return Ok(fault_response(Container::Response, Box::new(err)));
                }
            };

            let payload: Value = match serde_json::from_slice(&bytes) {
                Ok(payload) => payload,
                // Declared JSON but unparseable: not a payload this adapter
                // emitted; forward it untouched.
                Err(_) => return Ok(Response::from_parts(parts, Body::from(bytes))),
            };

            match schema.validate(&payload).await {
                Ok(ValidationOutcome::Success(output)) => {
                    tracing::debug!("response validation passed");
                    let body = serde_json::to_vec(&output).unwrap_or_else(|_| bytes.to_vec());
                    parts
                        .headers
                        .insert(CONTENT_LENGTH, body.len().into());
                    Ok(Response::from_parts(parts, Body::from(body)))
                }
                Ok(ValidationOutcome::Failure(issues)) => {
                    let message = format_issues(&issues, Container::Response.label(), None);
                    tracing::warn!(
                        issues = issues.len(),
                        "response payload violated its schema"
                    );
                    if config.pass_error {
                        let error = ValidationError {
                            container: Container::Response,
                            issues,
                            message,
                            value: payload,
                            status_code: config.status,
                        };
                        Ok(error.into_response())
                    } else {
                        Ok(failure_response(config.status, message))
                    }
                }
                Err(fault) => Ok(fault_response(Container::Response, fault)),
            }
        })
    }
}

/// True when the response declares a JSON content type
/// (`application/json` or a `+json` suffix).
fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| {
            let mime = value.split(';').next().unwrap_or("").trim();
            mime.eq_ignore_ascii_case("application/json") || mime.ends_with("+json")
        })
        .unwrap_or(false)
}
