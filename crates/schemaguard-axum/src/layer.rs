//! # Inbound Validation Middleware
//!
//! The tower [`Layer`]/[`Service`] pair generated per inbound container.
//! Each request flows through: read the container value → await the
//! schema's validate routine → exactly one of {continue with the validated
//! value installed, short-circuit with a formatted failure, propagate a
//! structured error, take the generic fault path}.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::extract::{RawPathParams, Request};
use axum::http::header::CONTENT_LENGTH;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::RequestExt;
use serde_json::{Map, Value};
use tower::{Layer, Service};

use schemaguard_core::{format_issues, StandardSchema, ValidationOutcome};

use crate::config::EffectiveConfig;
use crate::container::{Container, OriginalValues, ValidatedValues};
use crate::error::{failure_response, fault_response, ValidationError};

/// Layer validating one inbound container against a verified schema.
///
/// Built by [`crate::Validator`]; the capability contract has already been
/// asserted by the time one of these exists.
#[derive(Clone)]
pub struct ValidationLayer {
    schema: Arc<dyn StandardSchema>,
    container: Container,
    config: EffectiveConfig,
}

impl std::fmt::Debug for ValidationLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationLayer")
            .field("container", &self.container)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ValidationLayer {
    pub(crate) fn new(
        schema: Arc<dyn StandardSchema>,
        container: Container,
        config: EffectiveConfig,
    ) -> Self {
        debug_assert!(
            container != Container::Response,
            "response validation uses ResponseValidationLayer"
        );
        Self {
            schema,
            container,
            config,
        }
    }
}

impl<S> Layer<S> for ValidationLayer {
    type Service = Validation<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Validation {
            inner,
            schema: Arc::clone(&self.schema),
            container: self.container,
            config: self.config,
        }
    }
}

/// Service produced by [`ValidationLayer`].
#[derive(Clone)]
pub struct Validation<S> {
    inner: S,
    schema: Arc<dyn StandardSchema>,
    container: Container,
    config: EffectiveConfig,
}

impl<S> Service<Request> for Validation<S>
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
        // Swap in the clone so the original, known-ready service runs this
        // request (standard tower pattern for boxed-future middleware).
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let schema = Arc::clone(&self.schema);
        let container = self.container;
        let config = self.config;

        Box::pin(async move {
            let mut req = req;
            let raw = match read_container(&mut req, container).await {
                Ok(value) => value,
                Err(response) => return Ok(response),
            };

            match schema.validate(&raw).await {
                Ok(ValidationOutcome::Success(output)) => {
                    tracing::debug!(container = %container, "request validation passed");
                    install_success(&mut req, container, raw, output);
                    inner.call(req).await
                }
                Ok(ValidationOutcome::Failure(issues)) => {
                    let message = format_issues(&issues, container.label(), None);
                    tracing::debug!(
                        container = %container,
                        issues = issues.len(),
                        "request validation failed"
                    );
                    if config.pass_error {
                        let error = ValidationError {
                            container,
                            issues,
                            message,
                            value: raw,
                            status_code: config.status,
                        };
                        Ok(error.into_response())
                    } else {
                        Ok(failure_response(config.status, message))
                    }
                }
                Err(fault) => Ok(fault_response(container, fault)),
            }
        })
    }
}

/// Record the outcome of a successful validation on the request: snapshot
/// first, then install the validated value.
fn install_success(req: &mut Request, container: Container, raw: Value, output: Value) {
    let mut originals = req
        .extensions_mut()
        .remove::<OriginalValues>()
        .unwrap_or_default();
    originals.insert(container, raw);
    req.extensions_mut().insert(originals);

    // The body is the one directly-writable container: rewrite the bytes so
    // downstream extractors see the validated shape.
    if container == Container::Body {
        if let Ok(bytes) = serde_json::to_vec(&output) {
            req.headers_mut()
                .insert(CONTENT_LENGTH, HeaderValue::from(bytes.len()));
            *req.body_mut() = Body::from(bytes);
        }
    }

    // Every container also gets the shadow slot the Validated* extractors
    // read; query, params, and headers cannot be reassigned on the request.
    let mut validated = req
        .extensions_mut()
        .remove::<ValidatedValues>()
        .unwrap_or_default();
    validated.insert(container, output);
    req.extensions_mut().insert(validated);
}

/// Read the raw value for `container` from the request.
///
/// Buffered bodies are restored onto the request before returning so the
/// downstream service still sees them. A malformed body or form is reported
/// as a 400 plain-text response.
async fn read_container(req: &mut Request, container: Container) -> Result<Value, Response> {
    match container {
        Container::Query => Ok(parse_query(req.uri().query().unwrap_or(""))),
        Container::Body => read_json_body(req).await,
        Container::Params => Ok(read_params(req).await),
        Container::Headers => Ok(headers_to_value(req.headers())),
        Container::Fields => read_form_body(req).await,
        Container::Response => unreachable!("response validation uses ResponseValidationLayer"),
    }
}

/// Parse a query string into an object; repeated keys collect into arrays.
fn parse_query(raw: &str) -> Value {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(raw).unwrap_or_default();
    pairs_to_value(pairs)
}

fn pairs_to_value(pairs: Vec<(String, String)>) -> Value {
    let mut map = Map::new();
    for (key, value) in pairs {
        match map.entry(key) {
            serde_json::map::Entry::Vacant(slot) => {
                slot.insert(Value::String(value));
            }
            serde_json::map::Entry::Occupied(mut slot) => match slot.get_mut() {
                Value::Array(items) => items.push(Value::String(value)),
                existing => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, Value::String(value)]);
                }
            },
        }
    }
    Value::Object(map)
}

async fn read_json_body(req: &mut Request) -> Result<Value, Response> {
    let body = std::mem::replace(req.body_mut(), Body::empty());
    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(err) => {
            return Err((
                StatusCode::BAD_REQUEST,
                format!("failed to read request body: {err}"),
            )
                .into_response())
        }
    };
    *req.body_mut() = Body::from(bytes.clone());

    if bytes.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&bytes).map_err(|err| {
        (
            StatusCode::BAD_REQUEST,
            format!("invalid JSON in request body: {err}"),
        )
            .into_response()
    })
}

async fn read_form_body(req: &mut Request) -> Result<Value, Response> {
    let body = std::mem::replace(req.body_mut(), Body::empty());
    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(err) => {
            return Err((
                StatusCode::BAD_REQUEST,
                format!("failed to read request body: {err}"),
            )
                .into_response())
        }
    };
    *req.body_mut() = Body::from(bytes.clone());

    let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(&bytes).map_err(|err| {
        (
            StatusCode::BAD_REQUEST,
            format!("invalid urlencoded form body: {err}"),
        )
            .into_response()
    })?;
    Ok(pairs_to_value(pairs))
}

/// Route path parameters as a string map; empty when the route captured
/// none.
async fn read_params(req: &mut Request) -> Value {
    match req.extract_parts::<RawPathParams>().await {
        Ok(params) => {
            let mut map = Map::new();
            for (name, value) in params.iter() {
                map.insert(name.to_string(), Value::String(value.to_string()));
            }
            Value::Object(map)
        }
        Err(_) => Value::Object(Map::new()),
    }
}

/// Headers as a string map, names lowercased by the header type; repeated
/// headers are comma-joined.
fn headers_to_value(headers: &HeaderMap) -> Value {
    let mut map = Map::new();
    for name in headers.keys() {
        let joined = headers
            .get_all(name)
            .iter()
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
            .collect::<Vec<_>>()
            .join(", ");
        map.insert(name.as_str().to_string(), Value::String(joined));
    }
    Value::Object(map)
}
