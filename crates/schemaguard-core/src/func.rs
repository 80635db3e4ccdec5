//! Closure-backed schemas for ad-hoc validation rules.
//!
//! [`FnSchema`] wraps a plain function as a [`StandardSchema`], which is how
//! coercing or cross-field rules that no schema language expresses get into
//! a validation chain. The closure runs synchronously; the async contract
//! boundary normalizes it alongside genuinely asynchronous backends.

use async_trait::async_trait;
use serde_json::Value;

use crate::outcome::ValidationOutcome;
use crate::schema::{CapabilityBundle, SchemaError, StandardSchema};

/// A [`StandardSchema`] backed by a closure.
pub struct FnSchema<F> {
    bundle: CapabilityBundle,
    check: F,
}

impl<F> FnSchema<F>
where
    F: Fn(&Value) -> Result<ValidationOutcome, SchemaError> + Send + Sync,
{
    /// Wrap `check` as a schema with the current contract version and the
    /// given vendor tag.
    pub fn new(vendor: impl Into<String>, check: F) -> Self {
        Self {
            bundle: CapabilityBundle::new(vendor),
            check,
        }
    }

    /// Wrap `check` with an explicit capability bundle.
    ///
    /// Exists so callers (and tests) can build schemas that deliberately
    /// violate the contract, e.g. to exercise generation-time rejection.
    pub fn with_bundle(bundle: CapabilityBundle, check: F) -> Self {
        Self { bundle, check }
    }
}

impl<F> std::fmt::Debug for FnSchema<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnSchema")
            .field("bundle", &self.bundle)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<F> StandardSchema for FnSchema<F>
where
    F: Fn(&Value) -> Result<ValidationOutcome, SchemaError> + Send + Sync,
{
    fn bundle(&self) -> CapabilityBundle {
        self.bundle.clone()
    }

    async fn validate(&self, value: &Value) -> Result<ValidationOutcome, SchemaError> {
        (self.check)(value)
    }
}
