//! # Capability Contract
//!
//! The [`StandardSchema`] trait every schema backend implements, plus the
//! runtime contract check performed when middleware is generated from a
//! schema.
//!
//! The trait bound already guarantees a callable validate routine; the
//! version and vendor tags stay runtime data so a route wired with a schema
//! from an incompatible contract revision fails at setup time with a message
//! naming the expected bundle, not at first request with a confusing
//! mis-invocation.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::outcome::ValidationOutcome;

/// The capability contract version this crate understands.
pub const SPEC_VERSION: u8 = 1;

/// Opaque error raised when a schema's validation routine itself fails.
///
/// This is the *unexpected fault* channel: its shape is unknown to the
/// adapter and must never be formatted as client-facing validation text.
/// Expected rejections of bad input are [`ValidationOutcome::Failure`], not
/// errors.
pub type SchemaError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Capability metadata a schema exposes to prove it speaks this contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityBundle {
    /// Contract revision the schema implements. Must equal [`SPEC_VERSION`].
    pub version: u8,
    /// Identifier of the backend that produced the schema, e.g.
    /// `"jsonschema"`. Must be non-empty.
    pub vendor: String,
}

impl CapabilityBundle {
    /// Bundle for the current contract version with the given vendor tag.
    pub fn new(vendor: impl Into<String>) -> Self {
        Self {
            version: SPEC_VERSION,
            vendor: vendor.into(),
        }
    }
}

/// A validation capability: metadata plus an async validate routine.
///
/// Backends may validate synchronously or asynchronously (e.g. constraints
/// requiring external lookups); the async signature normalizes both to a
/// single suspension point, and adapters always await it before inspecting
/// the outcome.
#[async_trait]
pub trait StandardSchema: Send + Sync {
    /// Capability metadata for this schema.
    fn bundle(&self) -> CapabilityBundle;

    /// Validate a candidate value.
    ///
    /// Returns `Ok(Success(output))` with the final (possibly transformed)
    /// value, `Ok(Failure(issues))` for well-formed rejections of bad input,
    /// or `Err` when the routine itself faults.
    async fn validate(&self, value: &Value) -> Result<ValidationOutcome, SchemaError>;
}

/// A schema failed the capability contract check at middleware-generation
/// time. Always a route-setup fault, never a request-time condition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaContractError {
    /// The schema declares a contract version other than [`SPEC_VERSION`].
    #[error(
        "schema from vendor '{vendor}' declares capability version {found}; \
         a Standard Schema must carry a version-{SPEC_VERSION} bundle with a \
         vendor tag and a validate routine"
    )]
    UnsupportedVersion {
        /// Vendor tag reported by the offending schema.
        vendor: String,
        /// Version the schema declared.
        found: u8,
    },

    /// The schema's vendor identifier is empty.
    #[error(
        "schema declares an empty vendor identifier; a Standard Schema must \
         carry a version-{SPEC_VERSION} bundle with a non-empty vendor tag \
         and a validate routine"
    )]
    MissingVendor,
}

/// Pure predicate: does `schema` satisfy the capability contract?
///
/// True iff the bundle declares exactly [`SPEC_VERSION`] and a non-empty
/// vendor tag. Never panics.
pub fn is_valid_schema(schema: &dyn StandardSchema) -> bool {
    let bundle = schema.bundle();
    bundle.version == SPEC_VERSION && !bundle.vendor.trim().is_empty()
}

/// Asserting form of [`is_valid_schema`], used at middleware-generation
/// time so a misconfigured route fails fast.
pub fn assert_valid_schema(schema: &dyn StandardSchema) -> Result<(), SchemaContractError> {
    let bundle = schema.bundle();
    if bundle.vendor.trim().is_empty() {
        return Err(SchemaContractError::MissingVendor);
    }
    if bundle.version != SPEC_VERSION {
        return Err(SchemaContractError::UnsupportedVersion {
            vendor: bundle.vendor,
            found: bundle.version,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubSchema {
        bundle: CapabilityBundle,
    }

    #[async_trait]
    impl StandardSchema for StubSchema {
        fn bundle(&self) -> CapabilityBundle {
            self.bundle.clone()
        }

        async fn validate(&self, value: &Value) -> Result<ValidationOutcome, SchemaError> {
            Ok(ValidationOutcome::Success(value.clone()))
        }
    }

    #[test]
    fn current_version_with_vendor_is_valid() {
        let schema = StubSchema {
            bundle: CapabilityBundle::new("stub"),
        };
        assert!(is_valid_schema(&schema));
        assert!(assert_valid_schema(&schema).is_ok());
    }

    #[test]
    fn future_version_is_rejected() {
        let schema = StubSchema {
            bundle: CapabilityBundle {
                version: 2,
                vendor: "stub".to_string(),
            },
        };
        assert!(!is_valid_schema(&schema));
        match assert_valid_schema(&schema) {
            Err(SchemaContractError::UnsupportedVersion { vendor, found }) => {
                assert_eq!(vendor, "stub");
                assert_eq!(found, 2);
            }
            other => panic!("expected UnsupportedVersion, got: {other:?}"),
        }
    }

    #[test]
    fn empty_vendor_is_rejected() {
        let schema = StubSchema {
            bundle: CapabilityBundle {
                version: SPEC_VERSION,
                vendor: "   ".to_string(),
            },
        };
        assert!(!is_valid_schema(&schema));
        assert_eq!(
            assert_valid_schema(&schema),
            Err(SchemaContractError::MissingVendor)
        );
    }

    #[test]
    fn contract_error_messages_name_the_contract() {
        let version_err = SchemaContractError::UnsupportedVersion {
            vendor: "stub".to_string(),
            found: 3,
        };
        let msg = version_err.to_string();
        assert!(msg.contains("version 3"));
        assert!(msg.contains("version-1 bundle"));
        assert!(msg.contains("validate routine"));

        let vendor_err = SchemaContractError::MissingVendor;
        let msg = vendor_err.to_string();
        assert!(msg.contains("vendor"));
        assert!(msg.contains("validate routine"));
    }

    #[test]
    fn bundle_new_pins_current_version() {
        let bundle = CapabilityBundle::new("anything");
        assert_eq!(bundle.version, SPEC_VERSION);
        assert_eq!(bundle.vendor, "anything");
    }
}
