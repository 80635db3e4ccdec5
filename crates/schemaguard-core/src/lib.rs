//! # schemaguard-core — Standard Schema Capability Contract
//!
//! This crate defines the contract between pluggable schema backends and the
//! middleware adapters built on top of them. It knows nothing about any web
//! framework — only about schemas, the values they validate, and the issues
//! they report.
//!
//! ## Design Principles
//!
//! 1. **One trait, one version.** [`StandardSchema`] is the whole capability
//!    surface: a metadata bundle and an async validate routine. The bundle is
//!    checked once, at middleware-generation time, against [`SPEC_VERSION`] —
//!    a schema declaring a future contract version is rejected deliberately
//!    rather than mis-invoked.
//!
//! 2. **Outcomes are disjoint by construction.** [`ValidationOutcome`] is an
//!    enum: a success value that happens to be empty or null can never be
//!    mistaken for a failure, and a failure always carries its issue list.
//!
//! 3. **Faults are not failures.** A backend that reports bad input returns
//!    `Ok(Failure(..))`; a backend whose validation routine itself breaks
//!    returns `Err`. Callers route the two very differently and nothing in
//!    this crate blurs them.
//!
//! Two backends ship with the crate: [`JsonSchema`] over the `jsonschema`
//! engine (Draft 2020-12), and [`FnSchema`] for closure-backed ad-hoc rules.

pub mod format;
pub mod func;
pub mod json_schema;
pub mod outcome;
pub mod schema;

// Re-export primary types at crate root for ergonomic imports.
pub use format::format_issues;
pub use func::FnSchema;
pub use json_schema::{JsonSchema, JsonSchemaError};
pub use outcome::{Issue, PathSegment, ValidationOutcome};
pub use schema::{
    assert_valid_schema, is_valid_schema, CapabilityBundle, SchemaContractError, SchemaError,
    StandardSchema, SPEC_VERSION,
};
