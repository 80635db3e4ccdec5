//! Validator configuration and per-call overrides.

use axum::http::StatusCode;

use crate::container::Container;

/// Failure-handling configuration for a validator instance or a single
/// middleware generation.
///
/// Both fields are optional; unset fields fall through from the per-call
/// override to the validator-level default to the container's fallback
/// (400 for inbound containers, 500 for the response check, propagation
/// off).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationConfig {
    /// Status written (or propagated) on validation failure.
    pub status_code: Option<StatusCode>,
    /// When true, failures are handed to the centralized error path instead
    /// of being written as a plain-text response.
    pub pass_error: Option<bool>,
}

impl ValidationConfig {
    /// Configuration with no fields set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the failure status code.
    pub fn status_code(mut self, status: StatusCode) -> Self {
        self.status_code = Some(status);
        self
    }

    /// Set the propagation mode.
    pub fn pass_error(mut self, pass_error: bool) -> Self {
        self.pass_error = Some(pass_error);
        self
    }
}

/// Fully resolved failure handling for one generated middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EffectiveConfig {
    pub status: StatusCode,
    pub pass_error: bool,
}

impl EffectiveConfig {
    /// Resolve per-call override → validator default → container fallback.
    pub(crate) fn resolve(
        per_call: Option<ValidationConfig>,
        base: ValidationConfig,
        container: Container,
    ) -> Self {
        let per_call = per_call.unwrap_or_default();
        Self {
            status: per_call
                .status_code
                .or(base.status_code)
                .unwrap_or(container.default_status()),
            pass_error: per_call.pass_error.or(base.pass_error).unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_config_falls_back_to_container_defaults() {
        let effective =
            EffectiveConfig::resolve(None, ValidationConfig::default(), Container::Query);
        assert_eq!(effective.status, StatusCode::BAD_REQUEST);
        assert!(!effective.pass_error);

        let effective =
            EffectiveConfig::resolve(None, ValidationConfig::default(), Container::Response);
        assert_eq!(effective.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validator_default_overrides_fallback() {
        let base = ValidationConfig::new()
            .status_code(StatusCode::UNPROCESSABLE_ENTITY)
            .pass_error(true);
        let effective = EffectiveConfig::resolve(None, base, Container::Body);
        assert_eq!(effective.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(effective.pass_error);
    }

    #[test]
    fn per_call_override_wins_over_validator_default() {
        let base = ValidationConfig::new()
            .status_code(StatusCode::UNPROCESSABLE_ENTITY)
            .pass_error(true);
        let per_call = ValidationConfig::new()
            .status_code(StatusCode::CONFLICT)
            .pass_error(false);
        let effective = EffectiveConfig::resolve(Some(per_call), base, Container::Body);
        assert_eq!(effective.status, StatusCode::CONFLICT);
        assert!(!effective.pass_error);
    }

    #[test]
    fn partial_per_call_override_merges_with_default() {
        let base = ValidationConfig::new().pass_error(true);
        let per_call = ValidationConfig::new().status_code(StatusCode::IM_A_TEAPOT);
        let effective = EffectiveConfig::resolve(Some(per_call), base, Container::Headers);
        assert_eq!(effective.status, StatusCode::IM_A_TEAPOT);
        assert!(effective.pass_error);
    }
}
