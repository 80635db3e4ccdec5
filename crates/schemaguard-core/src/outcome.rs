//! Validation outcomes and the issues a failed validation reports.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One step of a path locating an offending field within the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Index into an array.
    Index(usize),
    /// Property key of an object.
    Key(String),
}

impl std::fmt::Display for PathSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Key(key) => write!(f, "{key}"),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// A single validation complaint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Human-readable description of the violation.
    pub message: String,
    /// Path to the offending field, when the backend can locate it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<PathSegment>>,
}

impl Issue {
    /// Issue with a message and no path.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: None,
        }
    }

    /// Issue located at a specific path within the input.
    pub fn at(message: impl Into<String>, path: Vec<PathSegment>) -> Self {
        Self {
            message: message.into(),
            path: Some(path),
        }
    }
}

/// Result of invoking a schema's validate routine on a candidate value.
///
/// Exactly one of the two shapes exists per invocation. Failure carries the
/// issue list; by contract it is non-empty, and the enum makes it impossible
/// to confuse an empty or null success value with a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// The input was accepted; carries the final (possibly transformed or
    /// coerced) output value.
    Success(Value),
    /// The input was rejected; carries the reported issues in backend order.
    Failure(Vec<Issue>),
}

impl ValidationOutcome {
    /// True for [`ValidationOutcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// True for [`ValidationOutcome::Failure`].
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// The issue list, when this is a failure.
    pub fn issues(&self) -> Option<&[Issue]> {
        match self {
            Self::Failure(issues) => Some(issues),
            Self::Success(_) => None,
        }
    }
}
