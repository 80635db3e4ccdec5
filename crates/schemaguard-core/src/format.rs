//! Issue-list formatting shared by every generated middleware.

use crate::outcome::Issue;

/// Render an issue list as a single diagnostic line.
///
/// Produces `"Error validating {label}: {msg1}. {msg2}. …"` — every issue's
/// message followed by a period, in the order the backend reported them
/// (backend order is significant and is never reordered here). A
/// caller-supplied `prefix_override` replaces the default prefix verbatim.
/// An empty issue list yields just the prefix, with no trailing separator.
///
/// Pure function: the same inputs always produce the identical string.
pub fn format_issues(issues: &[Issue], label: &str, prefix_override: Option<&str>) -> String {
    let mut out = match prefix_override {
        Some(prefix) => prefix.to_string(),
        None => format!("Error validating {label}:"),
    };
    for issue in issues {
        out.push(' ');
        out.push_str(&issue.message);
        out.push('.');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_single_issue() {
        let issues = vec![Issue::new("name is required")];
        assert_eq!(
            format_issues(&issues, "request query", None),
            "Error validating request query: name is required."
        );
    }

    #[test]
    fn preserves_issue_order() {
        let issues = vec![
            Issue::new("name is required"),
            Issue::new("age must be a number"),
        ];
        assert_eq!(
            format_issues(&issues, "request body", None),
            "Error validating request body: name is required. age must be a number."
        );
    }

    #[test]
    fn empty_issue_list_yields_bare_prefix() {
        assert_eq!(
            format_issues(&[], "request params", None),
            "Error validating request params:"
        );
    }

    #[test]
    fn prefix_override_replaces_default_verbatim() {
        let issues = vec![Issue::new("bad")];
        assert_eq!(
            format_issues(&issues, "request query", Some("Rejected:")),
            "Rejected: bad."
        );
        assert_eq!(format_issues(&[], "request query", Some("Rejected:")), "Rejected:");
    }

    #[test]
    fn idempotent_over_repeated_calls() {
        let issues = vec![Issue::new("a"), Issue::new("b"), Issue::new("c")];
        let first = format_issues(&issues, "response", None);
        let second = format_issues(&issues, "response", None);
        assert_eq!(first, second);
        assert_eq!(first, "Error validating response: a. b. c.");
    }
}
