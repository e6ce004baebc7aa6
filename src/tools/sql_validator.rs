//! Read-only gate for free-form query text.
//!
//! This is a lexical check, not a SQL parser. A statement is allowed when it
//! opens with a read-only keyword and no write or administrative keyword
//! appears anywhere in it as a bounded token.
//!
//! Matching runs on a normalized copy (trimmed, whitespace runs collapsed to
//! one space, lower-cased); the caller's original text is what gets executed.
//!
//! Known gaps, kept on purpose:
//! - a keyword glued to punctuation other than `(` is not seen (`;drop`, `/*x*/drop`)
//! - comments and string literals are not skipped, so `'a drop b'` is denied
//! - `SHOW CREATE TABLE` is denied because of `create`

use crate::error::{DbError, DbResult};
use std::fmt;

/// Keywords a read-only statement may open with.
pub const ALLOWED_PREFIXES: &[&str] = &["select", "show", "describe", "desc", "explain", "with"];

/// Keywords whose bounded presence anywhere denies the statement.
pub const DENIED_KEYWORDS: &[&str] = &[
    "insert", "update", "delete", "drop", "create", "alter", "truncate", "replace", "merge",
    "call", "do", "load", "import", "export", "backup", "restore", "grant", "revoke", "flush",
    "reset", "shutdown", "kill", "set", "lock", "unlock",
];

mod error_messages {
    pub const NO_ALLOWED_PREFIX: &str =
        "only SELECT, SHOW, DESCRIBE, DESC, EXPLAIN and WITH statements are allowed";
}

/// Why a statement was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    NoAllowedPrefix,
    ForbiddenKeyword(&'static str),
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoAllowedPrefix => f.write_str(error_messages::NO_ALLOWED_PREFIX),
            Self::ForbiddenKeyword(kw) => {
                write!(f, "forbidden keyword '{}'", kw.to_ascii_uppercase())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Allowed,
    Denied(DenyReason),
}

impl Verdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Trim, collapse whitespace runs into single spaces and lower-case.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Whether `normalized` equals an allowed prefix or starts with one followed by a space.
pub fn starts_with_allowed(normalized: &str) -> bool {
    ALLOWED_PREFIXES.iter().any(|prefix| {
        normalized
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(' '))
    })
}

/// Whether `token` occurs in `haystack` with a start-of-text or space before it
/// and an end-of-text, space or `(` after it.
pub fn contains_bounded_token(haystack: &str, token: &str) -> bool {
    haystack.match_indices(token).any(|(idx, _)| {
        let left_ok = idx == 0 || haystack[..idx].ends_with(' ');
        let after = &haystack[idx + token.len()..];
        let right_ok = after.is_empty() || after.starts_with(' ') || after.starts_with('(');
        left_ok && right_ok
    })
}

/// First denied keyword (in list order) present in `normalized`.
pub fn find_denied_keyword(normalized: &str) -> Option<&'static str> {
    DENIED_KEYWORDS
        .iter()
        .copied()
        .find(|kw| contains_bounded_token(normalized, kw))
}

/// Classify query text as allowed or denied.
///
/// Total and side-effect free. Both checks always run; when both fail the
/// prefix failure is reported.
///
/// ```
/// use mysql_mcp_server::tools::sql_validator::{classify, Verdict};
///
/// assert_eq!(classify("  SELECT 1"), Verdict::Allowed);
/// assert!(!classify("SELECT * FROM t; DROP TABLE t").is_allowed());
/// ```
pub fn classify(text: &str) -> Verdict {
    let normalized = normalize(text);
    let prefix_ok = starts_with_allowed(&normalized);
    let denied = find_denied_keyword(&normalized);

    match (prefix_ok, denied) {
        (false, _) => Verdict::Denied(DenyReason::NoAllowedPrefix),
        (true, Some(kw)) => Verdict::Denied(DenyReason::ForbiddenKeyword(kw)),
        (true, None) => Verdict::Allowed,
    }
}

/// Validate query text for read-only execution.
///
/// Returns `Err(DbError::QueryDenied)` when [`classify`] denies it.
pub fn validate_readonly(text: &str) -> DbResult<()> {
    match classify(text) {
        Verdict::Allowed => Ok(()),
        Verdict::Denied(reason) => Err(DbError::query_denied(reason.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn denied_by(text: &str) -> Option<DenyReason> {
        match classify(text) {
            Verdict::Allowed => None,
            Verdict::Denied(reason) => Some(reason),
        }
    }

    // ==========================================================================
    // Allowed statements
    // ==========================================================================

    #[test]
    fn test_each_prefix_allowed() {
        for sql in [
            "SELECT * FROM users",
            "SHOW TABLES",
            "DESCRIBE users",
            "DESC users",
            "EXPLAIN SELECT 1",
            "WITH t AS (SELECT 1) SELECT * FROM t",
        ] {
            assert_eq!(classify(sql), Verdict::Allowed, "{sql}");
        }
    }

    #[test]
    fn test_bare_prefix_allowed() {
        assert!(classify("show").is_allowed());
        assert!(classify("select").is_allowed());
    }

    #[test]
    fn test_leading_whitespace_and_newlines() {
        assert!(classify("  SELECT 1").is_allowed());
        assert!(classify("\n\tSELECT\n  id\nFROM t").is_allowed());
    }

    #[test]
    fn test_keyword_inside_identifier_not_matched() {
        assert!(classify("SELECT updated_at, deleted FROM t").is_allowed());
        assert!(classify("SELECT * FROM settings").is_allowed());
        assert!(classify("SELECT created_by FROM audit").is_allowed());
        assert!(classify("SELECT * FROM t ORDER BY dropped_at").is_allowed());
    }

    // ==========================================================================
    // Denied statements
    // ==========================================================================

    #[test]
    fn test_write_statements_denied() {
        for sql in [
            "INSERT INTO t VALUES (1)",
            "update t set a = 1",
            "DELETE FROM t",
            "DROP TABLE t",
            "CREATE TABLE t (id INT)",
            "TRUNCATE t",
            "GRANT ALL ON *.* TO x",
            "SET autocommit = 0",
            "LOCK TABLES t READ",
        ] {
            assert!(!classify(sql).is_allowed(), "{sql}");
        }
    }

    #[test]
    fn test_empty_and_blank_denied() {
        assert_eq!(denied_by(""), Some(DenyReason::NoAllowedPrefix));
        assert_eq!(denied_by("   \n\t "), Some(DenyReason::NoAllowedPrefix));
    }

    #[test]
    fn test_prefix_must_be_whole_token() {
        assert_eq!(denied_by("selectx FROM t"), Some(DenyReason::NoAllowedPrefix));
        assert_eq!(denied_by("UPDATE_LOG"), Some(DenyReason::NoAllowedPrefix));
        assert_eq!(denied_by("descend"), Some(DenyReason::NoAllowedPrefix));
    }

    #[test]
    fn test_multi_statement_with_drop_denied() {
        assert_eq!(
            denied_by("SELECT * FROM t; DROP TABLE t"),
            Some(DenyReason::ForbiddenKeyword("drop"))
        );
    }

    #[test]
    fn test_keyword_followed_by_paren() {
        assert_eq!(
            denied_by("SELECT replace('a', 'b', 'c')"),
            Some(DenyReason::ForbiddenKeyword("replace"))
        );
        assert_eq!(
            denied_by("SELECT concat(replace(a,'b','c')) FROM t"),
            None,
            "a keyword glued to ( on its left is not a bounded token"
        );
        assert_eq!(
            denied_by("SELECT 1 FROM t WHERE x IN (SELECT 1) AND replace(a,'b','c') = 'd'"),
            Some(DenyReason::ForbiddenKeyword("replace"))
        );
    }

    #[test]
    fn test_keyword_at_end_of_text() {
        assert_eq!(
            denied_by("SELECT * FROM t FOR UPDATE"),
            Some(DenyReason::ForbiddenKeyword("update"))
        );
    }

    #[test]
    fn test_deny_keyword_first_reports_prefix() {
        assert_eq!(
            denied_by("INSERT INTO t SELECT * FROM s"),
            Some(DenyReason::NoAllowedPrefix)
        );
    }

    #[test]
    fn test_reason_uses_first_keyword_in_list_order() {
        assert_eq!(
            denied_by("WITH x AS (SELECT 1) SELECT * FROM x; set @a = 1; drop table x"),
            Some(DenyReason::ForbiddenKeyword("drop"))
        );
    }

    // ==========================================================================
    // Documented gaps
    // ==========================================================================

    #[test]
    fn test_punctuation_glued_keyword_not_seen() {
        assert!(classify("SELECT 1;DROP TABLE t").is_allowed());
    }

    #[test]
    fn test_show_create_table_denied() {
        assert_eq!(
            denied_by("SHOW CREATE TABLE users"),
            Some(DenyReason::ForbiddenKeyword("create"))
        );
    }

    #[test]
    fn test_string_literal_with_spaced_keyword_denied() {
        assert!(!classify("SELECT * FROM notes WHERE body = 'please drop by'").is_allowed());
    }

    // ==========================================================================
    // Helpers
    // ==========================================================================

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  SELECT\t*\n FROM   T "), "select * from t");
    }

    #[test]
    fn test_contains_bounded_token() {
        assert!(contains_bounded_token("drop", "drop"));
        assert!(contains_bounded_token("a drop", "drop"));
        assert!(contains_bounded_token("drop(x)", "drop"));
        assert!(!contains_bounded_token("dropped", "drop"));
        assert!(!contains_bounded_token("x_drop", "drop"));
        assert!(!contains_bounded_token("", "drop"));
    }

    #[test]
    fn test_validate_readonly_error_message() {
        let err = validate_readonly("DELETE FROM users").unwrap_err();
        assert!(matches!(err, DbError::QueryDenied { .. }));
        assert!(err.to_string().contains("only SELECT"));

        let err = validate_readonly("SELECT 1; TRUNCATE t").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Query rejected: forbidden keyword 'TRUNCATE'"
        );
    }
}
