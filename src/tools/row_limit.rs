//! Row-limit injection for `run_query`.

use crate::models::MAX_ROW_LIMIT;

/// Append `LIMIT n` to a SELECT that has no limit of its own.
///
/// `n` is `limit` capped at [`MAX_ROW_LIMIT`]. The text is returned unchanged
/// when it does not start with `select`, already mentions `limit` anywhere
/// (including inside identifiers or literals), or `limit` is zero. Applying
/// the rewrite twice yields the same text as applying it once.
pub fn apply_row_limit(text: &str, limit: u32) -> String {
    let lowered = text.to_lowercase();

    if limit == 0 || !lowered.trim_start().starts_with("select") || lowered.contains("limit") {
        return text.to_string();
    }

    format!("{} LIMIT {}", text, limit.min(MAX_ROW_LIMIT))
}
