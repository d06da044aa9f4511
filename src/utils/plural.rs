//! Count formatting for log lines.

/// `count` followed by `noun`, with an `s` unless the count is one.
///
/// `plural_count(1, "page")` → `"1 page"`, `plural_count(3, "page")` → `"3 pages"`
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    let suffix = if count == 1 { "" } else { "s" };
    format!("{count} {noun}{suffix}")
}
