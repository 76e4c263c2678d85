// src/core/sanitize.rs
// Cleaning rules for labels recovered from the legacy markup. All of them
// are idempotent: re-cleaning an already-cleaned string is a no-op.

use std::sync::LazyLock;

use regex::Regex;

// "1. Name" / "2) Name" numeric-list prefixes
static NUM_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+[\.\)]\s+)(.*)").unwrap());

// Trailing "<<1.2.3>>" hierarchy markers
static HIERARCHY_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.+)\s*<<[^>]+>>").unwrap());

// Prefix before a "<<" marker, for deriving a project name from an
// activity label
static BEFORE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^<]+)\s*<<").unwrap());

/// Count of leading whitespace characters in a raw activity label.
/// The legacy page indents child activities with spaces to render depth.
pub fn indent_level(raw: &str) -> usize {
    raw.chars().take_while(|c| c.is_whitespace()).count()
}

/// Clean an activity label: strip surrounding whitespace, a leading
/// "N. " / "N) " list prefix, and a trailing "<<...>>" hierarchy marker.
pub fn clean_activity_name(raw: &str) -> String {
    let mut name = raw.trim().to_string();

    if let Some(caps) = NUM_PREFIX.captures(&name) {
        name = s!(&caps[2]);
    }
    if let Some(caps) = HIERARCHY_SUFFIX.captures(&name) {
        name = caps[1].trim().to_string();
    }
    name
}

/// Derive a project display name from the first activity label under it:
/// the prefix before any "parent << child" marker, trimmed.
pub fn project_name_from_activity(label: &str) -> String {
    let trimmed = label.trim();
    match BEFORE_MARKER.captures(trimmed) {
        Some(caps) => caps[1].trim().to_string(),
        None => s!(trimmed),
    }
}

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indent_counts_leading_whitespace() {
        assert_eq!(indent_level("  Sub Task"), 2);
        assert_eq!(indent_level("Top"), 0);
        assert_eq!(indent_level("\t\tDeep"), 2);
    }

    #[test]
    fn cleans_prefix_and_marker() {
        assert_eq!(clean_activity_name("  1. Design <<1.2>>"), "Design");
        assert_eq!(clean_activity_name("2) Review"), "Review");
        assert_eq!(clean_activity_name("Plain"), "Plain");
    }

    #[test]
    fn cleaning_is_idempotent() {
        for raw in ["  1. Design <<1.2>>", "3) X <<9>>", "  Sub Task <<1.1>>", "Plain"] {
            let once = clean_activity_name(raw);
            assert_eq!(clean_activity_name(&once), once, "re-cleaning {raw:?}");
        }
    }

    #[test]
    fn project_name_takes_prefix_before_marker() {
        assert_eq!(project_name_from_activity("Alpha <<1>>"), "Alpha");
        assert_eq!(project_name_from_activity("  Beta  "), "Beta");
    }
}
