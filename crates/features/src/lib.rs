//! Similarity primitives for candidate matching.
//!
//! Provides pure functions shared by every dimension scorer:
//! - Tag normalization and case-insensitive set operations
//! - Jaccard similarity over tag lists
//! - Numeric range overlap
//! - Location and free-text substring helpers

use std::collections::HashSet;

use serde::Serialize;

/// Normalize a tag for comparison: trimmed, lower-cased, single-spaced.
pub fn normalize_tag(tag: &str) -> String {
    tag.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Deduplicated set of normalized, non-empty tags.
pub fn tag_set<S: AsRef<str>>(tags: &[S]) -> HashSet<String> {
    tags.iter()
        .map(|t| normalize_tag(t.as_ref()))
        .filter(|t| !t.is_empty())
        .collect()
}

/// Jaccard similarity of two tag lists, compared case-insensitively.
///
/// Two empty lists are identical (1.0); one empty list shares nothing (0.0).
pub fn jaccard<A: AsRef<str>, B: AsRef<str>>(a: &[A], b: &[B]) -> f64 {
    let set_a = tag_set(a);
    let set_b = tag_set(b);

    match (set_a.is_empty(), set_b.is_empty()) {
        (true, true) => 1.0,
        (true, false) | (false, true) => 0.0,
        (false, false) => {
            let intersection = set_a.intersection(&set_b).count();
            let union = set_a.union(&set_b).count();
            intersection as f64 / union as f64
        }
    }
}

/// Entries of `a` that also appear in `b`, case-insensitively.
///
/// Keeps `a`'s spelling and order, without duplicates.
pub fn intersect_ci<A: AsRef<str>, B: AsRef<str>>(a: &[A], b: &[B]) -> Vec<String> {
    let set_b = tag_set(b);
    let mut seen = HashSet::new();

    a.iter()
        .map(|t| t.as_ref().trim())
        .filter(|t| {
            let key = normalize_tag(t);
            set_b.contains(&key) && seen.insert(key)
        })
        .map(str::to_string)
        .collect()
}

/// How a candidate range sits against a target range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RangeOverlap {
    pub overlaps: bool,
    /// Share of the candidate range inside the target range, 0.0 - 1.0
    pub fraction: f64,
}

/// Overlap of candidate range `[c_min, c_max]` with target range `[t_min, t_max]`.
///
/// The fraction is measured against the candidate's width; a degenerate
/// candidate range (`c_max == c_min`) uses a width of 1.
pub fn range_overlap(c_min: f64, c_max: f64, t_min: f64, t_max: f64) -> RangeOverlap {
    let overlaps = c_min <= t_max && c_max >= t_min;
    if !overlaps {
        return RangeOverlap {
            overlaps,
            fraction: 0.0,
        };
    }

    let width = c_max - c_min;
    let width = if width == 0.0 { 1.0 } else { width };
    let shared = c_max.min(t_max) - c_min.max(t_min);

    RangeOverlap {
        overlaps,
        fraction: (shared / width).clamp(0.0, 1.0),
    }
}

/// First comma-separated segment of a location, normalized.
///
/// `"Berlin, Germany"` -> `Some("berlin")`.
pub fn primary_city(location: &str) -> Option<String> {
    let city = normalize_tag(location.split(',').next().unwrap_or_default());
    if city.is_empty() {
        None
    } else {
        Some(city)
    }
}

/// Case-insensitive substring test. An empty needle never matches.
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    let needle = normalize_tag(needle);
    !needle.is_empty() && normalize_tag(haystack).contains(&needle)
}

/// Either string contains the other, case-insensitively.
pub fn substring_overlap(a: &str, b: &str) -> bool {
    contains_ci(a, b) || contains_ci(b, a)
}

/// Round a 0-100 float to an integer score, clamped to `[0, 100]`.
pub fn to_score(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY: [&str; 0] = [];

    #[test]
    fn test_normalize_tag() {
        assert_eq!(normalize_tag("  Remote   First "), "remote first");
        assert_eq!(normalize_tag(""), "");
    }

    #[test]
    fn test_jaccard_empty_sets() {
        assert_eq!(jaccard(&EMPTY, &EMPTY), 1.0);
        assert_eq!(jaccard(&["ownership"], &EMPTY), 0.0);
        assert_eq!(jaccard(&EMPTY, &["ownership"]), 0.0);
        // blanks don't count as entries
        assert_eq!(jaccard(&["  "], &EMPTY), 1.0);
    }

    #[test]
    fn test_jaccard_identical_and_partial() {
        assert_eq!(jaccard(&["Ownership", "Candor"], &["candor", "OWNERSHIP"]), 1.0);
        assert_eq!(jaccard(&["a", "b"], &["b", "c"]), 1.0 / 3.0);
        assert_eq!(jaccard(&["a", "a", "b"], &["b"]), 0.5);
        assert_eq!(jaccard(&["a"], &["b"]), 0.0);
    }

    #[test]
    fn test_intersect_ci() {
        let found = intersect_ci(&["Fintech", "Health", "fintech"], &["FINTECH", "Retail"]);
        assert_eq!(found, vec!["Fintech".to_string()]);
        assert!(intersect_ci(&["Fintech"], &EMPTY).is_empty());
    }

    #[test]
    fn test_range_overlap_containment() {
        let overlap = range_overlap(90_000.0, 110_000.0, 80_000.0, 150_000.0);
        assert!(overlap.overlaps);
        assert_eq!(overlap.fraction, 1.0);
    }

    #[test]
    fn test_range_overlap_partial() {
        let overlap = range_overlap(100_000.0, 200_000.0, 80_000.0, 150_000.0);
        assert!(overlap.overlaps);
        assert!((overlap.fraction - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_range_overlap_disjoint() {
        let overlap = range_overlap(200_000.0, 250_000.0, 80_000.0, 150_000.0);
        assert!(!overlap.overlaps);
        assert_eq!(overlap.fraction, 0.0);
    }

    #[test]
    fn test_range_overlap_degenerate_candidate() {
        let overlap = range_overlap(100_000.0, 100_000.0, 80_000.0, 150_000.0);
        assert!(overlap.overlaps);
        assert_eq!(overlap.fraction, 0.0);

        let touching = range_overlap(150_000.0, 150_000.0, 80_000.0, 150_000.0);
        assert!(touching.overlaps);
    }

    #[test]
    fn test_primary_city() {
        assert_eq!(primary_city("Berlin, Germany"), Some("berlin".to_string()));
        assert_eq!(primary_city("  New York  "), Some("new york".to_string()));
        assert_eq!(primary_city(", Germany"), None);
        assert_eq!(primary_city(""), None);
    }

    #[test]
    fn test_substring_helpers() {
        assert!(contains_ci("Remote-first, async", "REMOTE"));
        assert!(!contains_ci("Remote", ""));
        assert!(substring_overlap("11-50", "startup 11-50 people"));
        assert!(substring_overlap("startup 11-50 people", "11-50"));
        assert!(!substring_overlap("1000+", "11-50"));
    }

    #[test]
    fn test_to_score_clamps() {
        assert_eq!(to_score(49.25), 49);
        assert_eq!(to_score(49.5), 50);
        assert_eq!(to_score(-3.0), 0);
        assert_eq!(to_score(180.0), 100);
        assert_eq!(to_score(f64::NAN), 0);
    }
}
