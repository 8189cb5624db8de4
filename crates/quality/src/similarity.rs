//! Exact string similarity.
//!
//! The ratio of characters matched by a longest-common-subsequence alignment:
//!
//! ```text
//! similarity(a, b) = 2 * LCS(a, b) / (|a| + |b|)
//! ```
//!
//! Comparison is case-insensitive and treats any whitespace run as a single
//! space. This is the ground truth every duplicate-search path verifies
//! against.

/// Lowercase and collapse whitespace.
pub fn normalize(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Similarity of two strings in [0, 1].
///
/// Symmetric, and `similarity(a, a) == 1.0` for every `a` (including the
/// empty string).
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = normalize(a).chars().collect();
    let b: Vec<char> = normalize(b).chars().collect();
    similarity_chars(&a, &b)
}

/// [`similarity`] over already-normalized character slices.
pub fn similarity_chars(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }

    2.0 * lcs_len(a, b) as f64 / total as f64
}

/// Highest similarity two strings of these lengths could reach.
///
/// Used to skip pairs that cannot clear a threshold without running the
/// alignment.
pub fn similarity_upper_bound(len_a: usize, len_b: usize) -> f64 {
    let total = len_a + len_b;
    if total == 0 {
        return 1.0;
    }
    2.0 * len_a.min(len_b) as f64 / total as f64
}

/// Length of the longest common subsequence, two-row dynamic programming.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    // Keep the row as short as possible.
    let (outer, inner) = if a.len() >= b.len() { (a, b) } else { (b, a) };

    let mut prev = vec![0usize; inner.len() + 1];
    let mut curr = vec![0usize; inner.len() + 1];

    for oc in outer {
        for (j, ic) in inner.iter().enumerate() {
            curr[j + 1] = if oc == ic {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[inner.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_strings() {
        assert_eq!(similarity("Big news today", "Big news today"), 1.0);
        assert_eq!(similarity("", ""), 1.0);
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        assert_eq!(similarity("BIG  news\ttoday", "big news today"), 1.0);
    }

    #[test]
    fn test_empty_against_text() {
        assert_eq!(similarity("", "hello"), 0.0);
        assert_eq!(similarity("   ", "hello"), 0.0);
    }

    #[test]
    fn test_known_ratio() {
        // LCS("abcd", "abed") = "abd" -> 2 * 3 / 8
        assert_eq!(similarity("abcd", "abed"), 0.75);
        // No shared characters
        assert_eq!(similarity("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_symmetry_on_asymmetric_lengths() {
        let a = "Five lessons from scaling a startup";
        let b = "Five lessons I learned scaling my first startup";
        assert_eq!(similarity(a, b), similarity(b, a));
        assert!(similarity(a, b) > 0.5 && similarity(a, b) < 1.0);
    }

    #[test]
    fn test_upper_bound_dominates() {
        let a = "short";
        let b = "a considerably longer string";
        assert!(similarity(a, b) <= similarity_upper_bound(a.len(), b.len()));
        assert_eq!(similarity_upper_bound(0, 0), 1.0);
        assert_eq!(similarity_upper_bound(4, 4), 1.0);
    }
}
