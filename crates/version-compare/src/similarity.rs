use similar::{Algorithm, TextDiff};

/// Character similarity of two texts as a percentage with two decimals.
///
/// `2 * matched / (len_a + len_b)` over a character diff; two empty texts
/// are identical. The diff always runs to completion, so the score depends
/// on the texts alone; callers bound the cost through text size.
pub fn text_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 100.0;
    }

    let ratio = TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .diff_chars(a, b)
        .ratio() as f64;

    round2(ratio * 100.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_identical_texts() {
        assert_eq!(text_similarity("convenio marco", "convenio marco"), 100.0);
        assert_eq!(text_similarity("", ""), 100.0);
    }

    #[test]
    fn test_disjoint_texts() {
        assert_eq!(text_similarity("aaaa", "bbbb"), 0.0);
        assert_eq!(text_similarity("", "algo"), 0.0);
    }

    #[test]
    fn test_partial_overlap() {
        // 3 of 4 characters survive on each side: 2*3/8
        assert_eq!(text_similarity("abcd", "abcx"), 75.0);
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        assert_eq!(text_similarity("días", "dias"), 75.0);
    }

    #[test]
    fn test_rounds_to_two_decimals() {
        // 2*2/3 = 66.666...
        assert_eq!(text_similarity("ab", "a"), 66.67);
    }

    proptest! {
        #[test]
        fn similarity_is_a_percentage(a in "[a-c ]{0,40}", b in "[a-c ]{0,40}") {
            let pct = text_similarity(&a, &b);
            prop_assert!((0.0..=100.0).contains(&pct));
        }

        #[test]
        fn self_similarity_is_full(a in "\\PC{0,60}") {
            prop_assert_eq!(text_similarity(&a, &a), 100.0);
        }
    }
}
