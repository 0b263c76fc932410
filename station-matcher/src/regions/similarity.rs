//! String similarity scoring.

/// Scores how alike two names are, from 0.0 (nothing shared) to 1.0
/// (identical).
///
/// Any `Fn(&str, &str) -> f64` is a scorer.
pub trait SimilarityScorer {
    fn score(&self, a: &str, b: &str) -> f64;
}

impl<F> SimilarityScorer for F
where
    F: Fn(&str, &str) -> f64,
{
    fn score(&self, a: &str, b: &str) -> f64 {
        self(a, b)
    }
}

/// Levenshtein distance normalized by the longer string's length.
#[derive(Debug, Clone, Copy, Default)]
pub struct Levenshtein;

impl SimilarityScorer for Levenshtein {
    fn score(&self, a: &str, b: &str) -> f64 {
        strsim::normalized_levenshtein(a, b)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn levenshtein_in_unit_range(a in "\\PC{0,12}", b in "\\PC{0,12}") {
            let s = Levenshtein.score(&a, &b);
            prop_assert!((0.0..=1.0).contains(&s));
            prop_assert!((s - Levenshtein.score(&b, &a)).abs() < 1e-12);
        }
    }
}
