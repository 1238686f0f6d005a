// Threshold policy: turns category scores into a verdict.
//
// A category is violated only when its score is strictly above its
// threshold. Categories without a threshold are unmonitored.

use std::collections::HashMap;

use super::traits::CategoryScores;

/// Cutoff used for every monitored category unless overridden.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Categories monitored out of the box.
pub const MONITORED_CATEGORIES: [&str; 5] =
    ["hate", "hate/threatening", "sexual", "violence", "self-harm"];

/// Per-category cutoffs.
#[derive(Debug, Clone, PartialEq)]
pub struct Thresholds {
    cutoffs: HashMap<String, f64>,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            cutoffs: MONITORED_CATEGORIES
                .iter()
                .map(|c| (c.to_string(), DEFAULT_THRESHOLD))
                .collect(),
        }
    }
}

impl Thresholds {
    /// Thresholds with no monitored categories.
    #[cfg(test)]
    pub fn empty() -> Self {
        Self {
            cutoffs: HashMap::new(),
        }
    }

    /// Set (or add) the cutoff for a category.
    pub fn set(&mut self, category: &str, cutoff: f64) {
        self.cutoffs.insert(category.to_string(), cutoff);
    }

    /// Builder-style variant of [`Thresholds::set`].
    #[cfg(test)]
    pub fn with(mut self, category: &str, cutoff: f64) -> Self {
        self.set(category, cutoff);
        self
    }

    pub fn get(&self, category: &str) -> Option<f64> {
        self.cutoffs.get(category).copied()
    }

    /// Monitored categories and their cutoffs, sorted by name for display.
    pub fn sorted(&self) -> Vec<(&str, f64)> {
        let mut entries: Vec<(&str, f64)> = self
            .cutoffs
            .iter()
            .map(|(c, v)| (c.as_str(), *v))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

/// Outcome of evaluating one set of scores.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Verdict {
    pub is_inappropriate: bool,
    /// Violated categories, in score order.
    pub flagged_categories: Vec<String>,
}

/// Compare every scored category against its threshold.
pub fn evaluate(scores: &CategoryScores, thresholds: &Thresholds) -> Verdict {
    let flagged_categories: Vec<String> = scores
        .iter()
        .filter(|(category, score)| {
            thresholds
                .get(category)
                .is_some_and(|cutoff| *score > cutoff)
        })
        .map(|(category, _)| category.clone())
        .collect();

    Verdict {
        is_inappropriate: !flagged_categories.is_empty(),
        flagged_categories,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(pairs: &[(&str, f64)]) -> CategoryScores {
        pairs.iter().map(|(c, s)| (c.to_string(), *s)).collect()
    }

    #[test]
    fn test_score_above_threshold_is_flagged() {
        let thresholds = Thresholds::default().with("hate", 0.8);
        let verdict = evaluate(&scores(&[("hate", 0.9), ("violence", 0.2)]), &thresholds);
        assert!(verdict.is_inappropriate);
        assert_eq!(verdict.flagged_categories, vec!["hate"]);
    }

    #[test]
    fn test_equal_score_is_not_flagged() {
        let thresholds = Thresholds::default();
        let verdict = evaluate(&scores(&[("hate", 0.5), ("sexual", 0.5)]), &thresholds);
        assert!(!verdict.is_inappropriate);
        assert!(verdict.flagged_categories.is_empty());
    }

    #[test]
    fn test_clean_scores() {
        let all_low = scores(&[
            ("hate", 0.1),
            ("hate/threatening", 0.1),
            ("sexual", 0.1),
            ("violence", 0.1),
            ("self-harm", 0.1),
        ]);
        assert_eq!(evaluate(&all_low, &Thresholds::default()), Verdict::default());
    }

    #[test]
    fn test_unmonitored_category_is_ignored() {
        let verdict = evaluate(
            &scores(&[("harassment", 0.99), ("sexual/minors", 0.99)]),
            &Thresholds::default(),
        );
        assert!(!verdict.is_inappropriate);
    }

    #[test]
    fn test_flag_order_follows_scores() {
        let verdict = evaluate(
            &scores(&[("violence", 0.95), ("hate", 0.9), ("self-harm", 0.7)]),
            &Thresholds::default(),
        );
        assert_eq!(verdict.flagged_categories, vec!["violence", "hate", "self-harm"]);
    }

    #[test]
    fn test_empty_thresholds_never_flag() {
        let verdict = evaluate(&scores(&[("hate", 1.0)]), &Thresholds::empty());
        assert!(!verdict.is_inappropriate);
    }
}
