// Moderation classifier trait.
//
// The pipeline only needs per-category scores plus the raw response body
// (published verbatim as a workflow output), so that is all the trait exposes.

use anyhow::Result;
use async_trait::async_trait;

/// Per-category risk scores, in the order the classifier returned them.
pub type CategoryScores = Vec<(String, f64)>;

/// The result of classifying a single piece of text.
#[derive(Debug, Clone)]
pub struct ModerationResult {
    /// Category name to score (0.0 benign to 1.0 certain).
    pub category_scores: CategoryScores,
    /// Response body exactly as received, not re-serialized.
    pub raw_body: String,
}

/// Trait for classifying text. Async because providers are HTTP APIs.
#[async_trait]
pub trait ModerationClassifier: Send + Sync {
    /// Classify a single text. Any failure is fatal for the run.
    async fn classify(&self, text: &str) -> Result<ModerationResult>;
}
