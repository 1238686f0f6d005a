use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::moderation::policy::Thresholds;

/// Default OpenAI moderation endpoint.
pub const DEFAULT_MODERATION_URL: &str = "https://api.openai.com/v1/moderations";

/// Default GitHub GraphQL endpoint.
pub const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";

/// Timeout applied to every outbound HTTP call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent sent to both APIs.
pub const USER_AGENT: &str = concat!("comment-guard/", env!("CARGO_PKG_VERSION"));

/// Threshold inputs and the category each one controls.
pub const THRESHOLD_INPUTS: [(&str, &str); 5] = [
    ("INPUT_THRESHOLD-HATE", "hate"),
    ("INPUT_THRESHOLD-HATE-THREATENING", "hate/threatening"),
    ("INPUT_THRESHOLD-SEXUAL", "sexual"),
    ("INPUT_THRESHOLD-VIOLENCE", "violence"),
    ("INPUT_THRESHOLD-SELF-HARM", "self-harm"),
];

/// Central configuration loaded from environment variables.
///
/// Inputs follow the GitHub Actions convention (`INPUT_<NAME>`), so the
/// binary runs unchanged as an action step. A `.env` file is loaded at
/// startup via dotenvy for local runs.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub text_to_moderate: String,
    /// Only needed for the hide step. Empty means "skip hiding".
    pub github_token: String,
    pub thresholds: Thresholds,
    /// `$GITHUB_OUTPUT`. When unset, outputs go to stdout in the legacy format.
    pub output_path: Option<PathBuf>,
    /// `$GITHUB_EVENT_PATH`, the webhook payload that triggered the workflow.
    pub event_path: Option<PathBuf>,
    pub moderation_url: String,
    pub graphql_url: String,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset, matching how the Actions runner
    /// passes omitted inputs. Threshold values must parse as finite numbers.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut thresholds = Thresholds::default();
        for (key, category) in THRESHOLD_INPUTS {
            if let Some(raw) = get(key) {
                let value: f64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("{key} must be a number, got {raw:?}"))?;
                if !value.is_finite() {
                    anyhow::bail!("{key} must be a finite number, got {raw:?}");
                }
                thresholds.set(category, value);
            }
        }

        Ok(Self {
            openai_api_key: get("INPUT_OPENAI-API-KEY").unwrap_or_default(),
            text_to_moderate: get("INPUT_TEXT-TO-MODERATE").unwrap_or_default(),
            github_token: get("INPUT_GITHUB-TOKEN").unwrap_or_default(),
            thresholds,
            output_path: get("GITHUB_OUTPUT").map(PathBuf::from),
            event_path: get("GITHUB_EVENT_PATH").map(PathBuf::from),
            moderation_url: get("COMMENT_GUARD_MODERATION_URL")
                .unwrap_or_else(|| DEFAULT_MODERATION_URL.to_string()),
            graphql_url: get("COMMENT_GUARD_GRAPHQL_URL")
                .unwrap_or_else(|| DEFAULT_GRAPHQL_URL.to_string()),
        })
    }

    /// Check that the moderation inputs are present.
    /// Call this before contacting the classifier.
    pub fn require_moderation(&self) -> Result<()> {
        if self.openai_api_key.is_empty() || self.text_to_moderate.is_empty() {
            anyhow::bail!("Missing required inputs (openai-api-key or text-to-moderate).");
        }
        Ok(())
    }
}
