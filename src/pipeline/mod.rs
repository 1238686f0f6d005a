// Moderation pipeline: one run, one decision.
//
//   config check -> classify -> evaluate -> publish outputs -> hide (if flagged)
//
// Everything up to and including publishing is fatal on failure. The hide
// step runs after outputs are published and only ever logs its failures.

use anyhow::Result;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::github::client::{ContentHider, GitHubClient};
use crate::github::event::EventPayload;
use crate::moderation::openai::OpenAiModerator;
use crate::moderation::policy::{evaluate, Verdict};
use crate::moderation::traits::ModerationClassifier;
use crate::output::OutputSink;

/// Switches that change what a run does, set from the CLI.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Publish outputs but never hide anything.
    pub dry_run: bool,
}

/// What happened to the hide step.
#[derive(Debug, Clone, PartialEq)]
pub enum HideOutcome {
    NotFlagged,
    DryRun,
    /// `GITHUB_EVENT_PATH` unset, missing, or unreadable.
    NoEventPayload,
    /// The event has no `comment.node_id`.
    NotAComment,
    MissingToken,
    Hidden(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub verdict: Verdict,
    pub hide: HideOutcome,
}

/// Run the pipeline against the real OpenAI and GitHub endpoints from config.
pub async fn execute(config: &Config, options: RunOptions) -> Result<RunOutcome> {
    let classifier = OpenAiModerator::new(&config.moderation_url, &config.openai_api_key)?;
    let hider = GitHubClient::new(&config.graphql_url, &config.github_token)?;
    let sink = OutputSink::from_config(config);

    run(config, &classifier, &hider, &sink, options).await
}

/// Run the pipeline with explicit collaborators.
///
/// Missing moderation inputs fail here, before the classifier is called.
pub async fn run(
    config: &Config,
    classifier: &dyn ModerationClassifier,
    hider: &dyn ContentHider,
    sink: &OutputSink,
    options: RunOptions,
) -> Result<RunOutcome> {
    config.require_moderation()?;

    let result = classifier.classify(&config.text_to_moderate).await?;
    let verdict = evaluate(&result.category_scores, &config.thresholds);

    info!(
        is_inappropriate = verdict.is_inappropriate,
        flagged = %verdict.flagged_categories.join(","),
        "Moderation complete"
    );

    sink.publish(&verdict, &result.raw_body)?;

    let hide = if !verdict.is_inappropriate {
        HideOutcome::NotFlagged
    } else if options.dry_run {
        info!("Content flagged as inappropriate. Dry run, not hiding.");
        HideOutcome::DryRun
    } else {
        info!("Content flagged as inappropriate. Attempting to hide.");
        hide_flagged_comment(config, hider).await
    };

    Ok(RunOutcome { verdict, hide })
}

/// Find the triggering comment and hide it. Never fails the run.
async fn hide_flagged_comment(config: &Config, hider: &dyn ContentHider) -> HideOutcome {
    let Some(event_path) = config.event_path.as_deref().filter(|p| p.exists()) else {
        warn!("GITHUB_EVENT_PATH not found. Cannot determine content to hide.");
        return HideOutcome::NoEventPayload;
    };

    let payload = match EventPayload::from_file(event_path) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %format!("{e:#}"), "Cannot determine content to hide.");
            return HideOutcome::NoEventPayload;
        }
    };

    let Some(node_id) = payload.comment_node_id() else {
        warn!("Hiding content is currently only supported for comments.");
        return HideOutcome::NotAComment;
    };

    if config.github_token.is_empty() {
        warn!("GitHub token is missing. Cannot hide the comment.");
        return HideOutcome::MissingToken;
    }

    match hider.hide(node_id).await {
        Ok(()) => {
            info!(node_id = node_id, "Successfully hid comment with node_id: {node_id}");
            HideOutcome::Hidden(node_id.to_string())
        }
        Err(e) => {
            let message = format!("{e:#}");
            error!(node_id = node_id, error = %message, "Failed to hide comment");
            HideOutcome::Failed(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moderation::traits::ModerationResult;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct FixedClassifier(Vec<(&'static str, f64)>);

    #[async_trait]
    impl ModerationClassifier for FixedClassifier {
        async fn classify(&self, _text: &str) -> Result<ModerationResult> {
            Ok(ModerationResult {
                category_scores: self.0.iter().map(|(c, s)| (c.to_string(), *s)).collect(),
                raw_body: "{}".to_string(),
            })
        }
    }

    struct UnreachableClassifier;

    #[async_trait]
    impl ModerationClassifier for UnreachableClassifier {
        async fn classify(&self, _text: &str) -> Result<ModerationResult> {
            panic!("classifier must not be called without moderation inputs");
        }
    }

    #[derive(Default)]
    struct RecordingHider {
        hidden: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ContentHider for RecordingHider {
        async fn hide(&self, node_id: &str) -> Result<()> {
            self.hidden.lock().unwrap().push(node_id.to_string());
            Ok(())
        }
    }

    fn config(dir: &tempfile::TempDir, event: Option<&str>) -> Config {
        let mut vars = HashMap::from([
            ("INPUT_OPENAI-API-KEY".to_string(), "sk-test".to_string()),
            ("INPUT_TEXT-TO-MODERATE".to_string(), "hello".to_string()),
            ("INPUT_GITHUB-TOKEN".to_string(), "ghp-test".to_string()),
        ]);
        if let Some(json) = event {
            let path = dir.path().join("event.json");
            std::fs::write(&path, json).unwrap();
            vars.insert(
                "GITHUB_EVENT_PATH".to_string(),
                path.to_string_lossy().into_owned(),
            );
        }
        Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
    }

    #[tokio::test]
    async fn test_flagged_comment_is_hidden_once() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = config(&dir, Some(r#"{"comment":{"node_id":"ABC123"}}"#));
        let sink = OutputSink::File(dir.path().join("out"));
        let hider = RecordingHider::default();

        let outcome = run(
            &config,
            &FixedClassifier(vec![("hate", 0.9)]),
            &hider,
            &sink,
            RunOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(outcome.hide, HideOutcome::Hidden("ABC123".to_string()));
        assert_eq!(*hider.hidden.lock().unwrap(), vec!["ABC123".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_inputs_fail_before_classifying() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = config(&dir, None);
        config.text_to_moderate.clear();
        let sink = OutputSink::File(dir.path().join("out"));

        let result = run(
            &config,
            &UnreachableClassifier,
            &RecordingHider::default(),
            &sink,
            RunOptions::default(),
        )
        .await;

        assert!(result.is_err());
        assert!(!dir.path().join("out").exists());
    }

    #[tokio::test]
    async fn test_clean_text_is_left_alone() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = config(&dir, Some(r#"{"comment":{"node_id":"ABC123"}}"#));
        let sink = OutputSink::File(dir.path().join("out"));
        let hider = RecordingHider::default();

        let outcome = run(
            &config,
            &FixedClassifier(vec![("hate", 0.5), ("violence", 0.1)]),
            &hider,
            &sink,
            RunOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(outcome.hide, HideOutcome::NotFlagged);
        assert!(hider.hidden.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_no_event_path_skips_hide() {
        let dir = tempfile::TempDir::new().unwrap();
        let sink = OutputSink::File(dir.path().join("out"));
        let hider = RecordingHider::default();

        let outcome = run(
            &config(&dir, None),
            &FixedClassifier(vec![("violence", 0.99)]),
            &hider,
            &sink,
            RunOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(outcome.hide, HideOutcome::NoEventPayload);
        assert!(outcome.verdict.is_inappropriate);
        assert!(hider.hidden.lock().unwrap().is_empty());
    }
}
