// Webhook event payload: only `comment.node_id` is consumed.
//
// Every problem here is recoverable: the verdict is already published by
// the time we look at the payload, so callers just skip the hide step.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct EventPayload {
    #[serde(default)]
    pub comment: Option<CommentRef>,
}

#[derive(Debug, Deserialize)]
pub struct CommentRef {
    #[serde(default)]
    pub node_id: Option<String>,
}

impl EventPayload {
    /// Read and parse a payload file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read event payload {}", path.display()))?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse event payload")
    }

    /// The comment's GraphQL node id, if this event carries a comment.
    pub fn comment_node_id(&self) -> Option<&str> {
        self.comment
            .as_ref()
            .and_then(|c| c.node_id.as_deref())
            .filter(|id| !id.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_comment_event() {
        let payload = EventPayload::from_json(
            r#"{"action":"created","comment":{"id":1,"body":"hi","node_id":"IC_kwDOABC123"},
                "issue":{"node_id":"I_kwDOXYZ"}}"#,
        )
        .unwrap();
        assert_eq!(payload.comment_node_id(), Some("IC_kwDOABC123"));
    }

    #[test]
    fn test_non_comment_event() {
        let payload =
            EventPayload::from_json(r#"{"action":"opened","issue":{"node_id":"I_kwDOXYZ"}}"#)
                .unwrap();
        assert_eq!(payload.comment_node_id(), None);
    }

    #[test]
    fn test_comment_without_node_id() {
        let payload = EventPayload::from_json(r#"{"comment":{"body":"hi"}}"#).unwrap();
        assert_eq!(payload.comment_node_id(), None);

        let payload = EventPayload::from_json(r#"{"comment":{"node_id":""}}"#).unwrap();
        assert_eq!(payload.comment_node_id(), None);
    }

    #[test]
    fn test_invalid_json() {
        assert!(EventPayload::from_json("{not json").is_err());
    }
}
