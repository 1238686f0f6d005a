// OpenAI moderation API implementation.
//
// One POST per run, no retry. The raw body is kept alongside the parsed
// scores because the workflow output publishes it verbatim.
//
// API docs: https://platform.openai.com/docs/api-reference/moderations

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::traits::{CategoryScores, ModerationClassifier, ModerationResult};
use crate::config::{REQUEST_TIMEOUT, USER_AGENT};

/// OpenAI moderation classifier.
pub struct OpenAiModerator {
    client: Client,
    api_key: String,
    url: String,
}

impl OpenAiModerator {
    /// Create a moderator for the given endpoint and API key.
    pub fn new(url: &str, api_key: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl ModerationClassifier for OpenAiModerator {
    async fn classify(&self, text: &str) -> Result<ModerationResult> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&ModerationRequest { input: text })
            .send()
            .await
            .context("Failed to call OpenAI moderation API")?;

        let status = response.status();
        let raw_body = response
            .text()
            .await
            .context("Failed to read OpenAI moderation response")?;

        if !status.is_success() {
            anyhow::bail!("OpenAI moderation API returned {}: {}", status, raw_body);
        }

        let category_scores = parse_category_scores(&raw_body)?;

        debug!(
            categories = category_scores.len(),
            body_bytes = raw_body.len(),
            "Classified text"
        );

        Ok(ModerationResult {
            category_scores,
            raw_body,
        })
    }
}

/// Extract the first result's category scores, keeping response order.
pub fn parse_category_scores(body: &str) -> Result<CategoryScores> {
    let parsed: ModerationResponse =
        serde_json::from_str(body).context("Failed to parse OpenAI moderation response")?;

    let first = parsed
        .results
        .into_iter()
        .next()
        .context("OpenAI moderation response contained no results")?;

    first
        .category_scores
        .into_iter()
        .map(|(category, value)| match value.as_f64() {
            Some(score) => Ok((category, score)),
            None => anyhow::bail!("Score for category {category:?} is not a number: {value}"),
        })
        .collect()
}

// --- OpenAI request/response types ---

#[derive(Serialize)]
struct ModerationRequest<'a> {
    input: &'a str,
}

#[derive(Deserialize)]
struct ModerationResponse {
    results: Vec<ModerationEntry>,
}

#[derive(Deserialize)]
struct ModerationEntry {
    category_scores: serde_json::Map<String, serde_json::Value>,
}
