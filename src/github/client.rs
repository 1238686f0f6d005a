// GitHub GraphQL client: hides comments with `minimizeComment`.
//
// GraphQL reports most failures as HTTP 200 with an `errors` array, so a
// successful status alone is not treated as success.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{REQUEST_TIMEOUT, USER_AGENT};

/// Reason recorded on the minimized comment.
pub const MINIMIZE_CLASSIFIER: &str = "OFF_TOPIC";

const MINIMIZE_COMMENT_MUTATION: &str = "\
mutation MinimizeComment($input: MinimizeCommentInput!) {
  minimizeComment(input: $input) {
    clientMutationId
  }
}";

/// Anything that can hide a piece of content by node id.
#[async_trait]
pub trait ContentHider: Send + Sync {
    async fn hide(&self, node_id: &str) -> Result<()>;
}

/// Client for the GitHub GraphQL endpoint.
pub struct GitHubClient {
    client: reqwest::Client,
    url: String,
    token: String,
}

impl GitHubClient {
    /// Create a client for the given GraphQL URL and token.
    pub fn new(url: &str, token: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            url: url.to_string(),
            token: token.to_string(),
        })
    }

    /// Minimize a comment, classifying it as off-topic.
    pub async fn minimize_comment(&self, node_id: &str) -> Result<()> {
        let request = GraphQlRequest {
            query: MINIMIZE_COMMENT_MUTATION,
            variables: MinimizeVariables {
                input: MinimizeCommentInput {
                    subject_id: node_id,
                    classifier: MINIMIZE_CLASSIFIER,
                },
            },
        };

        debug!(node_id = node_id, "Sending minimizeComment mutation");

        // GitHub documents the lowercase `bearer` scheme for GraphQL.
        let response = self
            .client
            .post(&self.url)
            .header(AUTHORIZATION, format!("bearer {}", self.token))
            .json(&request)
            .send()
            .await
            .context("Failed to call GitHub GraphQL API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("GitHub GraphQL API returned {}: {}", status, body);
        }

        let body: GraphQlResponse = response
            .json()
            .await
            .context("Failed to parse GitHub GraphQL response")?;

        let errors = body.errors.unwrap_or_default();
        if !errors.is_empty() {
            let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
            anyhow::bail!("minimizeComment failed: {}", messages.join("; "));
        }

        Ok(())
    }
}

#[async_trait]
impl ContentHider for GitHubClient {
    async fn hide(&self, node_id: &str) -> Result<()> {
        self.minimize_comment(node_id).await
    }
}

// --- GraphQL request/response types ---

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: MinimizeVariables<'a>,
}

#[derive(Serialize)]
struct MinimizeVariables<'a> {
    input: MinimizeCommentInput<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MinimizeCommentInput<'a> {
    subject_id: &'a str,
    classifier: &'a str,
}

#[derive(Deserialize)]
struct GraphQlResponse {
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}
