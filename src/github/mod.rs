// GitHub: locating and hiding the comment that triggered the workflow.
//
// event reads the webhook payload the runner saved to $GITHUB_EVENT_PATH.
// client minimizes the comment through the GraphQL API.

pub mod client;
pub mod event;
