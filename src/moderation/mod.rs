// Content moderation: classifier client and threshold policy.
//
// The ModerationClassifier trait defines the interface. OpenAiModerator
// implements it against the OpenAI moderation endpoint. The policy module
// turns the returned category scores into a verdict.

pub mod openai;
pub mod policy;
pub mod traits;
