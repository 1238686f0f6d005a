// comment-guard: moderate GitHub comments and hide the flagged ones.
//
// This is the library root. Each module corresponds to one step of the
// moderation pipeline.

pub mod config;
pub mod github;
pub mod moderation;
pub mod output;
pub mod pipeline;
