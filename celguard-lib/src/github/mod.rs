//! Reporting results back to the pull request on GitHub

mod client;
mod comments;

pub use client::GitHubThread;
pub use comments::{CommentThread, MARKER, ThreadComment, delete_failure_comments, failure_comment_body, upsert_failure_comment};

#[cfg(test)]
pub use comments::MemoryThread;
