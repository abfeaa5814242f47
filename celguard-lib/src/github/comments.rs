//! Lifecycle of the failure comment posted on a pull request
//!
//! celguard keeps at most one comment per pull request. It is recognized by a
//! hidden marker, edited in place while the rules keep failing, and deleted once
//! they pass.

use crate::Result;

const LOG_TARGET: &str = "  comments";

/// Hidden HTML marker identifying comments written by celguard
pub const MARKER: &str = "<!-- celguard:konojunya/celguard -->";

const FAILURE_HEADER: &str = "### ❌ celguard failed";

/// A comment on a pull request conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadComment {
    pub id: u64,
    pub body: Option<String>,
}

impl ThreadComment {
    #[must_use]
    pub fn is_celguard(&self) -> bool {
        self.body.as_deref().is_some_and(|body| body.contains(MARKER))
    }
}

/// The conversation of a single pull request
pub trait CommentThread: Send {
    /// All comments, across every page
    fn list(&self) -> impl Future<Output = Result<Vec<ThreadComment>>> + Send;

    fn create(&mut self, body: &str) -> impl Future<Output = Result<()>> + Send;

    fn edit(&mut self, id: u64, body: &str) -> impl Future<Output = Result<()>> + Send;

    fn delete(&mut self, id: u64) -> impl Future<Output = Result<()>> + Send;
}

/// The full text of the failure comment for a report
#[must_use]
pub fn failure_comment_body(report: &str) -> String {
    format!("{MARKER}\n{FAILURE_HEADER}\n\n```\n{report}\n```")
}

/// Create the failure comment, or edit the existing one
pub async fn upsert_failure_comment<T: CommentThread>(thread: &mut T, report: &str) -> Result<()> {
    let body = failure_comment_body(report);
    let existing = thread.list().await?.into_iter().find(ThreadComment::is_celguard);

    if let Some(comment) = existing {
        log::debug!(target: LOG_TARGET, "editing failure comment {}", comment.id);
        thread.edit(comment.id, &body).await
    } else {
        log::debug!(target: LOG_TARGET, "creating failure comment");
        thread.create(&body).await
    }
}

/// Delete every failure comment, returning how many were removed
pub async fn delete_failure_comments<T: CommentThread>(thread: &mut T) -> Result<usize> {
    let stale: Vec<_> = thread.list().await?.into_iter().filter(ThreadComment::is_celguard).collect();

    for comment in &stale {
        log::debug!(target: LOG_TARGET, "deleting failure comment {}", comment.id);
        thread.delete(comment.id).await?;
    }

    Ok(stale.len())
}

/// In-memory thread used by tests
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryThread {
    pub comments: Vec<ThreadComment>,
    pub fail_requests: bool,
    next_id: u64,
}

#[cfg(test)]
impl MemoryThread {
    pub fn with_comments(bodies: &[&str]) -> Self {
        let mut thread = Self::default();
        for body in bodies {
            thread.push(body);
        }
        thread
    }

    pub fn failing() -> Self {
        Self {
            fail_requests: true,
            ..Self::default()
        }
    }

    fn push(&mut self, body: &str) {
        self.next_id += 1;
        self.comments.push(ThreadComment {
            id: self.next_id,
            body: Some(body.to_string()),
        });
    }

    fn check(&self) -> Result<()> {
        if self.fail_requests {
            return Err(ohno::app_err!("simulated API failure"));
        }
        Ok(())
    }
}

#[cfg(test)]
impl CommentThread for MemoryThread {
    async fn list(&self) -> Result<Vec<ThreadComment>> {
        self.check()?;
        Ok(self.comments.clone())
    }

    async fn create(&mut self, body: &str) -> Result<()> {
        self.check()?;
        self.push(body);
        Ok(())
    }

    async fn edit(&mut self, id: u64, body: &str) -> Result<()> {
        self.check()?;
        let comment = self
            .comments
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| ohno::app_err!("no comment {id}"))?;
        comment.body = Some(body.to_string());
        Ok(())
    }

    async fn delete(&mut self, id: u64) -> Result<()> {
        self.check()?;
        self.comments.retain(|c| c.id != id);
        Ok(())
    }
}
