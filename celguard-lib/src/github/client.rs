//! GitHub-backed comment thread

use super::{CommentThread, ThreadComment};
use crate::Result;
use octocrab::Octocrab;
use octocrab::models::CommentId;
use octocrab::models::issues::Comment;
use ohno::app_err;

const LOG_TARGET: &str = "    github";
const COMMENT_PAGE_SIZE: u8 = 100;

/// The issue-comment conversation of one pull request on GitHub
#[derive(Debug, Clone)]
pub struct GitHubThread {
    octocrab: Octocrab,
    owner: String,
    repo: String,
    number: u64,
}

impl GitHubThread {
    /// Create a client for pull request `number` in `repository` (`owner/repo`)
    ///
    /// `api_url` overrides the API endpoint, e.g. for GitHub Enterprise Server.
    pub fn new(token: Option<&str>, api_url: Option<&str>, repository: &str, number: u64) -> Result<Self> {
        let token = token.filter(|t| !t.is_empty()).ok_or_else(|| app_err!("GITHUB_TOKEN is not set"))?;
        let (owner, repo) = parse_repository(repository)?;

        let mut builder = Octocrab::builder().personal_token(token.to_string());
        if let Some(url) = api_url.filter(|u| !u.is_empty()) {
            builder = builder.base_uri(url)?;
        }

        Ok(Self {
            octocrab: builder.build()?,
            owner: owner.to_string(),
            repo: repo.to_string(),
            number,
        })
    }
}

/// Split an `owner/repo` string
fn parse_repository(repository: &str) -> Result<(&str, &str)> {
    match repository.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() => Ok((owner, repo)),
        _ => Err(app_err!("invalid repository '{repository}', expected 'owner/repo'")),
    }
}

fn to_thread_comment(comment: Comment) -> ThreadComment {
    ThreadComment {
        id: comment.id.into_inner(),
        body: comment.body,
    }
}

impl CommentThread for GitHubThread {
    async fn list(&self) -> Result<Vec<ThreadComment>> {
        log::debug!(target: LOG_TARGET, "Fetching comments for '{}/{}#{}'", self.owner, self.repo, self.number);

        let mut page = self
            .octocrab
            .issues(&self.owner, &self.repo)
            .list_comments(self.number)
            .per_page(COMMENT_PAGE_SIZE)
            .send()
            .await?;

        let mut comments = page.take_items();

        while let Some(next_uri) = &page.next {
            let next_page_result = self.octocrab.get_page::<Comment>(&Some(next_uri.clone())).await?;

            if let Some(mut next_page) = next_page_result {
                comments.append(&mut next_page.take_items());
                page = next_page;
            } else {
                break;
            }
        }

        Ok(comments.into_iter().map(to_thread_comment).collect())
    }

    async fn create(&mut self, body: &str) -> Result<()> {
        let _ = self
            .octocrab
            .issues(&self.owner, &self.repo)
            .create_comment(self.number, body)
            .await?;
        Ok(())
    }

    async fn edit(&mut self, id: u64, body: &str) -> Result<()> {
        let _ = self
            .octocrab
            .issues(&self.owner, &self.repo)
            .update_comment(CommentId::from(id), body)
            .await?;
        Ok(())
    }

    async fn delete(&mut self, id: u64) -> Result<()> {
        self.octocrab
            .issues(&self.owner, &self.repo)
            .delete_comment(CommentId::from(id))
            .await?;
        Ok(())
    }
}
