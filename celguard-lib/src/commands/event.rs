//! Loading of the GitHub webhook payload that triggered the run

use crate::Result;
use crate::rules::PullRequestSnapshot;
use camino::Utf8Path;
use ohno::IntoAppError;
use serde::Deserialize;
use std::fs;

/// Event names that carry a pull request we can comment on
const PULL_REQUEST_EVENTS: [&str; 2] = ["pull_request", "pull_request_target"];

/// Minimal webhook payload with only the fields we need
#[derive(Debug, Deserialize)]
struct Event {
    pull_request: Option<PullRequest>,
}

impl Event {
    fn into_snapshot(self) -> PullRequestSnapshot {
        self.pull_request.map(PullRequestSnapshot::from).unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct PullRequest {
    number: Option<u64>,
    title: Option<String>,
    body: Option<String>,
    user: Option<User>,
    base: Option<GitRef>,
    head: Option<GitRef>,
    labels: Option<Vec<Label>>,
}

#[derive(Debug, Deserialize)]
struct User {
    login: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitRef {
    #[serde(rename = "ref")]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Label {
    name: Option<String>,
}

impl From<PullRequest> for PullRequestSnapshot {
    fn from(pr: PullRequest) -> Self {
        Self {
            number: pr.number.unwrap_or_default(),
            title: pr.title.unwrap_or_default(),
            body: pr.body.unwrap_or_default(),
            author: pr.user.and_then(|u| u.login).unwrap_or_default(),
            base_ref: pr.base.and_then(|r| r.name).unwrap_or_default(),
            head_ref: pr.head.and_then(|r| r.name).unwrap_or_default(),
            labels: pr
                .labels
                .unwrap_or_default()
                .into_iter()
                .map(|label| label.name.unwrap_or_default())
                .collect(),
        }
    }
}

/// Read the event payload at `path`
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid JSON
pub fn load_event(path: &Utf8Path) -> Result<PullRequestSnapshot> {
    let text = fs::read_to_string(path).into_app_err_with(|| format!("reading event payload '{path}'"))?;
    let event: Event = serde_json::from_str(&text).into_app_err_with(|| format!("parsing event payload '{path}'"))?;
    Ok(event.into_snapshot())
}

/// Parse an event payload
///
/// Payloads without a `pull_request` object produce an empty snapshot.
///
/// # Errors
///
/// Returns an error if the text is not valid JSON
pub fn parse_event(text: &str) -> Result<PullRequestSnapshot> {
    let event: Event = serde_json::from_str(text)?;
    Ok(event.into_snapshot())
}

/// Whether the named event allows commenting on a pull request
#[must_use]
pub fn is_pull_request_event(event_name: &str) -> bool {
    PULL_REQUEST_EVENTS.contains(&event_name)
}
