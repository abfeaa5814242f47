use super::config::{Config, DEFAULT_CONFIG_PATH};
use super::event::{is_pull_request_event, load_event};
use super::{Host, error_annotation};
use crate::Result;
use crate::github::{CommentThread, GitHubThread, delete_failure_comments, upsert_failure_comment};
use crate::rules::{self, AttributeEnvironment, PullRequestSnapshot, Report};
use camino::Utf8PathBuf;
use clap::Args;
use ohno::{AppError, app_err};
use std::io::Write;

const LOG_TARGET: &str = "     check";

/// Exit status when the rules or the event cannot be loaded
const SETUP_FAILURE_EXIT_CODE: i32 = 2;

/// Exit status when at least one rule failed
const LINT_FAILURE_EXIT_CODE: i32 = 1;

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Path to the rules file, relative to the workspace
    #[arg(value_name = "CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: Utf8PathBuf,

    /// Path to the webhook payload that triggered the workflow
    #[arg(long, value_name = "PATH", env = "GITHUB_EVENT_PATH")]
    pub event_path: Option<Utf8PathBuf>,

    /// Name of the event that triggered the workflow
    #[arg(long, value_name = "NAME", env = "GITHUB_EVENT_NAME", default_value = "")]
    pub event_name: String,

    /// Repository the pull request belongs to
    #[arg(long, value_name = "OWNER/REPO", env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    /// Token used to manage the failure comment
    #[arg(long, value_name = "TOKEN", env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// GitHub API endpoint
    #[arg(long, value_name = "URL", env = "GITHUB_API_URL")]
    pub api_url: Option<String>,

    /// Directory that relative config paths are resolved against
    #[arg(long, value_name = "PATH", env = "GITHUB_WORKSPACE")]
    pub workspace: Option<Utf8PathBuf>,
}

/// Load the rules and the event, evaluate, and report the outcome
///
/// # Errors
///
/// Returns an error if setup fails or if any rule failed
pub async fn check<H: Host>(host: &mut H, args: &CheckArgs) -> Result<()> {
    let config = match Config::load(&args.config, args.workspace.as_deref()) {
        Ok(config) => config,
        Err(e) => return Err(setup_failure(host, "failed to read config", e)),
    };
    log::debug!(target: LOG_TARGET, "loaded rules {:?} from '{}'", config.rules.keys(), config.path);

    let pr = match load_pull_request(args) {
        Ok(pr) => pr,
        Err(e) => return Err(setup_failure(host, "failed to load event from GitHub", e)),
    };
    log::debug!(target: LOG_TARGET, "pull request: {pr:?}");

    let env = AttributeEnvironment::bind(&pr);
    let report = rules::run(&config.rules, &env);

    if !is_pull_request_event(&args.event_name) {
        log::debug!(target: LOG_TARGET, "event '{}' is not a pull request, skipping comment", args.event_name);
    } else if pr.number == 0 {
        log::warn!(target: LOG_TARGET, "event '{}' has no pull request number, skipping comment", args.event_name);
    } else {
        match open_thread(args, &pr) {
            Ok(mut thread) => sync_comment(host, &mut thread, &report).await,
            Err(e) => {
                log::warn!(target: LOG_TARGET, "comment sync skipped: {e}");
                let _ = writeln!(host.error(), "failed to create GitHub client: {e}");
            }
        }
    }

    finish(host, &report)
}

fn load_pull_request(args: &CheckArgs) -> Result<PullRequestSnapshot> {
    let path = args.event_path.as_ref().ok_or_else(|| app_err!("GITHUB_EVENT_PATH is not set"))?;
    load_event(path)
}

fn open_thread(args: &CheckArgs, pr: &PullRequestSnapshot) -> Result<GitHubThread> {
    let repository = args.repository.as_deref().ok_or_else(|| app_err!("GITHUB_REPOSITORY is not set"))?;
    GitHubThread::new(args.github_token.as_deref(), args.api_url.as_deref(), repository, pr.number)
}

/// Bring the failure comment in line with the report
///
/// Errors are reported as warnings and never change the outcome of the run.
pub async fn sync_comment<H: Host, T: CommentThread>(host: &mut H, thread: &mut T, report: &Report) {
    if report.passed() {
        if let Err(e) = delete_failure_comments(thread).await {
            log::warn!(target: LOG_TARGET, "unable to delete failure comment: {e}");
            let _ = writeln!(host.error(), "warn: comment delete: {e}");
        }
    } else if let Err(e) = upsert_failure_comment(thread, &report.text()).await {
        log::warn!(target: LOG_TARGET, "unable to post failure comment: {e}");
        let _ = writeln!(host.error(), "warn: comment upsert: {e}");
    }
}

fn setup_failure<H: Host>(host: &mut H, context: &str, e: AppError) -> AppError {
    let _ = writeln!(host.output(), "{}", error_annotation(&format!("{context}: {e}")));
    host.exit(SETUP_FAILURE_EXIT_CODE);
    e
}

fn finish<H: Host>(host: &mut H, report: &Report) -> Result<()> {
    if report.passed() {
        let _ = writeln!(host.output(), "celguard passed");
        return Ok(());
    }

    let _ = writeln!(host.output(), "{report}");
    host.exit(LINT_FAILURE_EXIT_CODE);
    Err(AppError::new("one or more celguard rules failed"))
}
