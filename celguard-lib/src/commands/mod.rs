//! Command-line interface and orchestration for celguard
//!
//! This module wires the rule engine to its surroundings: it parses the
//! command line, loads the rules file and the webhook payload, runs the rules
//! and reports the outcome.
//!
//! # Execution Flow
//!
//! 1. Parse arguments (most of them default from the GitHub Actions environment)
//! 2. Load the rules from `.github/celguard.yaml` (or the given path)
//! 3. Load the pull request from the event payload
//! 4. Evaluate the rules using [`crate::rules`]
//! 5. On `pull_request` events, create, update, or delete the failure comment
//! 6. Print the report and exit with status 1 if any rule failed
//!
//! Problems loading the rules or the event are reported as a workflow error
//! annotation and exit with status 2.

mod check;
mod common;
mod config;
mod event;
mod host;
mod run;

pub use check::{CheckArgs, check, sync_comment};
pub use common::{LogLevel, error_annotation, init_logging};
pub use config::{Config, DEFAULT_CONFIG_PATH};
pub use event::{is_pull_request_event, load_event, parse_event};
pub use host::Host;
pub use run::run;
