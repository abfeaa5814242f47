//! Rule evaluation using CEL
//!
//! This module implements the engine that checks a pull request against the
//! rules declared in the configuration file. It uses CEL (Common Expression
//! Language) to provide a safe, side-effect-free evaluation environment.
//!
//! # Implementation Model
//!
//! 1. [`AttributeEnvironment::bind`] projects a [`PullRequestSnapshot`] into a
//!    key→value lookup plus an aggregate record.
//! 2. [`evaluate`] compiles one rule, binds `value` (the attribute named by the
//!    rule's key, or `null`) and `pr` (the aggregate record), executes it and
//!    classifies the result as passed, failed, or defective. Expressions may
//!    only read those two variables, and can call the string extension
//!    functions (`lowerAscii`, `split`, `trim`, ...) on top of the CEL builtins.
//! 3. [`run`] walks a [`RuleSet`] in declaration order and folds the outcomes
//!    into a [`Report`]. Failures accumulate; the first defect ends the run and
//!    becomes the only line of the report.
//!
//! Report lines always have the form `[<rule-key>] <message>`.

mod attributes;
mod evaluation_outcome;
mod evaluator;
mod pull_request;
mod report;
mod rule;
mod rule_set;
mod string_functions;

pub use attributes::{ATTRIBUTE_NAMES, AggregateRecord, AttributeEnvironment, AttributeValue};
pub use evaluation_outcome::{Disposition, EvaluationOutcome};
pub use evaluator::{PR_BINDING, VALUE_BINDING, evaluate};
pub use pull_request::PullRequestSnapshot;
pub use report::{Report, run};
pub use rule::Rule;
pub use rule_set::RuleSet;
