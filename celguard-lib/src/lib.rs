#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for celguard
//!
//! This library consolidates all functionality for the celguard tool, which checks
//! pull request metadata against user-defined CEL rules.
//!
//! # Module Organization
//!
//! - [`commands`]: Command-line interface and orchestration
//! - [`rules`]: Attribute binding, rule evaluation, and report aggregation
//! - [`github`]: Failure comment lifecycle on the pull request

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

pub mod commands;
pub mod github;
pub mod rules;

pub use crate::commands::{Host, run};
