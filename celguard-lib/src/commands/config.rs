use crate::Result;
use crate::rules::RuleSet;
use camino::{Utf8Path, Utf8PathBuf};
use ohno::IntoAppError;
use std::fs;

/// Where the rules live when no path is given
pub const DEFAULT_CONFIG_PATH: &str = ".github/celguard.yaml";

#[derive(Debug)]
pub struct Config {
    /// The file the rules were read from
    pub path: Utf8PathBuf,

    /// Rules in declaration order
    pub rules: RuleSet,
}

impl Config {
    /// Load the rules file
    ///
    /// Relative paths are resolved against `workspace` when one is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load(config_path: &Utf8Path, workspace: Option<&Utf8Path>) -> Result<Self> {
        let path = resolve_config_path(config_path, workspace);
        let text = fs::read_to_string(&path).into_app_err_with(|| format!("reading celguard configuration file '{path}'"))?;
        let rules = serde_yaml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{path}'"))?;

        Ok(Self { path, rules })
    }

    /// Parse the YAML text of a rules file
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a mapping of rule names to rules
    pub fn parse(text: &str) -> Result<RuleSet> {
        serde_yaml::from_str(text).into_app_err("parsing YAML rules")
    }
}

fn resolve_config_path(path: &Utf8Path, workspace: Option<&Utf8Path>) -> Utf8PathBuf {
    match workspace {
        Some(root) if path.is_relative() && !root.as_str().is_empty() => root.join(path),
        _ => path.to_path_buf(),
    }
}
