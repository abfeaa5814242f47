use super::{AttributeEnvironment, RuleSet, evaluate};
use core::fmt;

const LOG_TARGET: &str = "   rules";

/// The result of running a rule set against a pull request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    lines: Vec<String>,
    fatal: bool,
}

impl Report {
    /// `true` when no rule failed and no rule was defective
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.lines.is_empty()
    }

    /// `true` when the run was cut short by a defective rule
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        self.fatal
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The newline-joined report text, empty on success
    #[must_use]
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

/// Evaluate every rule in order and aggregate the failures
///
/// # Evaluation policy:
/// 1. Rules run in declaration order
/// 2. A rule that evaluates to false adds a line and evaluation continues
/// 3. A defective rule (empty, uncompilable, failing, or non-boolean expression) stops
///    the run immediately; the report then holds that rule's line alone
#[must_use]
pub fn run(rules: &RuleSet, env: &AttributeEnvironment) -> Report {
    let mut lines = Vec::new();

    for rule in rules {
        let outcome = evaluate(rule, env);
        let Some(line) = outcome.report_line() else {
            continue;
        };

        if outcome.is_defect() {
            log::debug!(target: LOG_TARGET, "stopping at defective rule '{}'", outcome.key);
            return Report {
                lines: vec![line],
                fatal: true,
            };
        }

        lines.push(line);
    }

    Report { lines, fatal: false }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{PullRequestSnapshot, Rule};

    fn env() -> AttributeEnvironment {
        AttributeEnvironment::bind(&PullRequestSnapshot {
            number: 42,
            title: "Short".to_string(),
            body: String::new(),
            author: "konojunya".to_string(),
            base_ref: "develop".to_string(),
            head_ref: "feature".to_string(),
            labels: vec!["main".to_string()],
        })
    }

    fn rules(rules: Vec<Rule>) -> RuleSet {
        RuleSet::try_from(rules).unwrap()
    }

    #[test]
    fn test_all_true_passes() {
        let set = rules(vec![
            Rule::new("title", "value.size() > 0", None),
            Rule::new("author", "value == 'konojunya'", None),
        ]);

        let report = run(&set, &env());
        assert!(report.passed());
        assert!(!report.is_fatal());
        assert_eq!(report.text(), "");
    }

    #[test]
    fn test_empty_rule_set_passes() {
        let report = run(&RuleSet::new(), &env());
        assert!(report.passed());
    }

    #[test]
    fn test_failures_accumulate_in_rule_order() {
        let set = rules(vec![
            Rule::new("title", "value.size() > 10", Some("Title must be longer than 10 characters".to_string())),
            Rule::new("author", "value == 'konojunya'", None),
            Rule::new("base_ref", "value == 'main'", Some(String::new())),
            Rule::new("labels", "'feature' in value", Some("Labels must contain 'feature'".to_string())),
        ]);

        let report = run(&set, &env());
        assert!(!report.passed());
        assert!(!report.is_fatal());
        insta::assert_snapshot!(report.text(), @r"
        [title] Title must be longer than 10 characters
        [base_ref] Rule 'base_ref' failed
        [labels] Labels must contain 'feature'
        ");
    }

    #[test]
    fn test_defect_short_circuits() {
        let set = rules(vec![
            Rule::new("title", "value.size() > 10", Some("too short".to_string())),
            Rule::new("body", "   ", None),
            Rule::new("labels", "'feature' in value", None),
        ]);

        let report = run(&set, &env());
        assert!(!report.passed());
        assert!(report.is_fatal());
        assert_eq!(report.lines(), ["[body] CEL is empty"]);
    }

    #[test]
    fn test_compile_error_short_circuits() {
        let set = rules(vec![
            Rule::new("title", "value.size( > 10", None),
            Rule::new("labels", "'feature' in value", None),
        ]);

        let report = run(&set, &env());
        assert!(report.is_fatal());
        assert_eq!(report.lines().len(), 1);
        assert!(report.lines()[0].starts_with("[title] failed to compile CEL: "));
    }

    #[test]
    fn test_non_boolean_short_circuits() {
        let set = rules(vec![
            Rule::new("author", "value", None),
            Rule::new("labels", "'feature' in value", None),
        ]);

        let report = run(&set, &env());
        assert!(report.is_fatal());
        assert_eq!(report.lines().len(), 1);
        assert!(report.lines()[0].starts_with("[author] CEL returned non-boolean value: "));
    }

    #[test]
    fn test_is_deterministic() {
        let set = rules(vec![
            Rule::new("title", "value.size() > 10", None),
            Rule::new("head_ref", "value.startsWith('release/')", None),
        ]);
        let env = env();

        assert_eq!(run(&set, &env).text(), run(&set, &env).text());
    }

    #[test]
    fn test_display_matches_text() {
        let set = rules(vec![Rule::new("title", "false", Some("nope".to_string()))]);
        let report = run(&set, &env());
        assert_eq!(report.to_string(), "[title] nope");
    }
}
