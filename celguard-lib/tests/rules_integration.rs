//! End-to-end rule evaluation over parsed configuration and event payloads

use celguard_lib::commands::{Config, parse_event};
use celguard_lib::rules::{AttributeEnvironment, Report, run};

const EVENT: &str = r#"{
    "action": "synchronize",
    "pull_request": {
        "number": 5,
        "title": "Short",
        "body": "",
        "user": { "login": "konojunya" },
        "base": { "ref": "main" },
        "head": { "ref": "feature" },
        "labels": [ { "name": "main" } ]
    }
}"#;

fn evaluate(yaml: &str, event: &str) -> Report {
    let rules = Config::parse(yaml).expect("Could not parse config");
    let pr = parse_event(event).expect("Could not parse event");
    run(&rules, &AttributeEnvironment::bind(&pr))
}

#[test]
fn test_each_attribute_is_bound_to_its_key() {
    let yaml = r#"
title:
  cel: "value == 'Short'"
body:
  cel: "value == ''"
author:
  cel: "value == 'konojunya'"
base_ref:
  cel: "value == 'main'"
head_ref:
  cel: "value == 'feature'"
labels:
  cel: "value == ['main']"
"#;

    let report = evaluate(yaml, EVENT);
    assert!(report.passed(), "{report}");
    assert_eq!(report.text(), "");
}

#[test]
fn test_labels_rule_failure() {
    let yaml = r#"
labels:
  cel: "'feature' in value"
  error: "Labels must contain 'feature'"
"#;

    let report = evaluate(yaml, EVENT);
    assert!(!report.passed());
    assert!(!report.is_fatal());
    assert_eq!(report.text(), "[labels] Labels must contain 'feature'");
}

#[test]
fn test_labels_rule_pass() {
    let event = EVENT.replace(r#"{ "name": "main" }"#, r#"{ "name": "feature" }"#);
    let yaml = "labels:\n  cel: \"'feature' in value\"\n";

    assert!(evaluate(yaml, &event).passed());
}

#[test]
fn test_aggregate_record_matches_flat_bindings() {
    let yaml = r#"
title:
  cel: "pr.title.size() > 0 && pr.base_ref == 'main'"
base_ref:
  cel: "pr.base_ref == value"
any:
  cel: "pr.title == 'Short' && value == null"
"#;

    let report = evaluate(yaml, EVENT);
    assert!(report.passed(), "{report}");
}

#[test]
fn test_failures_reported_in_configuration_order() {
    let yaml = r#"
title:
  cel: "value.size() > 10"
  error: "Title must be longer than 10 characters"
body:
  cel: "value.size() > 0"
  error: "Body must be not empty"
author:
  cel: "value.size() > 0"
  error: "Author must be not empty"
head_ref:
  cel: "value == 'main'"
  error: "   "
"#;

    let report = evaluate(yaml, EVENT);
    insta::assert_snapshot!(report.text(), @r"
    [title] Title must be longer than 10 characters
    [body] Body must be not empty
    [head_ref] Rule 'head_ref' failed
    ");
}

#[test]
fn test_empty_expression_halts_run() {
    let yaml = r#"
title:
  cel: "value.size() > 10"
  error: "Title must be longer than 10 characters"
body:
  cel: ""
labels:
  cel: "'feature' in value"
"#;

    let report = evaluate(yaml, EVENT);
    assert!(report.is_fatal());
    assert_eq!(report.lines(), ["[body] CEL is empty"]);
}

#[test]
fn test_compile_error_halts_run() {
    let yaml = r#"
title:
  cel: "value.size() >"
labels:
  cel: "'feature' in value"
"#;

    let report = evaluate(yaml, EVENT);
    assert!(report.is_fatal());
    assert_eq!(report.lines().len(), 1);
    assert!(report.text().starts_with("[title] failed to compile CEL: "), "{report}");
}

#[test]
fn test_undeclared_variable_is_compile_error() {
    let yaml = r#"
title:
  cel: "milestone == 'v1'"
labels:
  cel: "'feature' in value"
"#;

    let report = evaluate(yaml, EVENT);
    assert!(report.is_fatal());
    assert_eq!(report.text(), "[title] failed to compile CEL: undeclared reference to 'milestone'");
}

#[test]
fn test_runtime_error_halts_run() {
    let yaml = r#"
title:
  cel: "value.size() / 0 > 1"
labels:
  cel: "'feature' in value"
"#;

    let report = evaluate(yaml, EVENT);
    assert!(report.is_fatal());
    assert_eq!(report.lines().len(), 1);
    assert!(report.text().starts_with("[title] failed to evaluate CEL: "), "{report}");
}

#[test]
fn test_non_boolean_halts_run() {
    let yaml = r#"
labels:
  cel: "'feature' in value"
title:
  cel: "value"
author:
  cel: "false"
"#;

    let report = evaluate(yaml, EVENT);
    assert!(report.is_fatal());
    assert_eq!(report.lines(), ["[title] CEL returned non-boolean value: Short"]);
}

#[test]
fn test_non_boolean_list_is_rendered_plainly() {
    let report = evaluate("labels:\n  cel: \"value\"\n", EVENT);
    assert_eq!(report.lines(), ["[labels] CEL returned non-boolean value: [main]"]);
}

#[test]
fn test_string_extension_rules() {
    let event = EVENT.replace(r#""title": "Short""#, r#""title": "Feat: Add X""#);
    let yaml = r#"
title:
  cel: "value.lowerAscii().startsWith('feat')"
  error: "Title must start with feat"
head_ref:
  cel: "value.split('/').size() == 1 && value.trim() == value"
author:
  cel: "value.indexOf('jun') == 4 && value.upperAscii() == 'KONOJUNYA'"
base_ref:
  cel: "value.replace('main', 'trunk') == 'trunk' && value.substring(0, 2) == 'ma'"
labels:
  cel: "value.join(',') == 'main'"
"#;

    let report = evaluate(yaml, &event);
    assert!(report.passed(), "{report}");
}

#[test]
fn test_repeated_runs_are_identical() {
    let yaml = r#"
title:
  cel: "value.size() > 10"
labels:
  cel: "'feature' in value"
"#;

    let rules = Config::parse(yaml).unwrap();
    let env = AttributeEnvironment::bind(&parse_event(EVENT).unwrap());

    let first = run(&rules, &env);
    let second = run(&rules, &env);
    assert_eq!(first, second);
    assert_eq!(first.text(), second.text());
}
