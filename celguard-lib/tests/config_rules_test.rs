//! Integration test for loading rules from configuration text

use celguard_lib::commands::Config;

#[test]
fn test_load_rules_in_declaration_order() {
    let yaml = r#"
title:
  cel: "value.size() > 10"
  error: "Title must be longer than 10 characters"

labels:
  cel: "'feature' in value"
  error: "Labels must contain 'feature'"

body:
  cel: "value.size() > 0"
"#;

    let rules = Config::parse(yaml).expect("Could not parse config");

    assert_eq!(rules.len(), 3);
    assert_eq!(rules.keys(), vec!["title", "labels", "body"]);

    let title = rules.get("title").unwrap();
    assert_eq!(title.expression(), "value.size() > 10");
    assert_eq!(title.message(), Some("Title must be longer than 10 characters"));

    let body = rules.get("body").unwrap();
    assert_eq!(body.message(), None);
    assert_eq!(body.failure_message(), "Rule 'body' failed");
}

#[test]
fn test_empty_config() {
    let rules = Config::parse("").expect("Could not parse config");
    assert!(rules.is_empty());
}

#[test]
fn test_rule_without_cel_still_loads() {
    // An empty expression is reported when the rule runs, not when it loads
    let rules = Config::parse("title:\n  error: \"needs a rule\"\n").expect("Could not parse config");
    assert_eq!(rules.get("title").unwrap().expression(), "");
}
