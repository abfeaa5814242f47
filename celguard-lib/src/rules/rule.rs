//! User-declared lint rules

use serde::{Deserialize, Serialize, Serializer};

/// A single named rule: a CEL expression plus the message shown when it evaluates to false
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    key: String,
    expression: String,
    message: Option<String>,
}

impl Rule {
    #[must_use]
    pub fn new(key: impl Into<String>, expression: impl Into<String>, message: Option<String>) -> Self {
        Self {
            key: key.into(),
            expression: expression.into(),
            message,
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn expression(&self) -> &str {
        &self.expression
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The message to report when this rule fails
    ///
    /// Blank configured messages fall back to `Rule '<key>' failed`.
    #[must_use]
    pub fn failure_message(&self) -> String {
        match self.message.as_deref() {
            Some(msg) if !msg.trim().is_empty() => msg.to_string(),
            _ => format!("Rule '{}' failed", self.key),
        }
    }
}

/// The body of a rule as written in the configuration file, without its key
#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub(super) struct RuleBody {
    #[serde(default, alias = "expression")]
    pub cel: String,

    #[serde(default, alias = "message", skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RuleBody {
    pub(super) fn into_rule(self, key: String) -> Rule {
        Rule::new(key, self.cel, self.error)
    }
}

impl Serialize for Rule {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        RuleBody {
            cel: self.expression.clone(),
            error: self.message.clone(),
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_rule() {
        let rule = Rule::new("title", "value.size() > 10", Some("Title is too short".to_string()));

        assert_eq!(rule.key(), "title");
        assert_eq!(rule.expression(), "value.size() > 10");
        assert_eq!(rule.message(), Some("Title is too short"));
    }

    #[test]
    fn test_failure_message_uses_configured_text() {
        let rule = Rule::new("body", "value.size() > 0", Some("Body must be not empty".to_string()));
        assert_eq!(rule.failure_message(), "Body must be not empty");
    }

    #[test]
    fn test_failure_message_defaults_when_missing() {
        let rule = Rule::new("body", "value.size() > 0", None);
        assert_eq!(rule.failure_message(), "Rule 'body' failed");
    }

    #[test]
    fn test_failure_message_defaults_when_blank() {
        let rule = Rule::new("author", "value != ''", Some("  \t ".to_string()));
        assert_eq!(rule.failure_message(), "Rule 'author' failed");
    }

    #[test]
    fn test_body_accepts_aliases() {
        let body: RuleBody = serde_yaml::from_str("expression: \"true\"\nmessage: nope\n").unwrap();
        let rule = body.into_rule("x".to_string());

        assert_eq!(rule.expression(), "true");
        assert_eq!(rule.message(), Some("nope"));
    }

    #[test]
    fn test_body_missing_cel_is_empty() {
        let body: RuleBody = serde_yaml::from_str("error: oops\n").unwrap();
        assert_eq!(body.cel, "");
    }

    #[test]
    fn test_body_rejects_unknown_fields() {
        let result: Result<RuleBody, _> = serde_yaml::from_str("cel: \"true\"\neror: typo\n");
        assert!(result.is_err(), "misspelled field should be rejected");
    }

    #[test]
    fn test_serialize_without_message() {
        let rule = Rule::new("title", "value != ''", None);
        let json = serde_json::to_value(&rule).unwrap();

        assert_eq!(json["cel"], "value != ''");
        assert!(!json.as_object().unwrap().contains_key("error"));
    }
}
