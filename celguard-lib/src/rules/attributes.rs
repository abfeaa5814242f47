//! Projection of a pull request into the values that rules can read

use super::PullRequestSnapshot;
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

pub const TITLE: &str = "title";
pub const BODY: &str = "body";
pub const AUTHOR: &str = "author";
pub const BASE_REF: &str = "base_ref";
pub const HEAD_REF: &str = "head_ref";
pub const LABELS: &str = "labels";

/// Names of all attributes, in the order they appear in the aggregate record
pub const ATTRIBUTE_NAMES: [&str; 6] = [TITLE, BODY, AUTHOR, BASE_REF, HEAD_REF, LABELS];

static ABSENT: AttributeValue = AttributeValue::Absent;

/// A dynamically typed attribute value
///
/// Serializes to a CEL string, list of strings, or `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Text(String),
    List(Vec<String>),
    Absent,
}

/// The read-only set of values an expression may read during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeEnvironment {
    attributes: Vec<(&'static str, AttributeValue)>,
}

impl AttributeEnvironment {
    /// Bind the attributes of a pull request
    #[must_use]
    pub fn bind(pr: &PullRequestSnapshot) -> Self {
        Self {
            attributes: vec![
                (TITLE, AttributeValue::Text(pr.title.clone())),
                (BODY, AttributeValue::Text(pr.body.clone())),
                (AUTHOR, AttributeValue::Text(pr.author.clone())),
                (BASE_REF, AttributeValue::Text(pr.base_ref.clone())),
                (HEAD_REF, AttributeValue::Text(pr.head_ref.clone())),
                (LABELS, AttributeValue::List(pr.labels.clone())),
            ],
        }
    }

    /// The value bound to `value` for the rule with the given key
    ///
    /// Keys that don't name an attribute yield [`AttributeValue::Absent`].
    #[must_use]
    pub fn value_for(&self, key: &str) -> &AttributeValue {
        self.attributes
            .iter()
            .find_map(|(name, value)| (*name == key).then_some(value))
            .unwrap_or(&ABSENT)
    }

    /// The aggregate record bound to `pr`
    #[must_use]
    pub fn record(&self) -> AggregateRecord<'_> {
        AggregateRecord {
            attributes: &self.attributes,
        }
    }
}

/// A string-keyed map of every attribute, serialized on demand
#[derive(Debug, Clone, Copy)]
pub struct AggregateRecord<'a> {
    attributes: &'a [(&'static str, AttributeValue)],
}

impl Serialize for AggregateRecord<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.attributes.len()))?;
        for (name, value) in self.attributes {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
