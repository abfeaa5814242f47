use super::Rule;
use super::rule::RuleBody;
use core::fmt;
use serde::de::{Error as DeError, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An ordered collection of rules
///
/// Iteration order is the order in which the rules were declared, which is also
/// the order failures are reported in. Keys are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    #[must_use]
    pub const fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule, rejecting keys that are already present
    ///
    /// # Errors
    ///
    /// Returns the rejected rule if its key is already in the set
    pub fn push(&mut self, rule: Rule) -> Result<(), Rule> {
        if self.get(rule.key()).is_some() {
            return Err(rule);
        }

        self.rules.push(rule);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.key() == key)
    }

    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.rules.iter().map(Rule::key).collect()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = core::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

impl TryFrom<Vec<Rule>> for RuleSet {
    type Error = Rule;

    fn try_from(rules: Vec<Rule>) -> Result<Self, Self::Error> {
        let mut set = Self::new();
        for rule in rules {
            set.push(rule)?;
        }
        Ok(set)
    }
}

impl Serialize for RuleSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.rules.len()))?;
        for rule in &self.rules {
            map.serialize_entry(rule.key(), rule)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RuleSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RuleSetVisitor;

        impl<'de> Visitor<'de> for RuleSetVisitor {
            type Value = RuleSet;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a mapping from rule names to rules")
            }

            // An empty YAML document or an explicit null
            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: DeError,
            {
                Ok(RuleSet::new())
            }

            fn visit_none<E>(self) -> Result<Self::Value, E>
            where
                E: DeError,
            {
                Ok(RuleSet::new())
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut set = RuleSet::new();
                while let Some((key, body)) = access.next_entry::<String, RuleBody>()? {
                    set.push(body.into_rule(key))
                        .map_err(|rule| A::Error::custom(format!("duplicate rule '{}'", rule.key())))?;
                }
                Ok(set)
            }
        }

        deserializer.deserialize_any(RuleSetVisitor)
    }
}
