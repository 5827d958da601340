//! Rule set and global anonymization policy

use crate::anonymization::rules::{RawRule, Rule};
use crate::domain::{Result, VeilError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default bound of the pseudonym cache
pub const DEFAULT_PSEUDONYM_CACHE_CAPACITY: usize = 100_000;

/// Policy flags applying to every rule of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalPolicy {
    /// Keep going when a column fails (the column stays unanonymized)
    #[serde(default = "default_true")]
    pub handle_nulls: bool,

    /// Restore numeric column types where a strategy output allows it
    #[serde(default = "default_true")]
    pub preserve_data_types: bool,

    /// Match PII types against rules case-sensitively
    #[serde(default)]
    pub case_sensitive: bool,

    /// Maximum number of cached pseudonyms
    #[serde(default = "default_cache_capacity")]
    pub pseudonym_cache_capacity: usize,
}

fn default_true() -> bool {
    true
}

fn default_cache_capacity() -> usize {
    DEFAULT_PSEUDONYM_CACHE_CAPACITY
}

impl Default for GlobalPolicy {
    fn default() -> Self {
        Self {
            handle_nulls: true,
            preserve_data_types: true,
            case_sensitive: false,
            pseudonym_cache_capacity: DEFAULT_PSEUDONYM_CACHE_CAPACITY,
        }
    }
}

impl GlobalPolicy {
    /// Validates the policy
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.pseudonym_cache_capacity == 0 {
            return Err("global.pseudonym_cache_capacity must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Validated rules keyed by PII type, with the global policy
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RuleSet {
    rules: BTreeMap<String, Rule>,
    global: GlobalPolicy,
}

impl RuleSet {
    /// Builds a rule set from already validated rules
    ///
    /// # Errors
    ///
    /// Returns [`VeilError::Configuration`] if two rules share a PII type, or
    /// differ only in ASCII case while matching is case-insensitive, or if the
    /// global policy is invalid.
    pub fn new(rules: impl IntoIterator<Item = Rule>, global: GlobalPolicy) -> Result<Self> {
        global.validate().map_err(VeilError::Configuration)?;

        let mut map: BTreeMap<String, Rule> = BTreeMap::new();
        for rule in rules {
            let pii_type = rule.pii_type().to_string();
            if map.contains_key(&pii_type) {
                return Err(VeilError::Configuration(format!(
                    "Duplicate rule for PII type '{pii_type}'"
                )));
            }
            if !global.case_sensitive {
                if let Some(existing) = map.keys().find(|k| k.eq_ignore_ascii_case(&pii_type)) {
                    return Err(VeilError::Configuration(format!(
                        "Rules for '{existing}' and '{pii_type}' collide when matching is \
                         case-insensitive (set global.case_sensitive = true to keep both)"
                    )));
                }
            }
            map.insert(pii_type, rule);
        }

        Ok(Self { rules: map, global })
    }

    /// Builds and validates a rule set from its configuration form
    ///
    /// # Errors
    ///
    /// Returns the first [`VeilError::Configuration`] raised by a rule, in PII
    /// type order.
    pub fn from_config(rules: &BTreeMap<String, RawRule>, global: GlobalPolicy) -> Result<Self> {
        let built = rules
            .iter()
            .map(|(pii_type, raw)| Rule::from_config(pii_type, raw))
            .collect::<Result<Vec<_>>>()?;
        Self::new(built, global)
    }

    /// Looks up the rule for a PII type, honoring `case_sensitive`
    pub fn get(&self, pii_type: &str) -> Option<&Rule> {
        if let Some(rule) = self.rules.get(pii_type) {
            return Some(rule);
        }
        if self.global.case_sensitive {
            return None;
        }
        self.rules
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(pii_type))
            .map(|(_, rule)| rule)
    }

    /// Whether a rule exists for a PII type
    pub fn contains(&self, pii_type: &str) -> bool {
        self.get(pii_type).is_some()
    }

    /// PII types with a rule, in sorted order
    pub fn pii_types(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// Rules in PII type order
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.values()
    }

    /// Global policy
    pub fn global(&self) -> &GlobalPolicy {
        &self.global
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the set has no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::rules::{RawParameters, Strategy};
    use serde_json::json;

    fn raw(strategy: &str, parameters: serde_json::Value) -> RawRule {
        RawRule {
            strategy: strategy.to_string(),
            parameters: parameters.as_object().cloned().unwrap_or_default(),
        }
    }

    fn sample_rules() -> BTreeMap<String, RawRule> {
        let mut rules = BTreeMap::new();
        rules.insert("email".to_string(), raw("hash", json!({"algorithm": "sha256"})));
        rules.insert("ssn".to_string(), raw("redact_full", json!({})));
        rules
    }

    #[test]
    fn test_global_policy_defaults() {
        let policy = GlobalPolicy::default();
        assert!(policy.handle_nulls);
        assert!(policy.preserve_data_types);
        assert!(!policy.case_sensitive);
        assert_eq!(policy.pseudonym_cache_capacity, 100_000);

        let parsed: GlobalPolicy = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, policy);
    }

    #[test]
    fn test_from_config_builds_rules() {
        let set = RuleSet::from_config(&sample_rules(), GlobalPolicy::default()).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.pii_types().collect::<Vec<_>>(), vec!["email", "ssn"]);
        assert_eq!(set.get("email").unwrap().strategy(), Strategy::Hash);
    }

    #[test]
    fn test_from_config_propagates_rule_errors() {
        let mut rules = sample_rules();
        rules.insert("age".to_string(), raw("generalize", json!({"bin_size": 10})));
        let err = RuleSet::from_config(&rules, GlobalPolicy::default()).unwrap_err();
        assert!(err.to_string().contains("'age'"));
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let set = RuleSet::from_config(&sample_rules(), GlobalPolicy::default()).unwrap();
        assert!(set.contains("EMAIL"));
        assert!(set.contains("Ssn"));
        assert!(!set.contains("phone"));
    }

    #[test]
    fn test_case_sensitive_lookup() {
        let policy = GlobalPolicy {
            case_sensitive: true,
            ..GlobalPolicy::default()
        };
        let set = RuleSet::from_config(&sample_rules(), policy).unwrap();
        assert!(set.contains("email"));
        assert!(!set.contains("EMAIL"));
    }

    #[test]
    fn test_case_collision_rejected_when_insensitive() {
        let mut rules = sample_rules();
        rules.insert("Email".to_string(), raw("redact_full", json!({})));
        assert!(RuleSet::from_config(&rules, GlobalPolicy::default()).is_err());

        let policy = GlobalPolicy {
            case_sensitive: true,
            ..GlobalPolicy::default()
        };
        assert!(RuleSet::from_config(&rules, policy).is_ok());
    }

    #[test]
    fn test_duplicate_rule_rejected() {
        let a = Rule::from_raw("email", "redact_full", &RawParameters::new()).unwrap();
        let b = a.clone();
        assert!(RuleSet::new([a, b], GlobalPolicy::default()).is_err());
    }

    #[test]
    fn test_zero_cache_capacity_rejected() {
        let policy = GlobalPolicy {
            pseudonym_cache_capacity: 0,
            ..GlobalPolicy::default()
        };
        assert!(RuleSet::new(Vec::new(), policy).is_err());
    }
}
