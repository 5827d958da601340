//! Strategy engine
//!
//! Applies one rule's strategy to one value. Every strategy shares the same
//! null contract: a missing value stays missing.

pub mod generalize;
pub mod hash;
pub mod pseudonym;
pub mod redaction;

pub use pseudonym::Pseudonymizer;

use crate::anonymization::rules::{Rule, StrategyParams};
use crate::anonymization::synthetic::SemanticKind;
use crate::domain::{Result, Value};

/// Transforms a single value according to a rule
///
/// # Arguments
///
/// * `value` - Original cell value
/// * `rule` - Validated rule (its PII type drives pseudonym kind inference)
/// * `pseudonymizer` - Shared pseudonym and generator caches
///
/// # Errors
///
/// Returns a strategy error for values the strategy cannot handle, or a
/// dependency error when pseudonymization has no generator.
///
/// # Examples
///
/// ```
/// use veil::anonymization::rules::{Rule, StrategyParams};
/// use veil::anonymization::strategy::{apply, Pseudonymizer};
/// use veil::domain::Value;
///
/// # fn example() -> veil::domain::Result<()> {
/// let rule = Rule::new(
///     "phone",
///     StrategyParams::RedactPartial { visible_chars: 4, mask_char: '*' },
/// )?;
/// let masked = apply(&Value::from("555-1234"), &rule, &Pseudonymizer::default())?;
/// assert_eq!(masked, Value::from("****1234"));
/// # Ok(())
/// # }
/// ```
pub fn apply(value: &Value, rule: &Rule, pseudonymizer: &Pseudonymizer) -> Result<Value> {
    let Some(canonical) = value.canonical() else {
        return Ok(Value::Null);
    };

    let output = match rule.params() {
        StrategyParams::Hash { algorithm, salt } => hash::hash_value(&canonical, *algorithm, *salt),
        StrategyParams::RedactFull { replacement } => redaction::redact_full(replacement),
        StrategyParams::RedactPartial {
            visible_chars,
            mask_char,
        } => redaction::redact_partial(&canonical, *visible_chars, *mask_char),
        StrategyParams::Pseudonymize {
            seed_based,
            locale,
            kind,
        } => {
            let kind = kind.unwrap_or_else(|| SemanticKind::infer(rule.pii_type()));
            pseudonymizer.pseudonymize(&canonical, *locale, kind, *seed_based)?
        }
        StrategyParams::Generalize { family } => return generalize::generalize(value, family),
    };

    Ok(Value::Text(output))
}
