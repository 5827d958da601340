//! Anonymization rule model
//!
//! A [`Rule`] binds one PII type to one [`Strategy`] together with that
//! strategy's typed parameters ([`StrategyParams`]). Rules are validated when
//! they are built, so a rule that exists is always applicable: parameter
//! problems surface at configuration load time, never at transform time.
//!
//! Generalization covers five structurally different parameter families,
//! modelled as [`GeneralizeParams`]. Loose configuration maps are matched
//! against exactly one family; mixed or incomplete sets are rejected.

use crate::anonymization::synthetic::{Locale, SemanticKind};
use crate::domain::{Result, VeilError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::fmt;

/// Loosely-typed rule parameters as read from a configuration file
pub type RawParameters = Map<String, JsonValue>;

/// A rule as written in a configuration file, before validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRule {
    /// Strategy name (`hash`, `redact_full`, `redact_partial`, `pseudonymize`, `generalize`)
    pub strategy: String,

    /// Strategy parameters
    #[serde(default)]
    pub parameters: RawParameters,
}

/// Default replacement literal for full redaction
pub const DEFAULT_REPLACEMENT: &str = "[REDACTED]";

/// Anonymization strategy tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Replace with a hex digest
    Hash,
    /// Replace with a fixed literal
    RedactFull,
    /// Mask all but the trailing characters
    RedactPartial,
    /// Replace with consistent synthetic data
    Pseudonymize,
    /// Replace with a coarser category or range
    Generalize,
}

impl Strategy {
    /// All strategies, in configuration order
    pub const ALL: [Strategy; 5] = [
        Self::Hash,
        Self::RedactFull,
        Self::RedactPartial,
        Self::Pseudonymize,
        Self::Generalize,
    ];

    /// Configuration name of the strategy
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hash => "hash",
            Self::RedactFull => "redact_full",
            Self::RedactPartial => "redact_partial",
            Self::Pseudonymize => "pseudonymize",
            Self::Generalize => "generalize",
        }
    }

    /// Parses a configuration name
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == name)
    }

    /// Whether the strategy always produces text
    ///
    /// Textual outputs are never coerced back to the column's numeric type.
    pub fn is_textual(&self) -> bool {
        !matches!(self, Self::Pseudonymize)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Digest algorithm for the hash strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// SHA-256
    Sha256,
    /// SHA-512
    Sha512,
    /// MD5 (kept for compatibility with legacy joins)
    Md5,
}

impl HashAlgorithm {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "sha256" => Some(Self::Sha256),
            "sha512" => Some(Self::Sha512),
            "md5" => Some(Self::Md5),
            _ => None,
        }
    }
}

/// Calendar bucket for date generalization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateGranularity {
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl DateGranularity {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "day" => Some(Self::Day),
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            "quarter" => Some(Self::Quarter),
            "year" => Some(Self::Year),
            _ => None,
        }
    }
}

/// Level of the street → city → state → country address hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressLevel {
    Full,
    Street,
    City,
    State,
    Country,
}

impl AddressLevel {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "full" => Some(Self::Full),
            "street" => Some(Self::Street),
            "city" => Some(Self::City),
            "state" => Some(Self::State),
            "country" => Some(Self::Country),
            _ => None,
        }
    }
}

/// Parameter family of the generalize strategy
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneralizeParams {
    /// Numeric binning into `"{start}-{end}"` ranges
    NumericBin {
        bin_size: i64,
        min_value: i64,
        max_value: i64,
    },
    /// Keep the first N digits (or IPv4 octets), mask the rest
    Precision { precision: usize },
    /// Truncate dates to a calendar boundary
    Granularity(DateGranularity),
    /// Reduce addresses to a hierarchy level
    Level(AddressLevel),
    /// Keep the first N IPv4 octets, zero the rest
    Octets(u8),
}

const NUMERIC_BIN_KEYS: [&str; 3] = ["bin_size", "min_value", "max_value"];
const SINGLE_KEY_FAMILIES: [&str; 4] = ["precision", "granularity", "level", "octets"];

/// Typed strategy parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum StrategyParams {
    Hash {
        algorithm: HashAlgorithm,
        salt: bool,
    },
    RedactFull {
        replacement: String,
    },
    RedactPartial {
        visible_chars: usize,
        mask_char: char,
    },
    Pseudonymize {
        seed_based: bool,
        locale: Locale,
        kind: Option<SemanticKind>,
    },
    Generalize {
        #[serde(flatten)]
        family: GeneralizeParams,
    },
}

impl StrategyParams {
    /// Strategy tag of these parameters
    pub fn strategy(&self) -> Strategy {
        match self {
            Self::Hash { .. } => Strategy::Hash,
            Self::RedactFull { .. } => Strategy::RedactFull,
            Self::RedactPartial { .. } => Strategy::RedactPartial,
            Self::Pseudonymize { .. } => Strategy::Pseudonymize,
            Self::Generalize { .. } => Strategy::Generalize,
        }
    }

    /// Checks value constraints that the field types alone cannot express
    fn validate(&self, pii_type: &str) -> Result<()> {
        let invalid = |param: &str, constraint: &str| {
            Err(VeilError::Configuration(format!(
                "Rule for '{pii_type}': parameter '{param}' {constraint}"
            )))
        };

        match self {
            Self::Hash { .. } | Self::RedactFull { .. } | Self::Pseudonymize { .. } => Ok(()),
            Self::RedactPartial { mask_char, .. } => {
                if mask_char.is_control() {
                    return invalid("mask_char", "must be a printable character");
                }
                Ok(())
            }
            Self::Generalize { family } => match family {
                GeneralizeParams::NumericBin {
                    bin_size,
                    min_value,
                    max_value,
                } => {
                    if *bin_size <= 0 {
                        return invalid(
                            "bin_size",
                            &format!("must be a positive integer, got {bin_size}"),
                        );
                    }
                    if min_value >= max_value {
                        return invalid(
                            "min_value",
                            &format!("must be less than max_value ({min_value} >= {max_value})"),
                        );
                    }
                    Ok(())
                }
                GeneralizeParams::Precision { precision } => {
                    if *precision == 0 {
                        return invalid("precision", "must be a positive integer");
                    }
                    Ok(())
                }
                GeneralizeParams::Octets(octets) => {
                    if !(1..=4).contains(octets) {
                        return invalid(
                            "octets",
                            &format!("must be an integer between 1 and 4, got {octets}"),
                        );
                    }
                    Ok(())
                }
                GeneralizeParams::Granularity(_) | GeneralizeParams::Level(_) => Ok(()),
            },
        }
    }
}

/// A validated anonymization rule for one PII type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule {
    pii_type: String,
    #[serde(flatten)]
    params: StrategyParams,
}

impl Rule {
    /// Builds a rule from typed parameters
    ///
    /// # Errors
    ///
    /// Returns [`VeilError::Configuration`] if a parameter violates its
    /// constraint (e.g. `bin_size <= 0`, `min_value >= max_value`).
    pub fn new(pii_type: impl Into<String>, params: StrategyParams) -> Result<Self> {
        let pii_type = pii_type.into();
        params.validate(&pii_type)?;
        Ok(Self { pii_type, params })
    }

    /// Builds a rule from a strategy name and a loose parameter map
    ///
    /// # Errors
    ///
    /// Returns [`VeilError::Configuration`] naming the PII type, the
    /// offending parameter and the expected constraint when the strategy is
    /// unknown, a required parameter is missing, a value has the wrong type
    /// or range, an unknown key is present, or generalize parameters do not
    /// match exactly one family.
    pub fn from_raw(pii_type: &str, strategy: &str, parameters: &RawParameters) -> Result<Self> {
        let strategy = Strategy::parse(strategy).ok_or_else(|| {
            VeilError::Configuration(format!(
                "Unknown strategy '{strategy}' for '{pii_type}'. Allowed: {}",
                Strategy::ALL.map(|s| s.as_str()).join(", ")
            ))
        })?;

        let reader = ParamReader {
            pii_type,
            strategy,
            params: parameters,
        };

        let params = match strategy {
            Strategy::Hash => {
                reader.allow_only(&["algorithm", "salt"])?;
                let name = reader.required_str("algorithm")?;
                let algorithm = HashAlgorithm::parse(name).ok_or_else(|| {
                    reader.invalid("algorithm", "must be one of: sha256, sha512, md5", name)
                })?;
                StrategyParams::Hash {
                    algorithm,
                    salt: reader.optional_bool("salt")?.unwrap_or(false),
                }
            }
            Strategy::RedactFull => {
                reader.allow_only(&["replacement"])?;
                StrategyParams::RedactFull {
                    replacement: reader
                        .optional_str("replacement")?
                        .unwrap_or(DEFAULT_REPLACEMENT)
                        .to_string(),
                }
            }
            Strategy::RedactPartial => {
                reader.allow_only(&["visible_chars", "mask_char"])?;
                let visible = reader.required_int("visible_chars")?;
                let visible_chars = usize::try_from(visible).map_err(|_| {
                    reader.invalid("visible_chars", "must be a non-negative integer", visible)
                })?;
                let mask = reader.required_str("mask_char")?;
                let mut chars = mask.chars();
                let mask_char = match (chars.next(), chars.next()) {
                    (Some(c), None) => c,
                    _ => {
                        return Err(reader.invalid(
                            "mask_char",
                            "must be exactly one character",
                            format!("'{mask}'"),
                        ))
                    }
                };
                StrategyParams::RedactPartial {
                    visible_chars,
                    mask_char,
                }
            }
            Strategy::Pseudonymize => {
                reader.allow_only(&["seed_based", "locale", "kind"])?;
                let seed_based = reader.required_bool("seed_based")?;
                let locale = match reader.optional_str("locale")? {
                    Some(name) => Locale::parse(name).ok_or_else(|| {
                        reader.invalid(
                            "locale",
                            &format!("must be one of: {}", Locale::SUPPORTED.join(", ")),
                            name,
                        )
                    })?,
                    None => Locale::default(),
                };
                let kind = match reader.optional_str("kind")? {
                    Some(name) => Some(SemanticKind::parse(name).ok_or_else(|| {
                        reader.invalid("kind", "must be one of: name, email, phone, address", name)
                    })?),
                    None => None,
                };
                StrategyParams::Pseudonymize {
                    seed_based,
                    locale,
                    kind,
                }
            }
            Strategy::Generalize => StrategyParams::Generalize {
                family: reader.generalize_family()?,
            },
        };

        Self::new(pii_type, params)
    }

    /// PII type this rule applies to
    pub fn pii_type(&self) -> &str {
        &self.pii_type
    }

    /// Builds a rule from its configuration form
    ///
    /// # Errors
    ///
    /// See [`Rule::from_raw`].
    pub fn from_config(pii_type: &str, raw: &RawRule) -> Result<Self> {
        Self::from_raw(pii_type, &raw.strategy, &raw.parameters)
    }

    /// Strategy tag
    pub fn strategy(&self) -> Strategy {
        self.params.strategy()
    }

    /// Typed strategy parameters
    pub fn params(&self) -> &StrategyParams {
        &self.params
    }
}

/// Typed access to a loose parameter map, producing uniform error messages
struct ParamReader<'a> {
    pii_type: &'a str,
    strategy: Strategy,
    params: &'a RawParameters,
}

impl ParamReader<'_> {
    fn invalid(&self, param: &str, constraint: &str, got: impl fmt::Display) -> VeilError {
        VeilError::Configuration(format!(
            "Rule for '{}': parameter '{}' {}, got {}",
            self.pii_type, param, constraint, got
        ))
    }

    fn missing(&self, param: &str, constraint: &str) -> VeilError {
        VeilError::Configuration(format!(
            "Rule for '{}' missing required parameter '{}' for strategy '{}' ({})",
            self.pii_type, param, self.strategy, constraint
        ))
    }

    fn allow_only(&self, allowed: &[&str]) -> Result<()> {
        if let Some(unknown) = self.params.keys().find(|k| !allowed.contains(&k.as_str())) {
            return Err(VeilError::Configuration(format!(
                "Rule for '{}': unknown parameter '{}' for strategy '{}'. Allowed: {}",
                self.pii_type,
                unknown,
                self.strategy,
                allowed.join(", ")
            )));
        }
        Ok(())
    }

    fn required_str(&self, key: &str) -> Result<&str> {
        self.optional_str(key)?
            .ok_or_else(|| self.missing(key, "string"))
    }

    fn optional_str(&self, key: &str) -> Result<Option<&str>> {
        match self.params.get(key) {
            None => Ok(None),
            Some(JsonValue::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(self.invalid(key, "must be a string", other)),
        }
    }

    fn required_bool(&self, key: &str) -> Result<bool> {
        self.optional_bool(key)?
            .ok_or_else(|| self.missing(key, "boolean"))
    }

    fn optional_bool(&self, key: &str) -> Result<Option<bool>> {
        match self.params.get(key) {
            None => Ok(None),
            Some(JsonValue::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(self.invalid(key, "must be a boolean", other)),
        }
    }

    fn required_int(&self, key: &str) -> Result<i64> {
        match self.params.get(key) {
            None => Err(self.missing(key, "integer")),
            Some(value) => {
                integral(value).ok_or_else(|| self.invalid(key, "must be an integer", value))
            }
        }
    }

    fn generalize_family(&self) -> Result<GeneralizeParams> {
        let mut allowed: Vec<&str> = NUMERIC_BIN_KEYS.to_vec();
        allowed.extend(SINGLE_KEY_FAMILIES);
        self.allow_only(&allowed)?;

        let numeric_present: Vec<&str> = NUMERIC_BIN_KEYS
            .into_iter()
            .filter(|k| self.params.contains_key(*k))
            .collect();

        let mut families: Vec<&str> = SINGLE_KEY_FAMILIES
            .into_iter()
            .filter(|k| self.params.contains_key(*k))
            .collect();
        if !numeric_present.is_empty() {
            families.insert(0, "numeric (bin_size, min_value, max_value)");
        }

        match families.len() {
            0 => Err(VeilError::Configuration(format!(
                "Rule for '{}' missing required parameters for strategy 'generalize'. \
                 Expected exactly one of: numeric (bin_size, min_value, max_value), \
                 location (precision), date (granularity), address (level), or IP (octets)",
                self.pii_type
            ))),
            1 => self.single_family(&numeric_present),
            _ => Err(VeilError::Configuration(format!(
                "Rule for '{}': mixed parameter sets for strategy 'generalize': {}. \
                 Exactly one family must be configured",
                self.pii_type,
                families.join(", ")
            ))),
        }
    }

    fn single_family(&self, numeric_present: &[&str]) -> Result<GeneralizeParams> {
        if !numeric_present.is_empty() {
            if let Some(absent) = NUMERIC_BIN_KEYS
                .into_iter()
                .find(|k| !numeric_present.contains(k))
            {
                return Err(VeilError::Configuration(format!(
                    "Rule for '{}': incomplete numeric binning parameters for strategy \
                     'generalize': missing '{}' (bin_size, min_value and max_value are all required)",
                    self.pii_type, absent
                )));
            }
            return Ok(GeneralizeParams::NumericBin {
                bin_size: self.required_int("bin_size")?,
                min_value: self.required_int("min_value")?,
                max_value: self.required_int("max_value")?,
            });
        }

        if self.params.contains_key("precision") {
            let precision = self.required_int("precision")?;
            let precision = usize::try_from(precision)
                .ok()
                .filter(|p| *p > 0)
                .ok_or_else(|| self.invalid("precision", "must be a positive integer", precision))?;
            return Ok(GeneralizeParams::Precision { precision });
        }

        if self.params.contains_key("granularity") {
            let name = self.required_str("granularity")?;
            return DateGranularity::parse(name)
                .map(GeneralizeParams::Granularity)
                .ok_or_else(|| {
                    self.invalid(
                        "granularity",
                        "must be one of: day, week, month, quarter, year",
                        name,
                    )
                });
        }

        if self.params.contains_key("level") {
            let name = self.required_str("level")?;
            return AddressLevel::parse(name)
                .map(GeneralizeParams::Level)
                .ok_or_else(|| {
                    self.invalid(
                        "level",
                        "must be one of: full, street, city, state, country",
                        name,
                    )
                });
        }

        let octets = self.required_int("octets")?;
        u8::try_from(octets)
            .ok()
            .filter(|o| (1..=4).contains(o))
            .map(GeneralizeParams::Octets)
            .ok_or_else(|| self.invalid("octets", "must be an integer between 1 and 4", octets))
    }
}

/// Integral view of a JSON number, accepting floats with no fractional part
fn integral(value: &JsonValue) -> Option<i64> {
    let number = value.as_number()?;
    number.as_i64().or_else(|| {
        number
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| f as i64)
    })
}
