//! Synthetic data generation for pseudonymization
//!
//! Generators are locale-specific and draw every value from a caller-supplied
//! RNG, so seeding the RNG from the original value makes the output
//! reproducible. The default backend is the `fake` crate, compiled in with the
//! `synthetic` feature.

use crate::domain::Result;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Locale of generated values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en_US")]
    EnUs,
    #[serde(rename = "fr_FR")]
    FrFr,
    #[serde(rename = "pt_BR")]
    PtBr,
    #[serde(rename = "ja_JP")]
    JaJp,
    #[serde(rename = "zh_CN")]
    ZhCn,
    #[serde(rename = "zh_TW")]
    ZhTw,
}

impl Locale {
    /// Accepted configuration names
    pub const SUPPORTED: [&'static str; 7] =
        ["en_US", "en", "fr_FR", "pt_BR", "ja_JP", "zh_CN", "zh_TW"];

    /// Parses a configuration name; `en` is an alias of `en_US`
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "en_US" | "en" => Some(Self::EnUs),
            "fr_FR" => Some(Self::FrFr),
            "pt_BR" => Some(Self::PtBr),
            "ja_JP" => Some(Self::JaJp),
            "zh_CN" => Some(Self::ZhCn),
            "zh_TW" => Some(Self::ZhTw),
            _ => None,
        }
    }

    /// Canonical configuration name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EnUs => "en_US",
            Self::FrFr => "fr_FR",
            Self::PtBr => "pt_BR",
            Self::JaJp => "ja_JP",
            Self::ZhCn => "zh_CN",
            Self::ZhTw => "zh_TW",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic kind of a synthetic value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticKind {
    Name,
    Email,
    Phone,
    Address,
}

impl SemanticKind {
    /// Parses a configuration name
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "name" => Some(Self::Name),
            "email" => Some(Self::Email),
            "phone" => Some(Self::Phone),
            "address" => Some(Self::Address),
            _ => None,
        }
    }

    /// Infers the kind from a PII type name
    ///
    /// # Examples
    ///
    /// ```
    /// use veil::anonymization::synthetic::SemanticKind;
    ///
    /// assert_eq!(SemanticKind::infer("work_email"), SemanticKind::Email);
    /// assert_eq!(SemanticKind::infer("mobile_number"), SemanticKind::Phone);
    /// assert_eq!(SemanticKind::infer("patient"), SemanticKind::Name);
    /// ```
    pub fn infer(pii_type: &str) -> Self {
        let lowered = pii_type.to_ascii_lowercase();
        if lowered.contains("email") {
            Self::Email
        } else if ["phone", "mobile", "tel"].iter().any(|k| lowered.contains(k)) {
            Self::Phone
        } else if lowered.contains("address") || lowered.contains("street") {
            Self::Address
        } else {
            Self::Name
        }
    }
}

/// Source of synthetic values for one locale
pub trait SyntheticGenerator: Send + Sync {
    /// Draws one value of the given kind from `rng`
    fn generate(&self, kind: SemanticKind, rng: &mut ChaCha8Rng) -> String;
}

/// Returns the built-in generator for a locale
///
/// # Errors
///
/// Returns [`crate::domain::VeilError::Dependency`] when the crate was built without the
/// `synthetic` feature.
pub fn default_generator(locale: Locale) -> Result<Arc<dyn SyntheticGenerator>> {
    #[cfg(feature = "synthetic")]
    {
        Ok(backend::for_locale(locale))
    }

    #[cfg(not(feature = "synthetic"))]
    {
        Err(crate::domain::VeilError::Dependency(format!(
            "No synthetic data generator available for locale '{locale}': \
             rebuild with the 'synthetic' feature to enable pseudonymization"
        )))
    }
}

#[cfg(feature = "synthetic")]
mod backend {
    use super::{Locale, SemanticKind, SyntheticGenerator};
    use fake::faker::address::raw::{BuildingNumber, CityName, StateName, StreetName};
    use fake::faker::internet::raw::SafeEmail;
    use fake::faker::name::raw::Name;
    use fake::faker::phone_number::raw::PhoneNumber;
    use fake::locales::{Data, EN, FR_FR, JA_JP, PT_BR, ZH_CN, ZH_TW};
    use fake::Fake;
    use rand_chacha::ChaCha8Rng;
    use std::sync::Arc;

    struct FakeGenerator<L>(L);

    impl<L: Data + Copy + Send + Sync> SyntheticGenerator for FakeGenerator<L> {
        fn generate(&self, kind: SemanticKind, rng: &mut ChaCha8Rng) -> String {
            let locale = self.0;
            match kind {
                SemanticKind::Name => Name(locale).fake_with_rng(rng),
                SemanticKind::Email => SafeEmail(locale).fake_with_rng(rng),
                SemanticKind::Phone => PhoneNumber(locale).fake_with_rng(rng),
                SemanticKind::Address => {
                    let number: String = BuildingNumber(locale).fake_with_rng(rng);
                    let street: String = StreetName(locale).fake_with_rng(rng);
                    let city: String = CityName(locale).fake_with_rng(rng);
                    let state: String = StateName(locale).fake_with_rng(rng);
                    format!("{number} {street}, {city}, {state}")
                }
            }
        }
    }

    pub(super) fn for_locale(locale: Locale) -> Arc<dyn SyntheticGenerator> {
        match locale {
            Locale::EnUs => Arc::new(FakeGenerator(EN)),
            Locale::FrFr => Arc::new(FakeGenerator(FR_FR)),
            Locale::PtBr => Arc::new(FakeGenerator(PT_BR)),
            Locale::JaJp => Arc::new(FakeGenerator(JA_JP)),
            Locale::ZhCn => Arc::new(FakeGenerator(ZH_CN)),
            Locale::ZhTw => Arc::new(FakeGenerator(ZH_TW)),
        }
    }
}
