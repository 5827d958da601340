//! Pseudonymization with consistent synthetic replacements
//!
//! A [`Pseudonymizer`] owns two caches:
//!
//! - a bounded LRU of generated pseudonyms keyed by `(locale, kind, value)`
//! - one synthetic generator per locale, created on first use
//!
//! Seeded pseudonyms are derived from the MD5 of the original value, so an
//! evicted entry regenerates to the same pseudonym. The cache only saves work.

use crate::anonymization::synthetic::{self, Locale, SemanticKind, SyntheticGenerator};
use crate::domain::Result;
use lru::LruCache;
use md5::{Digest, Md5};
use parking_lot::{Mutex, RwLock};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;

type CacheKey = (Locale, SemanticKind, String);

/// Builds the generator for a locale
pub type GeneratorFactory =
    Box<dyn Fn(Locale) -> Result<Arc<dyn SyntheticGenerator>> + Send + Sync>;

/// Seed derived from a value: the first four MD5 bytes, big-endian
///
/// # Examples
///
/// ```
/// use veil::anonymization::strategy::pseudonym::seed_for;
///
/// assert_eq!(seed_for("John Doe"), seed_for("John Doe"));
/// assert!(seed_for("John Doe") <= u64::from(u32::MAX));
/// ```
pub fn seed_for(canonical: &str) -> u64 {
    let digest = Md5::digest(canonical.as_bytes());
    let prefix = [digest[0], digest[1], digest[2], digest[3]];
    u64::from(u32::from_be_bytes(prefix))
}

/// Generates pseudonyms and caches them across columns and runs
pub struct Pseudonymizer {
    cache: Mutex<LruCache<CacheKey, String>>,
    generators: RwLock<HashMap<Locale, Arc<dyn SyntheticGenerator>>>,
    factory: GeneratorFactory,
}

impl Pseudonymizer {
    /// Creates a pseudonymizer backed by the built-in generators
    ///
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        Self::with_generator_factory(capacity, Box::new(synthetic::default_generator))
    }

    /// Creates a pseudonymizer with a custom generator source
    pub fn with_generator_factory(capacity: usize, factory: GeneratorFactory) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
            generators: RwLock::new(HashMap::new()),
            factory,
        }
    }

    /// Returns the pseudonym for a value
    ///
    /// With `seed_based`, the result is reproducible and cached. Otherwise a
    /// fresh random value is drawn and the cache is bypassed.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::VeilError::Dependency`] when no generator is
    /// available for the locale.
    pub fn pseudonymize(
        &self,
        canonical: &str,
        locale: Locale,
        kind: SemanticKind,
        seed_based: bool,
    ) -> Result<String> {
        if !seed_based {
            let generator = self.generator(locale)?;
            let mut rng = ChaCha8Rng::seed_from_u64(rand::random());
            return Ok(generator.generate(kind, &mut rng));
        }

        let key = (locale, kind, canonical.to_string());
        if let Some(hit) = self.cache.lock().get(&key) {
            return Ok(hit.clone());
        }

        let generator = self.generator(locale)?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed_for(canonical));
        let pseudonym = generator.generate(kind, &mut rng);
        self.cache.lock().put(key, pseudonym.clone());
        Ok(pseudonym)
    }

    fn generator(&self, locale: Locale) -> Result<Arc<dyn SyntheticGenerator>> {
        if let Some(existing) = self.generators.read().get(&locale) {
            return Ok(Arc::clone(existing));
        }

        let mut generators = self.generators.write();
        if let Some(existing) = generators.get(&locale) {
            return Ok(Arc::clone(existing));
        }
        let created = (self.factory)(locale)?;
        generators.insert(locale, Arc::clone(&created));
        Ok(created)
    }

    /// Number of cached pseudonyms
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }

    /// Maximum number of cached pseudonyms
    pub fn capacity(&self) -> usize {
        self.cache.lock().cap().get()
    }

    /// Drops every cached pseudonym
    pub fn clear(&self) {
        self.cache.lock().clear();
    }
}

impl Default for Pseudonymizer {
    fn default() -> Self {
        Self::new(crate::anonymization::rule_set::DEFAULT_PSEUDONYM_CACHE_CAPACITY)
    }
}

impl fmt::Debug for Pseudonymizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pseudonymizer")
            .field("cached", &self.len())
            .field("capacity", &self.capacity())
            .field("locales", &self.generators.read().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VeilError;
    use rand::Rng;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingGenerator;

    impl SyntheticGenerator for CountingGenerator {
        fn generate(&self, kind: SemanticKind, rng: &mut ChaCha8Rng) -> String {
            format!("{kind:?}-{}", rng.gen::<u32>())
        }
    }

    fn counting(capacity: usize, created: Arc<AtomicUsize>) -> Pseudonymizer {
        Pseudonymizer::with_generator_factory(
            capacity,
            Box::new(move |_| {
                created.fetch_add(1, Ordering::SeqCst);
                Ok(Arc::new(CountingGenerator) as Arc<dyn SyntheticGenerator>)
            }),
        )
    }

    #[test]
    fn test_seed_is_first_four_md5_bytes() {
        // md5("abc") = 900150983cd24fb0...
        assert_eq!(seed_for("abc"), 0x9001_5098);
    }

    #[test]
    fn test_seeded_pseudonyms_are_stable() {
        let created = Arc::new(AtomicUsize::new(0));
        let pseudonymizer = counting(16, Arc::clone(&created));

        let a = pseudonymizer
            .pseudonymize("John Doe", Locale::EnUs, SemanticKind::Name, true)
            .unwrap();
        let b = pseudonymizer
            .pseudonymize("John Doe", Locale::EnUs, SemanticKind::Name, true)
            .unwrap();
        let c = pseudonymizer
            .pseudonymize("Jane Roe", Locale::EnUs, SemanticKind::Name, true)
            .unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(pseudonymizer.len(), 2);
        assert_eq!(created.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_kind_is_part_of_cache_key() {
        let pseudonymizer = counting(16, Arc::new(AtomicUsize::new(0)));
        let name = pseudonymizer
            .pseudonymize("x", Locale::EnUs, SemanticKind::Name, true)
            .unwrap();
        let email = pseudonymizer
            .pseudonymize("x", Locale::EnUs, SemanticKind::Email, true)
            .unwrap();
        assert_ne!(name, email);
        assert_eq!(pseudonymizer.len(), 2);
    }

    #[test]
    fn test_eviction_regenerates_same_value() {
        let pseudonymizer = counting(1, Arc::new(AtomicUsize::new(0)));
        let first = pseudonymizer
            .pseudonymize("a", Locale::EnUs, SemanticKind::Name, true)
            .unwrap();
        pseudonymizer
            .pseudonymize("b", Locale::EnUs, SemanticKind::Name, true)
            .unwrap();
        assert_eq!(pseudonymizer.len(), 1);

        let again = pseudonymizer
            .pseudonymize("a", Locale::EnUs, SemanticKind::Name, true)
            .unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn test_unseeded_bypasses_cache() {
        let pseudonymizer = counting(16, Arc::new(AtomicUsize::new(0)));
        pseudonymizer.pseudonymize("a", Locale::EnUs, SemanticKind::Name, false).unwrap();
        assert!(pseudonymizer.is_empty());
    }

    #[test]
    fn test_clear_and_capacity() {
        let pseudonymizer = counting(0, Arc::new(AtomicUsize::new(0)));
        assert_eq!(pseudonymizer.capacity(), 1);
        pseudonymizer.pseudonymize("a", Locale::EnUs, SemanticKind::Name, true).unwrap();
        pseudonymizer.clear();
        assert!(pseudonymizer.is_empty());
    }

    #[test]
    fn test_generator_failure_is_propagated() {
        let pseudonymizer = Pseudonymizer::with_generator_factory(
            4,
            Box::new(|locale| Err(VeilError::Dependency(format!("no generator for {locale}")))),
        );
        let err = pseudonymizer
            .pseudonymize("a", Locale::JaJp, SemanticKind::Name, true)
            .unwrap_err();
        assert!(matches!(err, VeilError::Dependency(_)));
    }
}
