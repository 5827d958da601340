//! Hash strategy

use crate::anonymization::rules::HashAlgorithm;
use md5::Md5;
use sha2::{Digest, Sha256, Sha512};

/// Number of hex characters of the derived salt
const SALT_LEN: usize = 8;

/// Hashes the canonical form of a value and returns lowercase hex
///
/// With `salt`, the first eight hex characters of the MD5 of the input are
/// prepended before digesting. The salt is derived from the input, so equal
/// inputs still hash equally across runs and datasets.
///
/// # Examples
///
/// ```
/// use veil::anonymization::rules::HashAlgorithm;
/// use veil::anonymization::strategy::hash::hash_value;
///
/// let digest = hash_value("ann@example.com", HashAlgorithm::Sha256, false);
/// assert_eq!(digest.len(), 64);
/// ```
pub fn hash_value(canonical: &str, algorithm: HashAlgorithm, salt: bool) -> String {
    let input = if salt {
        let mut salted = md5_hex(canonical);
        salted.truncate(SALT_LEN);
        salted.push_str(canonical);
        salted
    } else {
        canonical.to_string()
    };

    let bytes = input.as_bytes();
    match algorithm {
        HashAlgorithm::Sha256 => format!("{:x}", Sha256::digest(bytes)),
        HashAlgorithm::Sha512 => format!("{:x}", Sha512::digest(bytes)),
        HashAlgorithm::Md5 => format!("{:x}", Md5::digest(bytes)),
    }
}

/// MD5 digest of `input` as lowercase hex
pub(crate) fn md5_hex(input: &str) -> String {
    format!("{:x}", Md5::digest(input.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_known_digests() {
        assert_eq!(
            hash_value("abc", HashAlgorithm::Sha256, false),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(
            hash_value("abc", HashAlgorithm::Md5, false),
            "900150983cd24fb0d6963f7d28e17f72"
        );
        assert_eq!(
            hash_value("abc", HashAlgorithm::Sha512, false),
            "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a\
             2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f"
        );
    }

    #[test_case(HashAlgorithm::Sha256, 64)]
    #[test_case(HashAlgorithm::Sha512, 128)]
    #[test_case(HashAlgorithm::Md5, 32)]
    fn test_digest_length(algorithm: HashAlgorithm, len: usize) {
        let digest = hash_value("john.doe@example.com", algorithm, true);
        assert_eq!(digest.len(), len);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_salted_hash_matches_manual_construction() {
        let salt = &md5_hex("abc")[..8];
        let expected = hash_value(&format!("{salt}abc"), HashAlgorithm::Sha256, false);
        assert_eq!(hash_value("abc", HashAlgorithm::Sha256, true), expected);
    }

    #[test]
    fn test_deterministic_and_distinct() {
        let a = hash_value("alice", HashAlgorithm::Sha256, true);
        let b = hash_value("alice", HashAlgorithm::Sha256, true);
        let c = hash_value("bob", HashAlgorithm::Sha256, true);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, hash_value("alice", HashAlgorithm::Sha256, false));
    }
}
