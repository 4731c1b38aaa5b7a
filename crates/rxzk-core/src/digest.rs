//! # Content Digest
//!
//! Defines `ContentDigest` and `DigestAlgorithm`. Circuit shapes, keys and
//! scenario reports are identified by the SHA-256 digest of their canonical
//! bytes.
//!
//! ## Security Invariant
//!
//! [`sha256_digest()`] accepts only `&CanonicalBytes`. The one exception is
//! [`Sha256Accumulator`], used where a digest must mix canonical documents
//! with raw domain-separation tags (mock proof parts, round constants).

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;

/// Hash function tag carried next to every digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    /// SHA-256.
    Sha256,
}

impl DigestAlgorithm {
    /// Tag used in the `algo:hex` display form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
        }
    }
}

impl std::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 32-byte digest of a canonical document, tagged with its hash function.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest {
    pub algorithm: DigestAlgorithm,
    pub bytes: [u8; 32],
}

impl ContentDigest {
    /// Wrap raw digest bytes.
    pub fn new(algorithm: DigestAlgorithm, bytes: [u8; 32]) -> Self {
        Self { algorithm, bytes }
    }

    /// Lowercase hex without the algorithm prefix.
    pub fn to_hex(&self) -> String {
        hex_lower(&self.bytes)
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.to_hex())
    }
}

/// SHA-256 of a canonical document.
pub fn sha256_digest(data: &CanonicalBytes) -> ContentDigest {
    let mut acc = Sha256Accumulator::new();
    acc.update(data.as_bytes());
    ContentDigest::new(DigestAlgorithm::Sha256, acc.finalize_bytes())
}

/// [`sha256_digest`] as bare lowercase hex.
pub fn sha256_hex(data: &CanonicalBytes) -> String {
    sha256_digest(data).to_hex()
}

fn hex_lower(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Incremental SHA-256 over a sequence of byte slices.
///
/// Callers are responsible for domain separation: every `update` sequence
/// should start with a fixed tag so that digests from different purposes
/// cannot collide.
#[derive(Clone, Default)]
pub struct Sha256Accumulator {
    hasher: Sha256,
}

impl std::fmt::Debug for Sha256Accumulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sha256Accumulator").finish_non_exhaustive()
    }
}

impl Sha256Accumulator {
    /// Start an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Absorb a byte slice.
    pub fn update(&mut self, data: &[u8]) -> &mut Self {
        self.hasher.update(data);
        self
    }

    /// Finish and return the raw 32-byte digest.
    pub fn finalize_bytes(self) -> [u8; 32] {
        self.hasher.finalize().into()
    }

    /// Finish and return the digest as a lowercase hex string.
    pub fn finalize_hex(self) -> String {
        hex_lower(&self.finalize_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_stable() {
        let cb = CanonicalBytes::new(&serde_json::json!({"b": "2", "a": "1"})).unwrap();
        assert_eq!(sha256_digest(&cb), sha256_digest(&cb));
    }

    #[test]
    fn display_is_tagged_hex() {
        let cb = CanonicalBytes::new(&serde_json::json!({"a": 1})).unwrap();
        let digest = sha256_digest(&cb);
        assert_eq!(digest.to_string(), format!("sha256:{}", digest.to_hex()));
        assert_eq!(digest.to_hex().len(), 64);
    }

    #[test]
    fn empty_object_vector() {
        let empty = CanonicalBytes::new(&serde_json::json!({})).unwrap();
        assert_eq!(
            sha256_hex(&empty),
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
    }

    #[test]
    fn accumulator_matches_one_shot() {
        let cb = CanonicalBytes::new(&serde_json::json!({})).unwrap();
        let mut acc = Sha256Accumulator::new();
        acc.update(b"{").update(b"}");
        assert_eq!(acc.finalize_hex(), sha256_hex(&cb));
    }

    #[test]
    fn accumulator_order_matters() {
        let mut a = Sha256Accumulator::new();
        a.update(b"ab").update(b"c");
        let mut b = Sha256Accumulator::new();
        b.update(b"c").update(b"ab");
        assert_ne!(a.finalize_bytes(), b.finalize_bytes());
    }
}
