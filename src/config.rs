//! Reader and writer configuration

use crate::fingerprint::DigestPolicy;

/// Configuration for reading archives
///
/// # Example
///
/// ```
/// use meshpart::{DigestPolicy, ReaderConfig};
///
/// let config = ReaderConfig::new()
///     .with_digest_policy(DigestPolicy::Portable)
///     .with_fingerprint_verification(true);
/// assert!(config.verify_fingerprint());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderConfig {
    digest_policy: DigestPolicy,
    verify_fingerprint: bool,
}

impl ReaderConfig {
    /// Create a reader configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the digest used for fingerprint verification and legacy
    /// identifier derivation
    pub fn with_digest_policy(mut self, policy: DigestPolicy) -> Self {
        self.digest_policy = policy;
        self
    }

    /// Re-hash decoded geometry and compare it to the stored fingerprint
    ///
    /// A mismatch fails the read with an integrity error. Off by default.
    pub fn with_fingerprint_verification(mut self, verify: bool) -> Self {
        self.verify_fingerprint = verify;
        self
    }

    /// Digest policy
    pub fn digest_policy(&self) -> DigestPolicy {
        self.digest_policy
    }

    /// Whether stored fingerprints are verified
    pub fn verify_fingerprint(&self) -> bool {
        self.verify_fingerprint
    }
}

/// Configuration for writing archives
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriterConfig {
    compression_level: Option<i64>,
    digest_policy: DigestPolicy,
}

impl WriterConfig {
    /// Create a writer configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Deflate level for compressed entries; `None` uses the deflate default
    pub fn with_compression_level(mut self, level: Option<i64>) -> Self {
        self.compression_level = level;
        self
    }

    /// Select the digest used when the writer computes a fingerprint
    pub fn with_digest_policy(mut self, policy: DigestPolicy) -> Self {
        self.digest_policy = policy;
        self
    }

    /// Deflate level
    pub fn compression_level(&self) -> Option<i64> {
        self.compression_level
    }

    /// Digest policy
    pub fn digest_policy(&self) -> DigestPolicy {
        self.digest_policy
    }
}
