// Copyright 2026 Google LLC

//! Commit hash and archive digest types.

use crate::CommitHashParseError;
use base64::{Engine, engine::general_purpose::STANDARD};
use sha2::{Digest, Sha256, Sha384};
use std::{fmt, str::FromStr};

/// A Git commit hash.
///
/// This type guarantees the contained value is either:
///
/// - 20 bytes (SHA-1, displayed as 40 lowercase hex characters)
/// - 32 bytes (SHA-256, displayed as 64 lowercase hex characters)
///
/// # Parsing
///
/// Parse from a hex string using [`FromStr`]:
///
/// ```
/// use workspace_snippets::CommitHash;
///
/// let hash: CommitHash =
///     "0123456789abcdef0123456789abcdef01234567".parse().unwrap();
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CommitHash {
    /// A SHA-1 hash: the one traditionally used in Git.
    Sha1([u8; 20]),
    /// A SHA-256 hash, supported by newer versions of Git.
    Sha256([u8; 32]),
}

impl CommitHash {
    /// Returns the raw hash bytes.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            CommitHash::Sha1(bytes) => bytes,
            CommitHash::Sha256(bytes) => bytes,
        }
    }
}

impl FromStr for CommitHash {
    type Err = CommitHashParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        fn decode<const N: usize>(
            s: &str,
        ) -> Result<[u8; N], CommitHashParseError> {
            let mut bytes = [0; N];
            hex::decode_to_slice(s, &mut bytes)
                .map_err(CommitHashParseError::InvalidHex)?;
            Ok(bytes)
        }

        match s.len() {
            40 => decode(s).map(CommitHash::Sha1),
            64 => decode(s).map(CommitHash::Sha256),
            len => Err(CommitHashParseError::InvalidLength(len)),
        }
    }
}

impl fmt::Display for CommitHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.as_bytes()))
    }
}

/// The SHA-256 checksum of a source archive, as used by `sha256` fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ArchiveChecksum([u8; 32]);

impl ArchiveChecksum {
    /// Computes the checksum of the given archive contents.
    pub fn of(contents: &[u8]) -> Self {
        let mut bytes = [0; 32];
        bytes.copy_from_slice(&Sha256::digest(contents));
        ArchiveChecksum(bytes)
    }

    /// Wraps an already computed digest.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        ArchiveChecksum(bytes)
    }

    /// Returns the raw digest.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for ArchiveChecksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// A subresource-integrity style digest of a source archive, as used by
/// `integrity` fields.
///
/// Displayed as `sha384-` followed by the standard base64 encoding of the
/// SHA-384 digest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ArchiveIntegrity([u8; 48]);

impl ArchiveIntegrity {
    /// Computes the integrity digest of the given archive contents.
    pub fn of(contents: &[u8]) -> Self {
        let mut bytes = [0; 48];
        bytes.copy_from_slice(&Sha384::digest(contents));
        ArchiveIntegrity(bytes)
    }

    /// Returns the raw digest.
    pub fn as_bytes(&self) -> &[u8; 48] {
        &self.0
    }
}

impl fmt::Display for ArchiveIntegrity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sha384-{}", STANDARD.encode(self.0))
    }
}
