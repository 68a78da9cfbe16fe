//! Schedule identifiers and content fingerprints.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use uuid::Uuid;

/// Identifier for a schedule held by a host (e.g. the HTTP server).
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduleId(String);

impl ScheduleId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScheduleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for ScheduleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScheduleId({})", self.0)
    }
}

impl From<String> for ScheduleId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ScheduleId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A deterministic content digest.
///
/// Uses SHA256 and keeps the first 16 hex characters, which is plenty to tell
/// two schedules apart in logs and responses.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Digest a sequence of byte chunks, separated so that `["ab", "c"]` and
    /// `["a", "bc"]` hash differently.
    pub fn of(chunks: &[&[u8]]) -> Self {
        let mut hasher = Sha256::new();
        for (i, chunk) in chunks.iter().enumerate() {
            if i > 0 {
                hasher.update(b"|");
            }
            hasher.update(chunk);
        }
        let hash = hex::encode(hasher.finalize());
        Self(hash[..16].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.0)
    }
}
