//! Status classification for monitored targets.
//!
//! A [`Classifier`] turns one target URL into exactly one [`StatusClass`],
//! combining a DNS resolvability check, a single HTTP probe and a scan of
//! the response body against an ordered [`SignatureSet`].

mod classify;
mod record;
mod signatures;

#[cfg(test)]
pub(crate) mod testing;

pub use classify::*;
pub use record::*;
pub use signatures::*;

use serde::{Deserialize, Serialize};

/// Result class of checking one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusClass {
    /// HTTP 200 with no soft-failure match.
    Healthy,
    /// A response arrived with a non-200 status.
    HttpError { code: u16 },
    /// HTTP 200 whose body matched an outage/maintenance signature.
    SoftDown { matched_pattern: String },
    /// The host resolves but no response could be obtained.
    Unreachable,
    /// The host does not resolve. No HTTP attempt was made.
    Unresolvable,
}

impl StatusClass {
    pub fn is_healthy(&self) -> bool {
        matches!(self, StatusClass::Healthy)
    }
}

/// A target paired with its status. Serializes to the flat wire record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "StatusRecord", try_from = "StatusRecord")]
pub struct CheckResult {
    pub target: String,
    pub status: StatusClass,
}

impl CheckResult {
    pub fn new(target: impl Into<String>, status: StatusClass) -> Self {
        Self {
            target: target.into(),
            status,
        }
    }
}
