//! Probe module for target checks.
//!
//! Supports DNS resolvability and single-shot HTTP GET probes. Both are
//! exposed behind traits so the classifier can be driven by stubs.

mod dns;
mod http;

pub use dns::*;
pub use http::*;

use async_trait::async_trait;
use thiserror::Error;

/// Probe error types.
///
/// Probes themselves never fail; these only come up while building them.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Raw outcome of one HTTP GET against a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// A response arrived. `body` is lower-cased.
    Responded { status_code: u16, body: String },
    /// Timeout, refused connection, TLS error or any other I/O failure.
    TransportFailure,
}

/// Answers whether a target's host resolves to at least one address.
#[async_trait]
pub trait Resolver: Send + Sync {
    async fn resolve(&self, target: &str) -> bool;
}

/// Issues a single bounded-time GET against a target.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, target: &str) -> ProbeOutcome;
}
