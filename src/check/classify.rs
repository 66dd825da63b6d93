//! Classification of a single target.

use tracing::{debug, instrument};

use super::{SignatureSet, StatusClass};
use crate::probe::{ProbeOutcome, Prober, Resolver};

/// Maps a target to exactly one [`StatusClass`].
///
/// Resolution runs first and gates the HTTP probe: a host that does not
/// resolve is reported as `Unresolvable` without any request being made.
/// Once resolution has succeeded, any probe failure is `Unreachable`.
pub struct Classifier {
    resolver: Box<dyn Resolver>,
    prober: Box<dyn Prober>,
    signatures: SignatureSet,
}

impl Classifier {
    pub fn new<R, P>(resolver: R, prober: P, signatures: SignatureSet) -> Self
    where
        R: Resolver + 'static,
        P: Prober + 'static,
    {
        Self {
            resolver: Box::new(resolver),
            prober: Box::new(prober),
            signatures,
        }
    }

    pub fn signatures(&self) -> &SignatureSet {
        &self.signatures
    }

    /// Classify one target. Never fails.
    #[instrument(skip(self))]
    pub async fn classify(&self, target: &str) -> StatusClass {
        if !self.resolver.resolve(target).await {
            debug!("Host does not resolve");
            return StatusClass::Unresolvable;
        }

        let outcome = self.prober.probe(target).await;
        let status = self.classify_outcome(&outcome);
        debug!(?status, "Classified");
        status
    }

    /// Classify a probe outcome for a target already known to resolve.
    pub fn classify_outcome(&self, outcome: &ProbeOutcome) -> StatusClass {
        match outcome {
            ProbeOutcome::TransportFailure => StatusClass::Unreachable,
            ProbeOutcome::Responded { status_code, .. } if *status_code != 200 => {
                StatusClass::HttpError { code: *status_code }
            }
            ProbeOutcome::Responded { body, .. } => match self.signatures.first_match(body) {
                Some(phrase) => StatusClass::SoftDown {
                    matched_pattern: phrase.to_string(),
                },
                None => StatusClass::Healthy,
            },
        }
    }
}
