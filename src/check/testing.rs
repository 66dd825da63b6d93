//! Stub resolver and prober shared by unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::probe::{ProbeOutcome, Prober, Resolver};

/// Resolver that answers from a fixed set of resolvable targets.
#[derive(Clone, Default)]
pub(crate) struct StubResolver {
    pub resolvable: Vec<String>,
    pub calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Resolver for StubResolver {
    async fn resolve(&self, target: &str) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.resolvable.iter().any(|t| t == target)
    }
}

/// Prober returning canned outcomes, optionally after a delay.
///
/// `peak` records the largest number of probes seen in flight at once.
#[derive(Clone, Default)]
pub(crate) struct StubProber {
    pub outcomes: HashMap<String, (ProbeOutcome, Duration)>,
    pub panics_on: Vec<String>,
    pub calls: Arc<AtomicUsize>,
    pub in_flight: Arc<AtomicUsize>,
    pub peak: Arc<AtomicUsize>,
}

impl StubProber {
    pub fn with(mut self, target: &str, outcome: ProbeOutcome, delay: Duration) -> Self {
        self.outcomes.insert(target.to_string(), (outcome, delay));
        self
    }

    pub fn panicking_on(mut self, target: &str) -> Self {
        self.panics_on.push(target.to_string());
        self
    }
}

#[async_trait]
impl Prober for StubProber {
    async fn probe(&self, target: &str) -> ProbeOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.panics_on.iter().any(|t| t == target) {
            panic!("stub prober failed on {}", target);
        }

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(running, Ordering::SeqCst);

        let outcome = match self.outcomes.get(target) {
            Some((outcome, delay)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(*delay).await;
                }
                outcome.clone()
            }
            None => ProbeOutcome::TransportFailure,
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        outcome
    }
}

pub(crate) fn responded(status_code: u16, body: &str) -> ProbeOutcome {
    ProbeOutcome::Responded {
        status_code,
        body: body.to_lowercase(),
    }
}

/// Stubs for the four-target mixed batch.
pub(crate) fn mixed_stubs(delays: [Duration; 4]) -> (StubResolver, StubProber, Vec<String>) {
    let targets: Vec<String> = [
        "https://good.example.com",
        "https://404.example.com",
        "https://nosuchhost.invalid",
        "https://maint.example.com",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    let resolver = StubResolver {
        resolvable: vec![targets[0].clone(), targets[1].clone(), targets[3].clone()],
        ..Default::default()
    };
    let prober = StubProber::default()
        .with(&targets[0], responded(200, "<h1>Welcome</h1>"), delays[0])
        .with(&targets[1], responded(404, "not found"), delays[1])
        .with(&targets[2], responded(200, "unexpected"), delays[2])
        .with(&targets[3], responded(200, "Site under maintenance"), delays[3]);

    (resolver, prober, targets)
}
