//! Batch runner that classifies an ordered list of targets.

use crate::check::{CheckResult, Classifier, StatusClass};

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::{self, JoinSet};

/// Batch error types.
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("check worker was cancelled: {0}")]
    Cancelled(task::JoinError),
}

/// Why a target has no result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingReason {
    /// The batch deadline expired before the check finished.
    DeadlineExpired,
    /// The check panicked.
    CheckFailed,
}

impl fmt::Display for MissingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingReason::DeadlineExpired => write!(f, "batch deadline expired"),
            MissingReason::CheckFailed => write!(f, "check failed"),
        }
    }
}

/// A target that has no result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingTarget {
    /// Position of the target in the input list.
    pub index: usize,
    pub target: String,
    pub reason: MissingReason,
}

/// Outcome of one batch.
///
/// `results` keeps input order. Targets left without a status, because the
/// deadline cut the batch short or their check panicked, are listed in
/// `missing` rather than given a made-up one.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub results: Vec<CheckResult>,
    pub missing: Vec<MissingTarget>,
}

impl BatchReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

#[derive(Debug, Clone)]
enum Slot {
    Pending,
    Done(StatusClass),
    Failed,
}

/// Runs the classifier over a target list with bounded concurrency.
pub struct BatchRunner {
    classifier: Arc<Classifier>,
    concurrency: usize,
    deadline: Option<Duration>,
}

impl BatchRunner {
    /// Create a runner checking at most `concurrency` targets at once.
    ///
    /// A concurrency of 1 checks targets strictly one after another.
    pub fn new(classifier: Arc<Classifier>, concurrency: usize) -> Self {
        Self {
            classifier,
            concurrency: concurrency.max(1),
            deadline: None,
        }
    }

    /// Abandon the batch after `deadline`, reporting unfinished targets as missing.
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Classify every target. The i-th result belongs to the i-th target.
    ///
    /// A panicking check only loses its own target, which is reported as
    /// missing.
    pub async fn run(&self, targets: Vec<String>) -> Result<BatchReport, BatchError> {
        if targets.is_empty() {
            return Ok(BatchReport::default());
        }

        let started = Instant::now();
        tracing::info!(
            "Checking {} targets (concurrency {})",
            targets.len(),
            self.concurrency
        );

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();
        let mut indices = HashMap::with_capacity(targets.len());

        for (index, target) in targets.iter().enumerate() {
            let classifier = self.classifier.clone();
            let semaphore = semaphore.clone();
            let target = target.clone();

            let handle = tasks.spawn(async move {
                // Hold permit until done
                let _permit = semaphore.acquire_owned().await.ok();
                classifier.classify(&target).await
            });
            indices.insert(handle.id(), index);
        }

        let mut batch = Collector {
            targets: &targets,
            indices,
            slots: vec![Slot::Pending; targets.len()],
        };

        match self.deadline {
            Some(deadline) => {
                let drained = tokio::time::timeout(deadline, batch.drain(&mut tasks)).await;
                match drained {
                    Ok(result) => result?,
                    Err(_) => {
                        tracing::warn!(
                            "Batch deadline of {:?} expired, abandoning {} unfinished checks",
                            deadline,
                            tasks.len()
                        );
                        tasks.abort_all();
                    }
                }
            }
            None => batch.drain(&mut tasks).await?,
        }

        let slots = batch.slots;
        let mut report = BatchReport::default();
        for (index, (target, slot)) in targets.into_iter().zip(slots).enumerate() {
            let reason = match slot {
                Slot::Done(status) => {
                    report.results.push(CheckResult::new(target, status));
                    continue;
                }
                Slot::Pending => MissingReason::DeadlineExpired,
                Slot::Failed => MissingReason::CheckFailed,
            };
            report.missing.push(MissingTarget {
                index,
                target,
                reason,
            });
        }

        tracing::info!(
            "Batch finished in {:?}: {} checked, {} missing",
            started.elapsed(),
            report.results.len(),
            report.missing.len()
        );

        Ok(report)
    }
}

/// Places finished checks into their input slots.
struct Collector<'a> {
    targets: &'a [String],
    indices: HashMap<task::Id, usize>,
    slots: Vec<Slot>,
}

impl Collector<'_> {
    async fn drain(&mut self, tasks: &mut JoinSet<StatusClass>) -> Result<(), BatchError> {
        while let Some(joined) = tasks.join_next_with_id().await {
            match joined {
                Ok((id, status)) => {
                    if let Some(&index) = self.indices.get(&id) {
                        self.slots[index] = Slot::Done(status);
                    }
                }
                Err(e) if e.is_panic() => {
                    if let Some(&index) = self.indices.get(&e.id()) {
                        tracing::error!("Check of {} panicked: {}", self.targets[index], e);
                        self.slots[index] = Slot::Failed;
                    }
                }
                Err(e) => return Err(BatchError::Cancelled(e)),
            }
        }
        Ok(())
    }
}
