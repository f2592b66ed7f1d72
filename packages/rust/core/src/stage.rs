//! Uniform stage contract: validate, execute, wrap the result in an [`Outcome`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, info, info_span, warn};

use pagegen_shared::{Clock, PageGenError, Result};

/// Metadata attached to a successful stage run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuccessMetadata {
    pub stage_id: &'static str,
    pub stage_type: &'static str,
    pub duration_ms: u64,
    pub timestamp: String,
    pub invocation_count: u64,
}

/// Metadata attached to a failed stage run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureMetadata {
    pub stage_id: &'static str,
    pub stage_type: &'static str,
    pub timestamp: String,
}

/// Result envelope returned by every [`Stage::run`].
#[derive(Debug)]
pub enum Outcome<T> {
    Success { data: T, metadata: SuccessMetadata },
    Failure {
        error: PageGenError,
        metadata: FailureMetadata,
    },
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&PageGenError> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error, .. } => Some(error),
        }
    }

    /// Drop the metadata and keep the payload or the error.
    pub fn into_result(self) -> Result<T> {
        match self {
            Self::Success { data, .. } => Ok(data),
            Self::Failure { error, .. } => Err(error),
        }
    }
}

/// Snapshot returned by [`Stage::info`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageInfo {
    pub stage_id: &'static str,
    pub stage_type: &'static str,
    pub invocation_count: u64,
    pub last_invocation: Option<String>,
}

/// Identity and informational counters shared by all stages.
pub struct StageStats {
    id: &'static str,
    kind: &'static str,
    invocations: AtomicU64,
    last_invocation: Mutex<Option<DateTime<Utc>>>,
    clock: Arc<dyn Clock>,
}

impl StageStats {
    pub fn new(id: &'static str, kind: &'static str, clock: Arc<dyn Clock>) -> Self {
        Self {
            id,
            kind,
            invocations: AtomicU64::new(0),
            last_invocation: Mutex::new(None),
            clock,
        }
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Count one invocation and stamp it. Returns the new count.
    fn record(&self) -> u64 {
        if let Ok(mut last) = self.last_invocation.lock() {
            *last = Some(self.clock.now());
        }
        self.invocations.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn info(&self) -> StageInfo {
        let last_invocation = self
            .last_invocation
            .lock()
            .ok()
            .and_then(|last| last.map(|ts| ts.to_rfc3339()));
        StageInfo {
            stage_id: self.id,
            stage_type: self.kind,
            invocation_count: self.invocations.load(Ordering::Relaxed),
            last_invocation,
        }
    }

    pub fn reset(&self) {
        self.invocations.store(0, Ordering::Relaxed);
        if let Ok(mut last) = self.last_invocation.lock() {
            *last = None;
        }
        debug!(stage = self.id, "stage counters reset");
    }

    fn failure_metadata(&self) -> FailureMetadata {
        FailureMetadata {
            stage_id: self.id,
            stage_type: self.kind,
            timestamp: self.clock.timestamp(),
        }
    }
}

impl std::fmt::Debug for StageStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageStats")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("invocations", &self.invocations.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// One pipeline stage.
///
/// Implementors supply [`validate`](Stage::validate) and
/// [`execute`](Stage::execute); callers use [`run`](Stage::run), which never
/// executes on invalid input and never lets an error escape the envelope.
pub trait Stage {
    type Input<'a>;
    type Output;

    fn stats(&self) -> &StageStats;

    /// Check the stage's required input fields.
    fn validate(&self, input: &Self::Input<'_>) -> Result<()>;

    /// The stage's transformation. Only called on validated input.
    fn execute(&self, input: &Self::Input<'_>) -> Result<Self::Output>;

    fn run(&self, input: &Self::Input<'_>) -> Outcome<Self::Output> {
        let stats = self.stats();
        let span = info_span!("stage", stage_id = stats.id(), stage_type = stats.kind());
        let _enter = span.enter();

        let started = Instant::now();
        let invocation_count = stats.record();

        if let Err(e) = self.validate(input) {
            warn!(error = %e, "stage input rejected");
            return Outcome::Failure {
                error: e,
                metadata: stats.failure_metadata(),
            };
        }

        match self.execute(input) {
            Ok(data) => {
                let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
                info!(duration_ms, invocation_count, "stage completed");
                Outcome::Success {
                    data,
                    metadata: SuccessMetadata {
                        stage_id: stats.id(),
                        stage_type: stats.kind(),
                        duration_ms,
                        timestamp: stats.clock().timestamp(),
                        invocation_count,
                    },
                }
            }
            Err(e) => {
                error!(error = %e, "stage failed");
                Outcome::Failure {
                    error: e,
                    metadata: stats.failure_metadata(),
                }
            }
        }
    }

    fn info(&self) -> StageInfo {
        self.stats().info()
    }

    fn reset(&self) {
        self.stats().reset();
    }
}

/// Validation error naming every missing item, or `Ok` when none are missing.
pub(crate) fn require_none_missing(what: &str, missing: &[&str]) -> Result<()> {
    if missing.is_empty() {
        Ok(())
    } else {
        Err(PageGenError::validation(format!(
            "{what} missing required fields: {}",
            missing.join(", ")
        )))
    }
}

/// Validation error unless `name` has visible characters.
pub(crate) fn require_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        Err(PageGenError::validation("product name is required"))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pagegen_shared::FixedClock;
    use std::sync::atomic::AtomicBool;

    struct Doubler {
        stats: StageStats,
        executed: AtomicBool,
    }

    impl Doubler {
        fn new() -> Self {
            let clock = FixedClock(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
            Self {
                stats: StageStats::new("doubler_001", "doubler", Arc::new(clock)),
                executed: AtomicBool::new(false),
            }
        }
    }

    impl Stage for Doubler {
        type Input<'a> = i64;
        type Output = i64;

        fn stats(&self) -> &StageStats {
            &self.stats
        }

        fn validate(&self, input: &i64) -> Result<()> {
            if *input < 0 {
                return Err(PageGenError::validation("negative input"));
            }
            Ok(())
        }

        fn execute(&self, input: &i64) -> Result<i64> {
            self.executed.store(true, Ordering::SeqCst);
            input
                .checked_mul(2)
                .ok_or_else(|| PageGenError::transformation("overflow"))
        }
    }

    #[test]
    fn success_carries_metadata() {
        let stage = Doubler::new();
        match stage.run(&21) {
            Outcome::Success { data, metadata } => {
                assert_eq!(data, 42);
                assert_eq!(metadata.stage_id, "doubler_001");
                assert_eq!(metadata.stage_type, "doubler");
                assert_eq!(metadata.invocation_count, 1);
                assert_eq!(metadata.timestamp, "2025-01-01T00:00:00+00:00");
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[test]
    fn invalid_input_never_executes() {
        let stage = Doubler::new();
        let outcome = stage.run(&-1);
        assert!(!outcome.is_success());
        assert!(matches!(outcome.error(), Some(PageGenError::Validation { .. })));
        assert!(!stage.executed.load(Ordering::SeqCst));
    }

    #[test]
    fn execution_errors_are_wrapped() {
        let stage = Doubler::new();
        let outcome = stage.run(&i64::MAX);
        match outcome {
            Outcome::Failure { error, metadata } => {
                assert!(matches!(error, PageGenError::Transformation { .. }));
                assert_eq!(metadata.stage_id, "doubler_001");
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn counter_counts_every_run_and_resets() {
        let stage = Doubler::new();
        let _ = stage.run(&1);
        let _ = stage.run(&-1);
        let _ = stage.run(&2);

        let info = stage.info();
        assert_eq!(info.invocation_count, 3);
        assert_eq!(info.last_invocation.as_deref(), Some("2025-01-01T00:00:00+00:00"));

        stage.reset();
        let info = stage.info();
        assert_eq!(info.invocation_count, 0);
        assert_eq!(info.last_invocation, None);
    }

    #[test]
    fn into_result_unwraps_envelope() {
        let stage = Doubler::new();
        assert_eq!(stage.run(&4).into_result().unwrap(), 8);
        assert!(stage.run(&-4).into_result().is_err());
    }

    #[test]
    fn missing_fields_are_all_named() {
        let err = require_none_missing("product record", &["price", "benefits"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "validation error: product record missing required fields: price, benefits"
        );
        assert!(require_none_missing("product record", &[]).is_ok());
        assert!(require_name("  ").is_err());
        assert!(require_name("Glow Serum").is_ok());
    }
}
