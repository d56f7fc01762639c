//! Sequence orchestration: ordered execution of a plan of test steps.
//!
//! A [`SequencePlan`] is an ordered list of run contexts. The canonical Zn
//! test is three steps — two constant-voltage conditioning steps followed by
//! one square-wave voltammetry measurement — but nothing here is specific to
//! that shape; any ordered list executes the same way.
//!
//! The orchestrator walks the plan strictly in order on a single task,
//! blocking at each instrument call. Steps share one instrument connection
//! with no concurrent-access contract, so one-step-at-a-time execution is
//! enforced by construction. A step failure aborts the whole sequence
//! immediately: the steps are physically ordered and skipping a conditioning
//! step would invalidate the scientific meaning of later ones. The single
//! non-fatal path is persistence after a successful run, which is logged and
//! recorded as a warning while the sequence continues.
//!
//! Cancellation is best-effort via [`CancelToken`], checked between steps
//! only; an in-flight instrument call is treated as atomic and cannot be
//! interrupted from here.

use crate::archive::Archiver;
use crate::context::{RunContext, StepProperties, TestOptions};
use crate::error::ZnError;
use crate::estimate::DurationEstimator;
use crate::instrument::Potentiostat;
use crate::plot::ChartRenderer;
use crate::runner::TestRunner;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Ordered list of test steps to execute.
#[derive(Debug, Clone)]
pub struct SequencePlan {
    steps: Vec<RunContext>,
}

impl SequencePlan {
    /// Plan over an arbitrary ordered list of contexts.
    pub fn new(steps: Vec<RunContext>) -> Self {
        Self { steps }
    }

    /// The canonical Zn-test plan: `cv1`, `cv2`, then `swv`, in that order.
    ///
    /// Per-kind save flags from `options` decide each step's persistence;
    /// compound and subfolder settings apply to every step.
    pub fn zn_test(
        cv1: StepProperties,
        cv2: StepProperties,
        swv: StepProperties,
        options: &TestOptions,
    ) -> Self {
        let steps = [cv1, cv2, swv]
            .into_iter()
            .map(|properties| {
                let persist = options.persist_for(properties.kind());
                RunContext::new(properties, options, persist)
            })
            .collect();
        Self { steps }
    }

    /// Steps in execution order.
    pub fn steps(&self) -> &[RunContext] {
        &self.steps
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the plan has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Best-effort cancellation flag, checked between steps.
///
/// Sticky: once cancelled it stays cancelled. Use a fresh orchestrator (and
/// with it a fresh token) per operator session. Mid-call cancellation is
/// unsupported; a set token takes effect before the next step starts.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Request cancellation before the next step.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Terminal result of one sequence invocation.
#[derive(Debug)]
pub enum SequenceOutcome {
    /// Every step ran; persistence warnings (if any) are listed.
    Completed {
        /// Number of steps executed.
        completed: usize,
        /// Non-fatal persistence failures, one entry per affected step.
        warnings: Vec<String>,
    },
    /// A step failed; later steps were never dispatched.
    Aborted {
        /// Zero-based index of the failed step. Execution is strictly in
        /// order, so this is also the number of steps that finished.
        step: usize,
        /// Label of the failed step.
        title: String,
        /// The step-level failure.
        error: ZnError,
    },
    /// Cancellation was observed between steps.
    Cancelled {
        /// Steps that finished before cancellation took effect.
        completed: usize,
    },
}

impl SequenceOutcome {
    /// Whether every step of the plan executed.
    pub fn is_complete(&self) -> bool {
        matches!(self, SequenceOutcome::Completed { .. })
    }
}

/// Executes sequence plans against one instrument connection.
///
/// All collaborators are injected: the already-connected driver, the chart
/// renderer, and the archiver. A fresh invocation of [`run`] always starts
/// its plan from step 0; there is no resume.
///
/// [`run`]: SequenceOrchestrator::run
pub struct SequenceOrchestrator {
    runner: TestRunner,
    estimator: DurationEstimator,
    archiver: Archiver,
    cancel: CancelToken,
}

impl SequenceOrchestrator {
    /// Orchestrator over an already-connected driver.
    pub fn new(
        driver: Arc<dyn Potentiostat>,
        renderer: Arc<dyn ChartRenderer>,
        archiver: Archiver,
    ) -> Self {
        Self {
            runner: TestRunner::new(driver.clone(), renderer),
            estimator: DurationEstimator::new(driver),
            archiver,
            cancel: CancelToken::default(),
        }
    }

    /// Handle for requesting between-step cancellation.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Execute `plan` in order, fail-fast.
    ///
    /// Logs the projected completion time first (advisory; an estimate
    /// failure only warns). Each successful step with `persist` set is
    /// archived exactly once; an archive failure is recorded as a warning
    /// and the sequence continues.
    pub async fn run(&self, plan: &SequencePlan) -> SequenceOutcome {
        match self.estimator.projected_end(plan).await {
            Ok(end) => info!("Expected end time is {}", end.format("%H:%M:%S")),
            Err(e) => warn!("duration estimate unavailable: {e}"),
        }

        let mut warnings = Vec::new();
        for (index, ctx) in plan.steps().iter().enumerate() {
            if self.cancel.is_cancelled() {
                info!("sequence cancelled before step {index} ('{}')", ctx.title);
                return SequenceOutcome::Cancelled { completed: index };
            }

            match self.runner.run(ctx).await {
                Ok(run) => {
                    if ctx.persist {
                        if let Err(e) = self.archiver.archive(ctx, &run) {
                            warn!("persistence failed after '{}': {e}", ctx.title);
                            warnings.push(format!("{}: {e}", ctx.title));
                        }
                    }
                }
                Err(e) => {
                    error!("step {index} ('{}') failed: {e}", ctx.title);
                    return SequenceOutcome::Aborted {
                        step: index,
                        title: ctx.title.clone(),
                        error: e,
                    };
                }
            }
        }

        info!("sequence complete: {} steps", plan.len());
        SequenceOutcome::Completed {
            completed: plan.len(),
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{ConstantVoltageParams, ProtocolKind, SquareWaveParams};

    fn cv(title: &str) -> StepProperties {
        StepProperties {
            current_range: "100uA".to_string(),
            sample_rate_hz: 100,
            parameters: ConstantVoltageParams::default().into(),
            title: title.to_string(),
            create_plot: false,
        }
    }

    fn swv() -> StepProperties {
        StepProperties {
            current_range: "100uA".to_string(),
            sample_rate_hz: 100,
            parameters: SquareWaveParams::default().into(),
            title: "Square Wave Voltammetry".to_string(),
            create_plot: true,
        }
    }

    #[test]
    fn zn_test_plan_orders_cv_cv_swv() {
        let plan = SequencePlan::zn_test(cv("cv1"), cv("cv2"), swv(), &TestOptions::default());
        assert_eq!(plan.len(), 3);
        let kinds: Vec<_> = plan.steps().iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ProtocolKind::ConstantVoltage,
                ProtocolKind::ConstantVoltage,
                ProtocolKind::SquareWaveVoltammetry,
            ]
        );
    }

    #[test]
    fn per_kind_save_flags_set_step_persistence() {
        let options = TestOptions {
            save_constant_voltage: false,
            save_square_wave: true,
            ..TestOptions::default()
        };
        let plan = SequencePlan::zn_test(cv("cv1"), cv("cv2"), swv(), &options);
        let persist: Vec<_> = plan.steps().iter().map(|s| s.persist).collect();
        assert_eq!(persist, vec![false, false, true]);
    }

    #[test]
    fn cancel_token_is_sticky() {
        let token = CancelToken::default();
        assert!(!token.is_cancelled());
        token.cancel();
        assert!(token.is_cancelled());
        let clone = token.clone();
        assert!(clone.is_cancelled());
    }
}
