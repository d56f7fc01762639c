//! Test runner: executes exactly one run context against the instrument.
//!
//! The runner owns the fixed per-step sequence: resolve the protocol name,
//! configure current range then sample rate, time the blocking test call,
//! and optionally hand the series to the chart renderer. It performs no
//! retries — the instrument call has physical side effects and is not
//! idempotent-safe — and leaves retry policy to the caller, which by design
//! does not retry mid-sequence.

use crate::context::RunContext;
use crate::error::{ZnError, ZnResult};
use crate::instrument::Potentiostat;
use crate::measurement::CompletedRun;
use crate::plot::{ChartRenderer, PlotKind};
use crate::protocol;
use chrono::Local;
use std::sync::Arc;
use tracing::{info, warn};

/// Drives the instrument through single runs.
pub struct TestRunner {
    driver: Arc<dyn Potentiostat>,
    renderer: Arc<dyn ChartRenderer>,
}

impl TestRunner {
    /// Runner over an already-connected driver and a chart renderer.
    pub fn new(driver: Arc<dyn Potentiostat>, renderer: Arc<dyn ChartRenderer>) -> Self {
        Self { driver, renderer }
    }

    /// Execute one run context and return the collected series with timing.
    ///
    /// Aborts before contacting the instrument on a protocol mismatch, and
    /// before executing on a configuration rejection. The `run_test` await
    /// spans the full physical test; its wall-clock duration is the actual
    /// run time, not the estimate.
    pub async fn run(&self, ctx: &RunContext) -> ZnResult<CompletedRun> {
        let name = protocol::resolve(ctx.kind, &ctx.parameters)?;

        self.driver
            .set_current_range(&ctx.current_range)
            .await
            .map_err(|e| ZnError::InstrumentConfigurationFailed(format!("{e:#}")))?;
        self.driver
            .set_sample_rate(ctx.sample_rate_hz)
            .await
            .map_err(|e| ZnError::InstrumentConfigurationFailed(format!("{e:#}")))?;

        let started_at = Local::now();
        info!(
            "[{}]\t{} is starting",
            started_at.format("%H:%M:%S"),
            ctx.title
        );

        let series = self
            .driver
            .run_test(name, &ctx.parameters)
            .await
            .map_err(|e| ZnError::InstrumentRunFailed(format!("{e:#}")))?;

        let finished_at = Local::now();
        info!(
            "[{}]\t{} is finished",
            finished_at.format("%H:%M:%S"),
            ctx.title
        );

        if ctx.create_plot {
            for plot in PlotKind::ALL {
                if let Err(e) = self.renderer.render(plot, &series) {
                    warn!("chart rendering failed for {:?}: {:#}", plot, e);
                }
            }
        }

        Ok(CompletedRun {
            title: ctx.title.clone(),
            series,
            started_at,
            finished_at,
        })
    }
}
