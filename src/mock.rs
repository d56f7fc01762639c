//! Mock potentiostat for testing without hardware.
//!
//! Records every driver call in order, returns a canned series, and can be
//! scripted to reject configuration or fail the nth run. The duration model
//! is parameter-aware so that estimate-aggregation tests exercise genuinely
//! different per-step values.

use crate::instrument::Potentiostat;
use crate::measurement::RawSeries;
use crate::protocol::TestParameters;
use anyhow::{bail, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// One recorded driver invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum DriverCall {
    /// `set_current_range` with the requested range.
    SetCurrentRange(String),
    /// `set_sample_rate` with the requested rate.
    SetSampleRate(u32),
    /// `run_test` with the resolved protocol name.
    RunTest(String),
    /// `estimated_duration` with the resolved protocol name.
    EstimateDuration(String),
}

/// Scripted in-memory stand-in for a connected potentiostat.
pub struct MockPotentiostat {
    series: RawSeries,
    ranges: Vec<String>,
    reject_configuration: bool,
    fail_run_at: Option<usize>,
    runs: AtomicUsize,
    calls: Mutex<Vec<DriverCall>>,
}

impl MockPotentiostat {
    /// Mock returning a small three-sample series.
    pub fn new() -> Self {
        #[allow(clippy::unwrap_used)] // literal series of equal length
        let series = RawSeries::new(
            vec![0.0, 1.0, 2.0],
            vec![-1.0, -0.5, 0.0],
            vec![1.234, 5.678, 9.012],
        )
        .unwrap();
        Self {
            series,
            ranges: vec![
                "10uA".to_string(),
                "100uA".to_string(),
                "1000uA".to_string(),
            ],
            reject_configuration: false,
            fail_run_at: None,
            runs: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Replace the canned series every run returns.
    pub fn with_series(mut self, series: RawSeries) -> Self {
        self.series = series;
        self
    }

    /// Reject `set_current_range` and `set_sample_rate`.
    pub fn rejecting_configuration(mut self) -> Self {
        self.reject_configuration = true;
        self
    }

    /// Fail the run with zero-based index `index` (earlier runs succeed).
    pub fn failing_run_at(mut self, index: usize) -> Self {
        self.fail_run_at = Some(index);
        self
    }

    /// All driver calls recorded so far, in invocation order.
    pub async fn calls(&self) -> Vec<DriverCall> {
        self.calls.lock().await.clone()
    }

    /// Number of `run_test` invocations so far.
    pub fn runs_started(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }

    async fn record(&self, call: DriverCall) {
        self.calls.lock().await.push(call);
    }
}

impl Default for MockPotentiostat {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Potentiostat for MockPotentiostat {
    async fn available_current_ranges(&self) -> Result<Vec<String>> {
        Ok(self.ranges.clone())
    }

    async fn set_current_range(&self, range: &str) -> Result<()> {
        self.record(DriverCall::SetCurrentRange(range.to_string()))
            .await;
        if self.reject_configuration {
            bail!("simulated range rejection: {range}");
        }
        Ok(())
    }

    async fn set_sample_rate(&self, hz: u32) -> Result<()> {
        self.record(DriverCall::SetSampleRate(hz)).await;
        if self.reject_configuration {
            bail!("simulated sample-rate rejection: {hz}");
        }
        Ok(())
    }

    async fn run_test(&self, protocol: &str, _parameters: &TestParameters) -> Result<RawSeries> {
        self.record(DriverCall::RunTest(protocol.to_string())).await;
        let index = self.runs.fetch_add(1, Ordering::SeqCst);
        if self.fail_run_at == Some(index) {
            bail!("simulated device fault during run {index}");
        }
        Ok(self.series.clone())
    }

    async fn estimated_duration(
        &self,
        protocol: &str,
        parameters: &TestParameters,
    ) -> Result<f64> {
        self.record(DriverCall::EstimateDuration(protocol.to_string()))
            .await;
        // Rough device timing model: quiet phase plus active phase.
        let seconds = match parameters {
            TestParameters::ConstantVoltage(p) => (p.quiet_time + p.duration) as f64 / 1_000.0,
            TestParameters::SquareWaveVoltammetry(p) => {
                let steps = ((p.final_value - p.start_value) / p.step_value).abs();
                p.quiet_time as f64 / 1_000.0 + steps * 0.01
            }
        };
        Ok(seconds)
    }
}
