//! Duration estimation for runs and whole sequences.
//!
//! The device computes per-test timing from the configured parameters; this
//! module only delegates and aggregates. The total for a plan is the sum of
//! per-step estimates, and the projected end time is `now + total`. Both are
//! advisory: they have no effect on execution and a failed estimate never
//! blocks a sequence.

use crate::context::RunContext;
use crate::error::{ZnError, ZnResult};
use crate::instrument::Potentiostat;
use crate::protocol;
use crate::sequence::SequencePlan;
use chrono::{DateTime, Duration, Local};
use std::sync::Arc;

/// Forecasts wall-clock durations without executing anything.
pub struct DurationEstimator {
    driver: Arc<dyn Potentiostat>,
}

impl DurationEstimator {
    /// Estimator over an already-connected driver.
    pub fn new(driver: Arc<dyn Potentiostat>) -> Self {
        Self { driver }
    }

    /// Expected duration of one step, in seconds.
    pub async fn estimate(&self, ctx: &RunContext) -> ZnResult<f64> {
        let name = protocol::resolve(ctx.kind, &ctx.parameters)?;
        self.driver
            .estimated_duration(name, &ctx.parameters)
            .await
            .map_err(|e| ZnError::Instrument(format!("{e:#}")))
    }

    /// Expected duration of a whole plan: the sum of its step estimates.
    pub async fn total_estimate(&self, plan: &SequencePlan) -> ZnResult<f64> {
        let mut total = 0.0;
        for step in plan.steps() {
            total += self.estimate(step).await?;
        }
        Ok(total)
    }

    /// Projected wall-clock completion time for a plan started now.
    pub async fn projected_end(&self, plan: &SequencePlan) -> ZnResult<DateTime<Local>> {
        let total = self.total_estimate(plan).await?;
        let millis = (total * 1_000.0).round() as i64;
        Ok(Local::now() + Duration::milliseconds(millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{StepProperties, TestOptions};
    use crate::mock::MockPotentiostat;
    use crate::protocol::{ConstantVoltageParams, SquareWaveParams, TestParameters};

    fn step(parameters: TestParameters, title: &str) -> RunContext {
        let properties = StepProperties {
            current_range: "100uA".to_string(),
            sample_rate_hz: 100,
            parameters,
            title: title.to_string(),
            create_plot: false,
        };
        RunContext::new(properties, &TestOptions::default(), false)
    }

    #[tokio::test]
    async fn total_is_the_sum_of_step_estimates() {
        let driver = Arc::new(MockPotentiostat::new());
        let estimator = DurationEstimator::new(driver);

        let steps = vec![
            step(ConstantVoltageParams::holding(-1.0, 5_000, 1_000).into(), "cv1"),
            step(ConstantVoltageParams::holding(-0.5, 2_000, 500).into(), "cv2"),
            step(SquareWaveParams::default().into(), "swv"),
        ];

        let mut expected = 0.0;
        for ctx in &steps {
            expected += estimator.estimate(ctx).await.unwrap();
        }
        let plan = SequencePlan::new(steps);
        let total = estimator.total_estimate(&plan).await.unwrap();
        assert!((total - expected).abs() < 1e-9);
        assert!(total > 0.0);
    }

    #[tokio::test]
    async fn total_of_an_empty_plan_is_zero() {
        let estimator = DurationEstimator::new(Arc::new(MockPotentiostat::new()));
        let plan = SequencePlan::new(Vec::new());
        assert_eq!(estimator.total_estimate(&plan).await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn projected_end_is_in_the_future_for_nonzero_plans() {
        let estimator = DurationEstimator::new(Arc::new(MockPotentiostat::new()));
        let plan = SequencePlan::new(vec![step(
            ConstantVoltageParams::holding(-1.0, 5_000, 1_000).into(),
            "cv1",
        )]);
        let before = Local::now();
        let end = estimator.projected_end(&plan).await.unwrap();
        assert!(end > before);
    }
}
