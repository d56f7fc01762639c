//! Run contexts: the immutable description of one test invocation.
//!
//! The operator console collects two things: per-step electrical properties
//! (one set apiece for the two conditioning steps and the sweep) and
//! sequence-wide options (compound label, which outputs to save, optional
//! subfolder). Merging one [`StepProperties`] with the [`TestOptions`]
//! yields a [`RunContext`], the value the runner and archiver consume.
//! Contexts are built once per step per sequence and never mutated.
//!
//! All fields arrive range-validated from the console's validator; this
//! layer only guarantees structural completeness through the types.

use crate::protocol::{ProtocolKind, TestParameters};
use serde::{Deserialize, Serialize};

/// Per-step electrical configuration gathered by the operator console.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepProperties {
    /// Instrument-specific current range selector, e.g. `"100uA"`.
    pub current_range: String,
    /// Sampling rate in samples per second.
    pub sample_rate_hz: u32,
    /// Protocol parameters; their shape fixes the protocol kind.
    pub parameters: TestParameters,
    /// Human-readable step label used in log lines.
    pub title: String,
    /// Whether to hand the resulting series to the chart renderer.
    pub create_plot: bool,
}

impl StepProperties {
    /// The protocol kind implied by the parameter shape.
    pub fn kind(&self) -> ProtocolKind {
        self.parameters.kind()
    }
}

/// Sequence-wide options gathered by the operator console.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestOptions {
    /// Sample identifier attached to every persisted row. At most 15
    /// characters; enforced by the console's validator.
    pub compound: String,
    /// Save output of the constant-voltage conditioning steps.
    pub save_constant_voltage: bool,
    /// Save output of the square-wave voltammetry step.
    pub save_square_wave: bool,
    /// Nest output directories under [`TestOptions::subfolder_path`].
    pub save_to_subfolder: bool,
    /// Relative subfolder below the output root. Ignored unless
    /// [`TestOptions::save_to_subfolder`] is set.
    pub subfolder_path: String,
}

impl TestOptions {
    /// Whether runs of `kind` should be persisted.
    pub fn persist_for(&self, kind: ProtocolKind) -> bool {
        match kind {
            ProtocolKind::ConstantVoltage => self.save_constant_voltage,
            ProtocolKind::SquareWaveVoltammetry => self.save_square_wave,
        }
    }
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            compound: "ABC".to_string(),
            save_constant_voltage: true,
            save_square_wave: true,
            save_to_subfolder: false,
            subfolder_path: String::new(),
        }
    }
}

/// Immutable description of one test invocation.
///
/// One instance per step per sequence. Owned by the plan; the runner and
/// archiver only borrow it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunContext {
    /// Protocol to run.
    pub kind: ProtocolKind,
    /// Instrument-specific current range selector.
    pub current_range: String,
    /// Sampling rate in samples per second.
    pub sample_rate_hz: u32,
    /// Protocol parameters, shape-matched to `kind`.
    pub parameters: TestParameters,
    /// Human-readable step label.
    pub title: String,
    /// Whether to hand the series to the chart renderer.
    pub create_plot: bool,
    /// Sample identifier written into every persisted row.
    pub compound: String,
    /// Whether to archive this step's output at all.
    pub persist: bool,
    /// Whether archived output goes under `subfolder_path`.
    pub persist_to_subfolder: bool,
    /// Relative subfolder below the output root.
    pub subfolder_path: String,
}

impl RunContext {
    /// Merge per-step properties with sequence-wide options.
    ///
    /// `persist` is decided by the caller (per-kind save flags live in the
    /// options; the plan constructor applies them).
    pub fn new(properties: StepProperties, options: &TestOptions, persist: bool) -> Self {
        Self {
            kind: properties.parameters.kind(),
            current_range: properties.current_range,
            sample_rate_hz: properties.sample_rate_hz,
            parameters: properties.parameters,
            title: properties.title,
            create_plot: properties.create_plot,
            compound: options.compound.clone(),
            persist,
            persist_to_subfolder: options.save_to_subfolder,
            subfolder_path: options.subfolder_path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{ConstantVoltageParams, SquareWaveParams};

    fn cv_properties() -> StepProperties {
        StepProperties {
            current_range: "100uA".to_string(),
            sample_rate_hz: 100,
            parameters: ConstantVoltageParams::default().into(),
            title: "Constant Voltage Test #1".to_string(),
            create_plot: false,
        }
    }

    #[test]
    fn context_kind_follows_parameter_shape() {
        let ctx = RunContext::new(cv_properties(), &TestOptions::default(), true);
        assert_eq!(ctx.kind, ProtocolKind::ConstantVoltage);

        let swv = StepProperties {
            parameters: SquareWaveParams::default().into(),
            ..cv_properties()
        };
        let ctx = RunContext::new(swv, &TestOptions::default(), true);
        assert_eq!(ctx.kind, ProtocolKind::SquareWaveVoltammetry);
    }

    #[test]
    fn options_decide_persistence_per_kind() {
        let options = TestOptions {
            save_constant_voltage: false,
            save_square_wave: true,
            ..TestOptions::default()
        };
        assert!(!options.persist_for(ProtocolKind::ConstantVoltage));
        assert!(options.persist_for(ProtocolKind::SquareWaveVoltammetry));
    }

    #[test]
    fn context_carries_compound_and_subfolder() {
        let options = TestOptions {
            compound: "ZnCl2".to_string(),
            save_to_subfolder: true,
            subfolder_path: "batch-7".to_string(),
            ..TestOptions::default()
        };
        let ctx = RunContext::new(cv_properties(), &options, true);
        assert_eq!(ctx.compound, "ZnCl2");
        assert!(ctx.persist_to_subfolder);
        assert_eq!(ctx.subfolder_path, "batch-7");
    }
}
