//! Protocol catalog: test kinds, their parameter shapes, and the
//! instrument-facing names they resolve to.
//!
//! The potentiostat firmware selects a test by a string name. The catalog is
//! a closed mapping from [`ProtocolKind`] to that name; it is pure, stateless
//! and never extended at runtime. Parameters travel as a tagged union with
//! one strongly-typed variant per kind, so a structurally incomplete
//! parameter set cannot be constructed at all. The only failure the catalog
//! can still detect is a kind paired with the wrong parameter shape, which
//! [`resolve`] rejects as [`ZnError::UnknownProtocol`] before anything
//! reaches the hardware.

use crate::error::{ZnError, ZnResult};
use serde::{Deserialize, Serialize};

/// The closed set of test protocols the instrument knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProtocolKind {
    /// Hold the electrode at a fixed potential, measure current over time.
    ConstantVoltage,
    /// Sweep potential in square-wave steps, measure the current response.
    SquareWaveVoltammetry,
}

impl ProtocolKind {
    /// All kinds, in no particular order.
    pub const ALL: [ProtocolKind; 2] = [
        ProtocolKind::ConstantVoltage,
        ProtocolKind::SquareWaveVoltammetry,
    ];
}

/// Parameters for a constant-voltage test.
///
/// Times are milliseconds, potentials are volts. Field names serialize to
/// the camelCase keys the instrument driver expects (`quietValue`,
/// `quietTime`, `value`, `duration`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstantVoltageParams {
    /// Settling potential applied before the active phase (V).
    pub quiet_value: f64,
    /// Settling duration before the active phase (ms).
    pub quiet_time: u64,
    /// Potential held during the active phase (V).
    pub value: f64,
    /// Length of the active phase (ms).
    pub duration: u64,
}

impl ConstantVoltageParams {
    /// Parameters holding `value` volts for `duration` ms.
    ///
    /// The quiet value mirrors the held value, as the operator form couples
    /// the two fields.
    pub fn holding(value: f64, duration: u64, quiet_time: u64) -> Self {
        Self {
            quiet_value: value,
            quiet_time,
            value,
            duration,
        }
    }
}

impl Default for ConstantVoltageParams {
    fn default() -> Self {
        Self {
            quiet_value: -1.0,
            quiet_time: 1_000,
            value: -1.0,
            duration: 5_000,
        }
    }
}

/// Parameters for a square-wave voltammetry sweep.
///
/// Serializes to the driver's camelCase keys (`quietValue`, `quietTime`,
/// `amplitude`, `startValue`, `finalValue`, `stepValue`, `window`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SquareWaveParams {
    /// Settling potential applied before the sweep (V).
    pub quiet_value: f64,
    /// Settling duration before the sweep (ms).
    pub quiet_time: u64,
    /// Square-wave amplitude (V).
    pub amplitude: f64,
    /// Sweep start potential (V).
    pub start_value: f64,
    /// Sweep final potential (V).
    pub final_value: f64,
    /// Potential increment per step (V).
    pub step_value: f64,
    /// Current-sampling window as a fraction of each half-period.
    pub window: f64,
}

impl SquareWaveParams {
    /// Parameters sweeping from `start_value` to `final_value`.
    ///
    /// The quiet value mirrors the start value, as the operator form couples
    /// the two fields.
    pub fn sweeping(start_value: f64, final_value: f64) -> Self {
        Self {
            quiet_value: start_value,
            start_value,
            final_value,
            ..Self::default()
        }
    }
}

impl Default for SquareWaveParams {
    fn default() -> Self {
        Self {
            quiet_value: -1.0,
            quiet_time: 1_000,
            amplitude: 0.05,
            start_value: -1.0,
            final_value: 1.0,
            step_value: 0.005,
            window: 0.2,
        }
    }
}

/// Tagged union of per-protocol parameter sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TestParameters {
    /// Constant-voltage parameter set.
    ConstantVoltage(ConstantVoltageParams),
    /// Square-wave voltammetry parameter set.
    SquareWaveVoltammetry(SquareWaveParams),
}

impl TestParameters {
    /// The protocol kind this parameter shape belongs to.
    pub fn kind(&self) -> ProtocolKind {
        match self {
            TestParameters::ConstantVoltage(_) => ProtocolKind::ConstantVoltage,
            TestParameters::SquareWaveVoltammetry(_) => ProtocolKind::SquareWaveVoltammetry,
        }
    }
}

impl From<ConstantVoltageParams> for TestParameters {
    fn from(params: ConstantVoltageParams) -> Self {
        TestParameters::ConstantVoltage(params)
    }
}

impl From<SquareWaveParams> for TestParameters {
    fn from(params: SquareWaveParams) -> Self {
        TestParameters::SquareWaveVoltammetry(params)
    }
}

/// Instrument-facing protocol name for `kind`.
///
/// Total over the enumeration; the names are part of the driver's command
/// set and must not change.
pub fn protocol_name(kind: ProtocolKind) -> &'static str {
    match kind {
        ProtocolKind::ConstantVoltage => "constant",
        ProtocolKind::SquareWaveVoltammetry => "squareWave",
    }
}

/// Output folder name for runs of `kind`, derived from the protocol name.
pub fn protocol_folder(kind: ProtocolKind) -> &'static str {
    protocol_name(kind)
}

/// Resolve the protocol name for `kind`, checking that `parameters` carry
/// the matching shape.
///
/// With the closed enum a bare name lookup cannot fail; what can go wrong
/// is a context assembled with mismatched kind and parameters, which this
/// rejects before the instrument is contacted.
pub fn resolve(kind: ProtocolKind, parameters: &TestParameters) -> ZnResult<&'static str> {
    if parameters.kind() != kind {
        return Err(ZnError::UnknownProtocol {
            kind,
            parameters: parameters.kind(),
        });
    }
    Ok(protocol_name(kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_the_driver_command_set() {
        assert_eq!(protocol_name(ProtocolKind::ConstantVoltage), "constant");
        assert_eq!(
            protocol_name(ProtocolKind::SquareWaveVoltammetry),
            "squareWave"
        );
    }

    #[test]
    fn resolve_accepts_matching_shape() {
        let params = TestParameters::from(ConstantVoltageParams::default());
        let name = resolve(ProtocolKind::ConstantVoltage, &params);
        assert_eq!(name.ok(), Some("constant"));
    }

    #[test]
    fn resolve_rejects_mismatched_shape() {
        let params = TestParameters::from(SquareWaveParams::default());
        let err = resolve(ProtocolKind::ConstantVoltage, &params);
        assert!(matches!(err, Err(ZnError::UnknownProtocol { .. })));
    }

    #[test]
    fn parameters_serialize_with_driver_keys() {
        let params = ConstantVoltageParams::holding(-1.0, 5_000, 1_000);
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["quietValue"], -1.0);
        assert_eq!(json["quietTime"], 1_000);
        assert_eq!(json["value"], -1.0);
        assert_eq!(json["duration"], 5_000);

        let params = SquareWaveParams::default();
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["startValue"], -1.0);
        assert_eq!(json["finalValue"], 1.0);
        assert_eq!(json["stepValue"], 0.005);
        assert_eq!(json["window"], 0.2);
    }

    #[test]
    fn holding_couples_quiet_value_to_value() {
        let params = ConstantVoltageParams::holding(0.35, 2_000, 500);
        assert_eq!(params.quiet_value, 0.35);
        assert_eq!(params.value, 0.35);
    }

    #[test]
    fn sweeping_couples_quiet_value_to_start() {
        let params = SquareWaveParams::sweeping(-0.8, 0.4);
        assert_eq!(params.quiet_value, -0.8);
        assert_eq!(params.start_value, -0.8);
        assert_eq!(params.final_value, 0.4);
    }
}
