//! Custom error types for the crate.
//!
//! This module defines the primary error type, `ZnError`, for the whole
//! library. Using the `thiserror` crate, it provides a centralized taxonomy
//! for everything that can go wrong during a test sequence:
//!
//! - **`UnknownProtocol`**: a protocol kind was paired with parameters of a
//!   different shape. This is a programming/configuration error and is raised
//!   before the instrument is touched.
//! - **`InstrumentConfigurationFailed`**: the hardware rejected the current
//!   range or sample rate. Configuration failures are assumed persistent, so
//!   the affected step (and with it the sequence) aborts without retry.
//! - **`InstrumentRunFailed`**: a transport or device error surfaced while a
//!   test was executing. No partial series is produced for such a step.
//! - **`Persistence`**: a filesystem or CSV write failed after a successful
//!   run. The measurement is still in memory at this point, so callers may
//!   warn and continue rather than abort.
//! - **`SeriesLengthMismatch`**: the driver returned time/voltage/current
//!   sequences of unequal length, violating the sample-index invariant.
//!
//! The remaining variants cover the ambient concerns (configuration files,
//! I/O, generic instrument queries). By using `#[from]`, `ZnError` can be
//! created seamlessly from underlying error types with the `?` operator.

use crate::protocol::ProtocolKind;
use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias for results using the library error type.
pub type ZnResult<T> = std::result::Result<T, ZnError>;

/// Error taxonomy for test-run orchestration and persistence.
#[derive(Error, Debug)]
pub enum ZnError {
    /// Protocol kind and parameter shape do not belong together.
    #[error("no protocol registered for {kind:?} with {parameters:?} parameters")]
    UnknownProtocol {
        /// Kind requested by the run context.
        kind: ProtocolKind,
        /// Shape of the parameters actually supplied.
        parameters: ProtocolKind,
    },

    /// The instrument rejected a current-range or sample-rate setting.
    #[error("instrument rejected configuration: {0}")]
    InstrumentConfigurationFailed(String),

    /// The instrument failed mid-run; no partial data survives.
    #[error("instrument run failed: {0}")]
    InstrumentRunFailed(String),

    /// Generic instrument query error (duration estimates, range listing).
    #[error("instrument error: {0}")]
    Instrument(String),

    /// A per-run or database file could not be written.
    #[error("failed to persist run data to {path}: {source}")]
    Persistence {
        /// File or directory the write was aimed at.
        path: PathBuf,
        /// Underlying filesystem or CSV error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The driver returned series of unequal length.
    #[error("series length mismatch: {times} times, {volts} volts, {currents} currents")]
    SeriesLengthMismatch {
        /// Number of time samples.
        times: usize,
        /// Number of voltage samples.
        volts: usize,
        /// Number of current samples.
        currents: usize,
    },

    /// Configuration file error.
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Semantically invalid configuration value.
    #[error("configuration validation error: {0}")]
    Configuration(String),

    /// I/O error outside the archiver's persistence paths.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ZnError {
    /// Build a `Persistence` error for `path` from any boxable cause.
    pub fn persistence(
        path: impl Into<PathBuf>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        ZnError::Persistence {
            path: path.into(),
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persistence_error_names_the_path() {
        let err = ZnError::persistence(
            "data/out/constant",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let message = err.to_string();
        assert!(message.contains("data/out/constant"));
        assert!(message.contains("denied"));
    }

    #[test]
    fn unknown_protocol_names_both_shapes() {
        let err = ZnError::UnknownProtocol {
            kind: ProtocolKind::ConstantVoltage,
            parameters: ProtocolKind::SquareWaveVoltammetry,
        };
        assert!(err.to_string().contains("ConstantVoltage"));
        assert!(err.to_string().contains("SquareWaveVoltammetry"));
    }
}
