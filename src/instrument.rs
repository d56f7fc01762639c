//! The instrument driver seam.
//!
//! Everything below the protocol-name level (serial framing, command set,
//! sampling) belongs to the driver crate behind this trait. The orchestrator
//! receives an already-connected handle as an explicit argument; there is no
//! ambient or global instrument reference.
//!
//! # Contract
//!
//! - Methods take `&self`; implementations use interior mutability for
//!   device state.
//! - `run_test` blocks (at the await point) for the full physical duration
//!   of the test, which can be minutes. It is treated as atomic: there is no
//!   mid-call cancellation.
//! - The connection is a single shared resource with no concurrent-access
//!   contract, so callers must serialize use. The sequence orchestrator
//!   enforces one-step-at-a-time execution.

use crate::measurement::RawSeries;
use crate::protocol::TestParameters;
use anyhow::Result;
use async_trait::async_trait;

/// Capability trait for a connected potentiostat.
#[async_trait]
pub trait Potentiostat: Send + Sync {
    /// Current-range selectors the device supports, in device order.
    async fn available_current_ranges(&self) -> Result<Vec<String>>;

    /// Select the current measurement range.
    async fn set_current_range(&self, range: &str) -> Result<()>;

    /// Set the sampling rate in samples per second.
    async fn set_sample_rate(&self, hz: u32) -> Result<()>;

    /// Execute the named test and return the collected series.
    ///
    /// Blocks until the physical test finishes. On error no partial series
    /// is returned; whatever the electrode experienced already happened, so
    /// blind retries are not safe.
    async fn run_test(&self, protocol: &str, parameters: &TestParameters) -> Result<RawSeries>;

    /// Expected wall-clock duration of the named test, in seconds.
    ///
    /// Computed by the device from the configured parameters; this crate
    /// never recomputes the timing physics.
    async fn estimated_duration(&self, protocol: &str, parameters: &TestParameters)
        -> Result<f64>;
}
