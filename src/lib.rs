//! # Zn-Test Orchestration Library
//!
//! This crate drives a laboratory potentiostat through the fixed three-step
//! "Zn test" assay — two constant-voltage conditioning steps followed by a
//! square-wave voltammetry measurement — and deterministically persists the
//! resulting time/voltage/current series. It is the orchestration and
//! data-persistence core; the operator console (GUI), per-field parameter
//! validation, chart rendering, and the instrument's serial protocol are
//! external collaborators reached through trait seams.
//!
//! ## Crate Structure
//!
//! - **`protocol`**: the closed protocol catalog — test kinds, their
//!   strongly-typed parameter shapes, and the instrument-facing names.
//! - **`context`**: immutable per-step run descriptions assembled from the
//!   console's step properties and sequence-wide options.
//! - **`measurement`**: the equal-length raw series invariant and completed
//!   runs with timing metadata.
//! - **`instrument`**: the `Potentiostat` driver seam, injected explicitly.
//! - **`runner`**: executes exactly one run context against the driver.
//! - **`estimate`**: advisory duration forecasts for plans.
//! - **`archive`**: per-run CSV files plus append-only database files.
//! - **`sequence`**: the fail-fast plan orchestrator with between-step
//!   cancellation.
//! - **`ports`**: serial port discovery and the connect contract.
//! - **`plot`**: the chart renderer seam.
//! - **`mock`**: a scripted in-memory potentiostat for tests.
//! - **`config`** / **`logging`** / **`error`**: the ambient stack.
//!
//! ## Execution model
//!
//! Strictly one step at a time on a single task: the instrument connection
//! has no concurrent-access contract and each `run_test` await spans the
//! full physical test (seconds to minutes). Suspension points sit exactly
//! at those call boundaries, so the orchestrator can live on its own task
//! without blocking a UI thread.

pub mod archive;
pub mod config;
pub mod context;
pub mod error;
pub mod estimate;
pub mod instrument;
pub mod logging;
pub mod measurement;
pub mod mock;
pub mod plot;
pub mod ports;
pub mod protocol;
pub mod runner;
pub mod sequence;

pub use archive::{ArchivedRun, Archiver};
pub use config::Settings;
pub use context::{RunContext, StepProperties, TestOptions};
pub use error::{ZnError, ZnResult};
pub use estimate::DurationEstimator;
pub use instrument::Potentiostat;
pub use measurement::{CompletedRun, RawSeries};
pub use plot::{ChartRenderer, NullRenderer, PlotKind};
pub use protocol::{
    ConstantVoltageParams, ProtocolKind, SquareWaveParams, TestParameters,
};
pub use runner::TestRunner;
pub use sequence::{CancelToken, SequenceOrchestrator, SequenceOutcome, SequencePlan};
