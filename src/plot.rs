//! Chart renderer seam.
//!
//! The original assay draws three figures per measurement: potential over
//! time, current over time, and the voltammogram (current over potential).
//! Rendering itself is an external collaborator; this module only defines
//! the seam and a no-op implementation for headless use. Render failures
//! are never fatal to a run — the runner logs and moves on.

use crate::measurement::RawSeries;
use anyhow::Result;

/// Which projection of the series to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotKind {
    /// Potential (V) against elapsed time (s).
    VoltageVsTime,
    /// Current (µA) against elapsed time (s).
    CurrentVsTime,
    /// Current (µA) against potential (V) — the voltammogram.
    CurrentVsVoltage,
}

impl PlotKind {
    /// The three figures drawn for a plot-eligible step.
    pub const ALL: [PlotKind; 3] = [
        PlotKind::VoltageVsTime,
        PlotKind::CurrentVsTime,
        PlotKind::CurrentVsVoltage,
    ];

    /// Axis labels as `(x, y)`.
    pub fn axis_labels(self) -> (&'static str, &'static str) {
        match self {
            PlotKind::VoltageVsTime => ("time (sec)", "potential (V)"),
            PlotKind::CurrentVsTime => ("time (sec)", "current (uA)"),
            PlotKind::CurrentVsVoltage => ("potential (V)", "current (uA)"),
        }
    }
}

/// Non-blocking display of one projection of a measurement series.
pub trait ChartRenderer: Send + Sync {
    /// Draw `plot` for `series`. Must not block on user interaction.
    fn render(&self, plot: PlotKind, series: &RawSeries) -> Result<()>;
}

/// Renderer that draws nothing; for headless operation and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl ChartRenderer for NullRenderer {
    fn render(&self, _plot: PlotKind, _series: &RawSeries) -> Result<()> {
        Ok(())
    }
}
