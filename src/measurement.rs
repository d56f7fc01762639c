//! Measurement series produced by one instrument run.
//!
//! A run yields three parallel sequences: elapsed time in seconds, electrode
//! potential in volts, and measured current in microamps. Index `i` across
//! the three describes one sample; [`RawSeries::new`] is the only way to
//! build a series and enforces the equal-length invariant. The series is
//! owned by the runner until the archiver consumes it; no in-memory history
//! is retained afterwards.

use crate::error::{ZnError, ZnResult};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Three equal-length sample sequences from one instrument run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSeries {
    times: Vec<f64>,
    volts: Vec<f64>,
    currents: Vec<f64>,
}

impl RawSeries {
    /// Build a series, rejecting unequal sequence lengths.
    pub fn new(times: Vec<f64>, volts: Vec<f64>, currents: Vec<f64>) -> ZnResult<Self> {
        if times.len() != volts.len() || times.len() != currents.len() {
            return Err(ZnError::SeriesLengthMismatch {
                times: times.len(),
                volts: volts.len(),
                currents: currents.len(),
            });
        }
        Ok(Self {
            times,
            volts,
            currents,
        })
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether the run produced no samples at all.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Elapsed-time samples in seconds.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Potential samples in volts.
    pub fn volts(&self) -> &[f64] {
        &self.volts
    }

    /// Current samples in microamps.
    pub fn currents(&self) -> &[f64] {
        &self.currents
    }

    /// Iterate samples as `(time, volt, current)` triples in index order.
    pub fn samples(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.times
            .iter()
            .zip(&self.volts)
            .zip(&self.currents)
            .map(|((&t, &v), &c)| (t, v, c))
    }
}

/// A finished run: the raw series plus timing metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedRun {
    /// Step label the run was started under.
    pub title: String,
    /// Samples collected by the instrument.
    pub series: RawSeries,
    /// Wall-clock time just before the instrument call.
    pub started_at: DateTime<Local>,
    /// Wall-clock time just after the instrument call returned.
    pub finished_at: DateTime<Local>,
}

impl CompletedRun {
    /// Actual instrument wall-clock run time, as opposed to the estimate.
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}
