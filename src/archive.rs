//! Output archiver: durable persistence of completed runs.
//!
//! Each archived run is written twice, under
//! `root/[subfolder/]<protocolFolder>/`:
//!
//! 1. a per-run file named `<compound>__<YYYY-MM-DD__HH-MM-SS>.csv` from the
//!    run's start time, and
//! 2. an append to the cumulative `database.csv` in the same directory,
//!    created with a header on first write and never truncated or rewritten.
//!
//! Both carry the header `time,volt,current,compound` and one row per sample
//! in index order, numerics at 4-decimal fixed point (lossy beyond that by
//! design). Directories are created lazily and never deleted here. Two runs
//! of one compound within one second would collide on the per-run filename;
//! that is an accepted overwrite risk, not guarded against.
//!
//! Archiving is deliberately not idempotent: invoking it twice for the same
//! run yields two per-run files and doubles the database rows. Callers
//! ensure at-most-once invocation per completed run. Writes are synchronous
//! appends with no write-ahead log or atomic rename; crash safety is
//! whatever the filesystem gives sequential appends. Failures surface as
//! [`ZnError::Persistence`] and never silently drop data.

use crate::config::Settings;
use crate::context::RunContext;
use crate::error::{ZnError, ZnResult};
use crate::measurement::CompletedRun;
use crate::protocol;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::info;

/// Column headers shared by per-run and database files.
const HEADER: [&str; 4] = ["time", "volt", "current", "compound"];

/// Timestamp layout embedded in per-run filenames.
const RUN_FILE_TIMESTAMP: &str = "%Y-%m-%d__%H-%M-%S";

/// Where an archived run ended up.
#[derive(Debug, Clone)]
pub struct ArchivedRun {
    /// The per-run file written for this invocation.
    pub run_file: PathBuf,
    /// The cumulative database file appended to.
    pub database_file: PathBuf,
    /// Number of data rows written to each file.
    pub rows: usize,
}

/// Writes completed runs to the on-disk layout.
pub struct Archiver {
    root: PathBuf,
    database_file: String,
}

impl Archiver {
    /// Archiver rooted at `root`, with the default `database.csv` name.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            database_file: "database.csv".to_string(),
        }
    }

    /// Archiver configured from settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            root: PathBuf::from(&settings.storage.root),
            database_file: settings.storage.database_file.clone(),
        }
    }

    /// The directory a run under `ctx` persists into.
    pub fn target_dir(&self, ctx: &RunContext) -> PathBuf {
        let mut dir = self.root.clone();
        if ctx.persist_to_subfolder && !ctx.subfolder_path.is_empty() {
            dir.push(&ctx.subfolder_path);
        }
        dir.push(protocol::protocol_folder(ctx.kind));
        dir
    }

    /// Persist one completed run: per-run file plus database append.
    ///
    /// Creates the target directory recursively if absent; reusing an
    /// existing directory alters nothing beyond the intended writes.
    pub fn archive(&self, ctx: &RunContext, run: &CompletedRun) -> ZnResult<ArchivedRun> {
        let dir = self.target_dir(ctx);
        fs::create_dir_all(&dir).map_err(|e| ZnError::persistence(dir.clone(), e))?;

        let run_file = dir.join(format!(
            "{}__{}.csv",
            ctx.compound,
            run.started_at.format(RUN_FILE_TIMESTAMP)
        ));
        write_run_file(&run_file, ctx, run)?;

        let database_file = dir.join(&self.database_file);
        append_database(&database_file, ctx, run)?;

        info!(
            "archived {} samples for '{}' to {}",
            run.series.len(),
            ctx.compound,
            dir.display()
        );
        Ok(ArchivedRun {
            run_file,
            database_file,
            rows: run.series.len(),
        })
    }
}

fn write_rows<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    ctx: &RunContext,
    run: &CompletedRun,
    path: &Path,
) -> ZnResult<()> {
    for (time, volt, current) in run.series.samples() {
        writer
            .write_record([
                format!("{time:.4}"),
                format!("{volt:.4}"),
                format!("{current:.4}"),
                ctx.compound.clone(),
            ])
            .map_err(|e| ZnError::persistence(path, e))?;
    }
    writer.flush().map_err(|e| ZnError::persistence(path, e))
}

fn write_run_file(path: &Path, ctx: &RunContext, run: &CompletedRun) -> ZnResult<()> {
    let file = File::create(path).map_err(|e| ZnError::persistence(path, e))?;
    let mut writer = csv::Writer::from_writer(file);
    writer
        .write_record(HEADER)
        .map_err(|e| ZnError::persistence(path, e))?;
    write_rows(&mut writer, ctx, run, path)
}

fn append_database(path: &Path, ctx: &RunContext, run: &CompletedRun) -> ZnResult<()> {
    // Header only when the file is first created; never truncate.
    let fresh = !path.exists();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| ZnError::persistence(path, e))?;
    let mut writer = csv::Writer::from_writer(file);
    if fresh {
        writer
            .write_record(HEADER)
            .map_err(|e| ZnError::persistence(path, e))?;
    }
    write_rows(&mut writer, ctx, run, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{StepProperties, TestOptions};
    use crate::measurement::RawSeries;
    use crate::protocol::{ConstantVoltageParams, ProtocolKind};
    use chrono::Local;

    fn context(options: &TestOptions) -> RunContext {
        let properties = StepProperties {
            current_range: "100uA".to_string(),
            sample_rate_hz: 100,
            parameters: ConstantVoltageParams::default().into(),
            title: "Constant Voltage Test #1".to_string(),
            create_plot: false,
        };
        RunContext::new(properties, options, true)
    }

    fn completed_run() -> CompletedRun {
        let series = RawSeries::new(
            vec![0.0, 1.0, 2.0],
            vec![-1.0, -0.5, 0.0],
            vec![1.234, 5.678, 9.012],
        )
        .unwrap();
        let started_at = Local::now();
        CompletedRun {
            title: "Constant Voltage Test #1".to_string(),
            series,
            started_at,
            finished_at: started_at,
        }
    }

    #[test]
    fn target_dir_nests_subfolder_then_protocol_folder() {
        let archiver = Archiver::new("data/out");
        let options = TestOptions {
            save_to_subfolder: true,
            subfolder_path: "batch-7".to_string(),
            ..TestOptions::default()
        };
        let dir = archiver.target_dir(&context(&options));
        assert_eq!(dir, PathBuf::from("data/out/batch-7/constant"));

        let flat = TestOptions::default();
        let dir = archiver.target_dir(&context(&flat));
        assert_eq!(dir, PathBuf::from("data/out/constant"));
    }

    #[test]
    fn empty_subfolder_path_is_ignored() {
        let archiver = Archiver::new("data/out");
        let options = TestOptions {
            save_to_subfolder: true,
            subfolder_path: String::new(),
            ..TestOptions::default()
        };
        let dir = archiver.target_dir(&context(&options));
        assert_eq!(dir, PathBuf::from("data/out/constant"));
    }

    #[test]
    fn square_wave_runs_land_in_their_own_folder() {
        let archiver = Archiver::new("data/out");
        let mut ctx = context(&TestOptions::default());
        ctx.kind = ProtocolKind::SquareWaveVoltammetry;
        assert_eq!(
            archiver.target_dir(&ctx),
            PathBuf::from("data/out/squareWave")
        );
    }

    #[test]
    fn archive_reports_row_count() {
        let tmp = tempfile::tempdir().unwrap();
        let archiver = Archiver::new(tmp.path());
        let archived = archiver
            .archive(&context(&TestOptions::default()), &completed_run())
            .unwrap();
        assert_eq!(archived.rows, 3);
        assert!(archived.run_file.exists());
        assert!(archived.database_file.exists());
    }

    #[test]
    fn unwritable_root_surfaces_persistence_error() {
        let tmp = tempfile::tempdir().unwrap();
        // A plain file where the output root should be.
        let blocker = tmp.path().join("out");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let archiver = Archiver::new(&blocker);
        let err = archiver.archive(&context(&TestOptions::default()), &completed_run());
        assert!(matches!(err, Err(ZnError::Persistence { .. })));
    }
}
