//! Tabular persistence of signal batches.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use signal_core::error::DataError;
use signal_core::types::SignalRow;
use tracing::info;

const MAX_ARCHIVE_ATTEMPTS: u32 = 1000;

/// Where a batch was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotPaths {
    pub latest: PathBuf,
    pub archive: PathBuf,
}

/// Writes `<prefix>_latest.csv` (replaced each run) and
/// `<prefix>_<YYYYmmdd_HHMMSS>.csv` (one per run). Archives are never
/// overwritten: a second run in the same second gets a `_1`, `_2`, ...
/// suffix.
///
/// Writes take `&mut self`, so one writer never interleaves two batches.
#[derive(Debug)]
pub struct SnapshotWriter {
    dir: PathBuf,
    prefix: String,
}

impl SnapshotWriter {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
        }
    }

    pub fn latest_path(&self) -> PathBuf {
        self.dir.join(format!("{}_latest.csv", self.prefix))
    }

    /// Archive name for a batch written at `at`, before any collision suffix.
    pub fn archive_path(&self, at: DateTime<Utc>) -> PathBuf {
        self.archive_candidate(at, 0)
    }

    fn archive_candidate(&self, at: DateTime<Utc>, attempt: u32) -> PathBuf {
        let stamp = at.format("%Y%m%d_%H%M%S");
        let name = match attempt {
            0 => format!("{}_{stamp}.csv", self.prefix),
            n => format!("{}_{stamp}_{n}.csv", self.prefix),
        };
        self.dir.join(name)
    }

    /// Claim the first free archive name for `at`.
    fn create_archive(&self, at: DateTime<Utc>) -> Result<(PathBuf, File), DataError> {
        for attempt in 0..MAX_ARCHIVE_ATTEMPTS {
            let path = self.archive_candidate(at, attempt);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(DataError::Internal(format!(
                        "failed to create {}: {e}",
                        path.display()
                    )))
                }
            }
        }
        Err(DataError::Internal(format!(
            "no free archive name for {} at {at}",
            self.prefix
        )))
    }

    /// Persist one batch.
    ///
    /// The latest file is swapped in by rename, so readers see either the
    /// previous batch or the new one in full.
    pub fn write(&mut self, rows: &[SignalRow], at: DateTime<Utc>) -> Result<SnapshotPaths, DataError> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| DataError::Internal(format!("failed to create {}: {e}", self.dir.display())))?;

        let (archive, file) = self.create_archive(at)?;
        write_rows(file, rows)?;

        let latest = self.latest_path();
        let tmp = latest.with_extension("csv.tmp");
        let file = File::create(&tmp)
            .map_err(|e| DataError::Internal(format!("failed to create {}: {e}", tmp.display())))?;
        write_rows(file, rows)?;
        fs::rename(&tmp, &latest).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            DataError::Internal(format!("atomic rename failed: {e}"))
        })?;

        info!(
            rows = rows.len(),
            latest = %latest.display(),
            archive = %archive.display(),
            "snapshot written"
        );
        Ok(SnapshotPaths { latest, archive })
    }
}

fn write_rows(out: impl Write, rows: &[SignalRow]) -> Result<(), DataError> {
    let mut writer = csv::Writer::from_writer(out);
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| DataError::Internal(e.to_string()))?;
    }
    writer
        .flush()
        .map_err(|e| DataError::Internal(e.to_string()))?;
    Ok(())
}
