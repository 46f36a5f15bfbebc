//! Workout journal.
//!
//! Finished workout summaries are appended to a JSONL (JSON Lines) file
//! under an exclusive file lock so concurrent recorders never interleave.

use crate::session::WorkoutSummary;
use crate::Result;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// File name of the journal inside the data directory
pub const JOURNAL_FILE: &str = "workouts.jsonl";

/// Destination for finished workouts
pub trait SummarySink {
    fn record(&mut self, summary: &WorkoutSummary) -> Result<()>;
}

/// JSONL journal with file locking
pub struct JsonlJournal {
    path: PathBuf,
}

impl JsonlJournal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Journal at the standard location inside `data_dir`
    pub fn in_data_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(JOURNAL_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SummarySink for JsonlJournal {
    fn record(&mut self, summary: &WorkoutSummary) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.lock_exclusive()?;

        let mut writer = BufWriter::new(&file);
        let line = serde_json::to_string(summary)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        file.unlock()?;

        tracing::debug!("Recorded workout {} in {:?}", summary.id, self.path);
        Ok(())
    }
}

/// Read every summary in a journal, oldest first
///
/// A missing journal is empty. Lines that fail to parse are logged and skipped.
pub fn read_summaries(path: &Path) -> Result<Vec<WorkoutSummary>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut summaries = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<WorkoutSummary>(&line) {
            Ok(summary) => summaries.push(summary),
            Err(e) => {
                tracing::warn!("Skipping journal line {}: {}", line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} workouts from {:?}", summaries.len(), path);
    Ok(summaries)
}

/// The `limit` most recently finished workouts, newest first
pub fn recent_summaries(path: &Path, limit: usize) -> Result<Vec<WorkoutSummary>> {
    let mut summaries = read_summaries(path)?;
    summaries.sort_by(|a, b| b.finished_at.cmp(&a.finished_at));
    summaries.truncate(limit);
    Ok(summaries)
}
