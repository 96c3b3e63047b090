//! Session result log.
//!
//! The engine emits one [`SessionResult`] per session; this module is the
//! persistence collaborator that keeps them durable. Results are appended to
//! a JSONL (JSON Lines) file with file locking so concurrent writers stay
//! safe, and read back for the stats aggregator.

use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::types::SessionResult;
use crate::Result;

/// Sink for finalized session results
pub trait ResultSink {
    fn append(&mut self, result: &SessionResult) -> Result<()>;
}

/// JSONL-based result store with file locking
pub struct JsonlResultStore {
    path: PathBuf,
}

impl JsonlResultStore {
    /// Create a store backed by the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Ensure the parent directory exists
    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl ResultSink for JsonlResultStore {
    fn append(&mut self, result: &SessionResult) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        // Exclusive lock while writing one line
        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(result)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        file.unlock()?;

        tracing::debug!("Appended session result {} to log", result.id);
        Ok(())
    }
}

/// Read all results from a JSONL log.
///
/// Malformed lines are skipped with a warning rather than failing the whole
/// read; a partially written trailing line must not hide prior history.
pub fn read_results(path: &Path) -> Result<Vec<SessionResult>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    // Shared lock for reading
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut results = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<SessionResult>(&line) {
            Ok(result) => results.push(result),
            Err(e) => {
                tracing::warn!("Failed to parse session result at line {}: {}", line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} session results from log", results.len());
    Ok(results)
}

/// Load results from the last `days` days, sorted newest first
pub fn load_recent_results(path: &Path, days: i64) -> Result<Vec<SessionResult>> {
    let cutoff = chrono::Utc::now() - chrono::Duration::days(days);

    let mut results: Vec<SessionResult> = read_results(path)?
        .into_iter()
        .filter(|r| r.started_at >= cutoff)
        .collect();

    results.sort_by(|a, b| b.started_at.cmp(&a.started_at));

    tracing::info!(
        "Loaded {} session results from last {} days",
        results.len(),
        days
    );

    Ok(results)
}
