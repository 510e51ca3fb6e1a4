// Run record persistence: one JSON file per run under the runs directory

use super::{ensure_dir, read_json, write_json, FileResult};
use crate::models::RunRecord;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Store for persisted batch runs
#[derive(Debug, Clone)]
pub struct RunStore {
    dir: PathBuf,
}

impl RunStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist a run record, returning the file path
    pub fn store(&self, run: &RunRecord) -> FileResult<PathBuf> {
        ensure_dir(&self.dir)?;
        let path = self.run_path(&run.run_id);
        write_json(&path, run)?;
        log::info!("Stored run {} at {:?}", run.run_id, path);
        Ok(path)
    }

    /// Load a stored run as untyped JSON.
    ///
    /// Untyped so that runs written by older versions (whose test cases
    /// may lack fields the current model requires) can still be served
    /// and exported. Returns `Ok(None)` when the run does not exist.
    pub fn load_value(&self, run_id: &str) -> FileResult<Option<Value>> {
        if !is_safe_run_id(run_id) {
            return Ok(None);
        }

        let path = self.run_path(run_id);
        if !path.exists() {
            return Ok(None);
        }
        read_json(&path).map(Some)
    }

    fn run_path(&self, run_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", run_id))
    }
}

/// Run ids come from URLs; only plain token characters may touch the
/// filesystem
fn is_safe_run_id(run_id: &str) -> bool {
    !run_id.is_empty()
        && run_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
