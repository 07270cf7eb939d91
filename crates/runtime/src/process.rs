// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Background process registry.
//!
//! Watch commands run as detached background processes. Their metadata is
//! persisted under `.devcmd/registry.json` (an ordered mapping from
//! process name to entry) with one `.devcmd/<name>.log` per process.
//! Writes go through an exclusive file lock and an atomic temp-file
//! rename; stale entries (pid no longer alive) are reaped on load.

use chrono::{DateTime, Utc};
use fs2::FileExt;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Directory holding the registry file and process logs.
pub const STATE_DIR: &str = ".devcmd";

/// Registry file name inside [`STATE_DIR`].
pub const REGISTRY_FILE: &str = "registry.json";

/// Default grace period before a stubborn process is force-killed.
pub const DEFAULT_GRACE: Duration = Duration::from_secs(5);

/// Liveness polling interval during graceful stop.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Errors from registry persistence and process control.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("registry i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt registry file at {path}: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to serialize registry: {0}")]
    Serialize(serde_json::Error),

    #[error("no background process named '{0}' is registered")]
    NotFound(String),
}

/// Status of a registered background process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessStatus {
    Running,
    Stopped,
}

/// One registered background process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessEntry {
    pub name: String,
    pub pid: u32,
    pub command: String,
    pub start_time: DateTime<Utc>,
    pub log_file: PathBuf,
    pub status: ProcessStatus,
}

/// Handle to the on-disk registry rooted at a project directory.
#[derive(Debug, Clone)]
pub struct ProcessRegistry {
    dir: PathBuf,
}

impl ProcessRegistry {
    /// Open (creating if needed) the registry under `root/.devcmd`.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let dir = root.as_ref().join(STATE_DIR);
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// The state directory this registry persists into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The log file path for a process name.
    pub fn log_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.log"))
    }

    fn registry_path(&self) -> PathBuf {
        self.dir.join(REGISTRY_FILE)
    }

    /// Load all entries, reaping ones whose pid is no longer alive.
    ///
    /// Reaped entries are dropped from the persisted file so a crashed
    /// process does not haunt `status` output forever.
    pub fn load(&self) -> Result<IndexMap<String, ProcessEntry>, RegistryError> {
        let path = self.registry_path();
        if !path.exists() {
            return Ok(IndexMap::new());
        }

        let file = File::open(&path)?;
        file.lock_shared()?;
        let entries: IndexMap<String, ProcessEntry> =
            serde_json::from_reader(BufReader::new(&file)).map_err(|source| {
                RegistryError::Corrupt {
                    path: path.clone(),
                    source,
                }
            })?;
        file.unlock()?;

        let mut alive = IndexMap::new();
        let mut reaped = 0usize;
        for (name, entry) in entries {
            if process_alive(entry.pid) {
                alive.insert(name, entry);
            } else {
                reaped += 1;
            }
        }
        if reaped > 0 {
            debug!(reaped, "reaped stale registry entries");
            self.save(&alive)?;
        }
        Ok(alive)
    }

    /// Persist entries atomically: write to a temp file, fsync, rename.
    fn save(&self, entries: &IndexMap<String, ProcessEntry>) -> Result<(), RegistryError> {
        let path = self.registry_path();
        let tmp_path = path.with_extension("tmp");

        {
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&tmp_path)?;
            file.lock_exclusive()?;
            let mut writer = BufWriter::new(&file);
            serde_json::to_writer_pretty(&mut writer, entries)
                .map_err(RegistryError::Serialize)?;
            drop(writer);
            file.sync_all()?;
            file.unlock()?;
        }

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// Add or replace an entry.
    pub fn register(&self, entry: ProcessEntry) -> Result<(), RegistryError> {
        let mut entries = self.load()?;
        entries.insert(entry.name.clone(), entry);
        self.save(&entries)
    }

    /// Remove an entry by name. Removing an absent name is not an error.
    pub fn remove(&self, name: &str) -> Result<(), RegistryError> {
        let mut entries = self.load()?;
        if entries.shift_remove(name).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }

    /// Get a live entry by name.
    pub fn get(&self, name: &str) -> Result<Option<ProcessEntry>, RegistryError> {
        Ok(self.load()?.get(name).cloned())
    }

    /// Gracefully stop a registered process: SIGTERM, poll liveness at
    /// [`POLL_INTERVAL`] for up to `grace`, then SIGKILL. The entry is
    /// removed either way.
    pub async fn graceful_stop(&self, name: &str, grace: Duration) -> Result<(), RegistryError> {
        let entry = self
            .get(name)?
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;

        debug!(name, pid = entry.pid, "stopping background process");
        send_signal(entry.pid, "-TERM");

        let deadline = tokio::time::Instant::now() + grace;
        while tokio::time::Instant::now() < deadline {
            if !process_alive(entry.pid) {
                self.remove(name)?;
                return Ok(());
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }

        warn!(name, pid = entry.pid, "grace period expired, force killing");
        send_signal(entry.pid, "-KILL");
        self.remove(name)?;
        Ok(())
    }
}

/// Check pid liveness with a null signal.
pub fn process_alive(pid: u32) -> bool {
    send_signal(pid, "-0")
}

/// Send a signal via the `kill` utility, ignoring failures.
fn send_signal(pid: u32, signal: &str) -> bool {
    Command::new("kill")
        .args([signal, &pid.to_string()])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
