use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Append-only run log with timestamped entries. A mutex keeps a single
/// writer at a time while installs run on the thread pool. Opening failures
/// degrade to a disabled logger so the run itself is never blocked.
pub struct RunLog {
    inner: Option<Mutex<File>>,
    path: Option<PathBuf>,
}

impl RunLog {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open run log: {}", path.display()))?;

        Ok(Self {
            inner: Some(Mutex::new(file)),
            path: Some(path.to_path_buf()),
        })
    }

    pub fn open_or_disabled(path: &Path) -> Self {
        match Self::open(path) {
            Ok(log) => log,
            Err(e) => {
                log::warn!("Run log unavailable: {:#}", e);
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        Self {
            inner: None,
            path: None,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Append one timestamped line. Write errors are reported as warnings
    /// and never propagate.
    pub fn record(&self, message: &str) {
        let Some(file) = &self.inner else {
            return;
        };

        let stamp = chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%z");

        match file.lock() {
            Ok(mut file) => {
                if let Err(e) = writeln!(file, "{} {}", stamp, message) {
                    log::warn!("Failed to write run log entry: {}", e);
                }
            }
            Err(_) => log::warn!("Run log lock poisoned, entry dropped"),
        }
    }
}

/// Default log location under the user data directory
pub fn default_log_path() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("devup")
        .join("devup.log")
}
