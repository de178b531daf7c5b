//! Diagnostic log
//!
//! A plain-text, append-only record of failures and generated artifacts that
//! survives between runs. The library never writes to it; the application
//! records what it did and which sections failed.

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Sink for diagnostic messages
pub trait DiagnosticLog {
    /// Append one message. Failures to record are reported through `log`
    /// and never abort the caller.
    fn record(&self, message: &str);
}

/// Diagnostic log backed by a text file, one timestamped line per entry
#[derive(Debug, Clone)]
pub struct FileDiagnosticLog {
    path: PathBuf,
}

impl FileDiagnosticLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whole log, or `None` if nothing has been recorded yet
    pub fn read(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read diagnostic log: {:?}", self.path))?;
        Ok(Some(content))
    }

    fn append(&self, message: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        writeln!(file, "[{}] {}", timestamp, message)
    }
}

impl DiagnosticLog for FileDiagnosticLog {
    fn record(&self, message: &str) {
        if let Err(e) = self.append(message) {
            log::warn!("Could not write diagnostic log {:?}: {}", self.path, e);
        }
    }
}

/// In-memory diagnostic log
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryDiagnosticLog {
    entries: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MemoryDiagnosticLog {
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl DiagnosticLog for MemoryDiagnosticLog {
    fn record(&self, message: &str) {
        self.entries.lock().unwrap().push(message.to_string());
    }
}
