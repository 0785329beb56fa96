//! Export collaborator: receives a finished printable document.
//!
//! The collaborator's outcome is not reported back to the session. A failed
//! export is logged and otherwise indistinguishable from a successful one.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tempfile::NamedTempFile;
use tracing::{info, warn};
use uuid::Uuid;

pub mod markup;

/// Carried in `AppState` as `Arc<dyn DocumentExporter>`.
pub trait DocumentExporter: Send + Sync {
    fn render_and_print(&self, markup: &str);
}

/// Writes each document into a spool directory for a print worker or the
/// user's browser to pick up. Files appear atomically (temp file + rename).
pub struct SpoolExporter {
    dir: PathBuf,
}

impl SpoolExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn spool(&self, markup: &str) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;

        let mut file = NamedTempFile::new_in(&self.dir)?;
        file.write_all(markup.as_bytes())?;
        file.flush()?;

        let path = self.dir.join(format!(
            "resume-{}-{}.html",
            Utc::now().format("%Y%m%dT%H%M%S"),
            Uuid::new_v4().simple()
        ));
        file.persist(&path).map_err(|e| e.error)?;
        Ok(path)
    }
}

impl DocumentExporter for SpoolExporter {
    fn render_and_print(&self, markup: &str) {
        match self.spool(markup) {
            Ok(path) => info!("Spooled printable resume to {}", path.display()),
            Err(e) => warn!("Failed to spool printable resume in {}: {e}", self.dir.display()),
        }
    }
}
