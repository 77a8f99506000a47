//! Download targets for exported artifacts

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use super::Artifact;
use crate::error::{Result, TradelyError};

/// Saves one artifact per call, the way a browser save-as download would
pub trait DownloadSink: Send + Sync {
    /// Persist `artifact` and return where it went
    fn save(&self, artifact: &Artifact) -> Result<PathBuf>;
}

/// Writes artifacts into a directory
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectorySink {
    fn save(&self, artifact: &Artifact) -> Result<PathBuf> {
        // Labels come from user input; never let them escape the target directory
        let name = Path::new(&artifact.filename)
            .file_name()
            .ok_or_else(|| TradelyError::Other(format!("Invalid filename: {}", artifact.filename)))?;

        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(name);
        std::fs::write(&path, artifact.to_bytes())?;
        Ok(path)
    }
}

/// Keeps artifacts in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    saved: Mutex<Vec<Artifact>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Artifacts saved so far, oldest first
    pub fn saved(&self) -> Vec<Artifact> {
        self.saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl DownloadSink for MemorySink {
    fn save(&self, artifact: &Artifact) -> Result<PathBuf> {
        self.saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(artifact.clone());
        Ok(PathBuf::from(&artifact.filename))
    }
}
