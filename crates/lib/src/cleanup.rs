//! Removal of the generated version header.
//!
//! The header is regenerated by the next build's pre-build step.

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
#[error("failed to remove {}: {source}", path.display())]
pub struct CleanupError {
  pub path: PathBuf,
  pub source: io::Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CleanupOutcome {
  Removed { path: PathBuf },
  NotPresent { path: PathBuf },
}

pub fn remove_version_header(header: &Path) -> Result<CleanupOutcome, CleanupError> {
  if !header.exists() {
    debug!(path = %header.display(), "version header already absent");
    return Ok(CleanupOutcome::NotPresent {
      path: header.to_path_buf(),
    });
  }

  match std::fs::remove_file(header) {
    Ok(()) => {
      debug!(path = %header.display(), "removed version header");
      Ok(CleanupOutcome::Removed {
        path: header.to_path_buf(),
      })
    }
    Err(source) => {
      warn!(path = %header.display(), error = %source, "could not remove version header");
      Err(CleanupError {
        path: header.to_path_buf(),
        source,
      })
    }
  }
}
