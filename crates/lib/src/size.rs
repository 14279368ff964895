//! Firmware size analysis against the app partition capacity.

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum SizeError {
  #[error("firmware binary not found: {}", path.display())]
  NotFound { path: PathBuf },

  #[error("failed to read metadata of {}: {source}", path.display())]
  Metadata { path: PathBuf, source: io::Error },
}

/// Outcome of comparing the firmware size to the partition capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "fit", rename_all = "snake_case")]
pub enum SizeReport {
  Fits { size: u64, max: u64, remaining: u64 },
  Exceeds { size: u64, max: u64, excess: u64 },
}

impl SizeReport {
  pub fn compare(size: u64, max: u64) -> Self {
    if size > max {
      SizeReport::Exceeds {
        size,
        max,
        excess: size - max,
      }
    } else {
      SizeReport::Fits {
        size,
        max,
        remaining: max - size,
      }
    }
  }

  pub fn size(&self) -> u64 {
    match self {
      SizeReport::Fits { size, .. } | SizeReport::Exceeds { size, .. } => *size,
    }
  }

  /// Free space left in the partition, or `None` when the image overflows it.
  pub fn remaining(&self) -> Option<u64> {
    match self {
      SizeReport::Fits { remaining, .. } => Some(*remaining),
      SizeReport::Exceeds { .. } => None,
    }
  }
}

/// Stat the firmware image and compare it against `max_app_size`.
pub fn analyze_firmware_size(firmware: &Path, max_app_size: u64) -> Result<SizeReport, SizeError> {
  let metadata = match std::fs::metadata(firmware) {
    Ok(m) if m.is_file() => m,
    Ok(_) => {
      return Err(SizeError::NotFound {
        path: firmware.to_path_buf(),
      });
    }
    Err(e) if e.kind() == io::ErrorKind::NotFound => {
      return Err(SizeError::NotFound {
        path: firmware.to_path_buf(),
      });
    }
    Err(source) => {
      return Err(SizeError::Metadata {
        path: firmware.to_path_buf(),
        source,
      });
    }
  };

  let report = SizeReport::compare(metadata.len(), max_app_size);
  match &report {
    SizeReport::Fits { size, remaining, .. } => debug!(size, remaining, "firmware fits app partition"),
    SizeReport::Exceeds { size, excess, .. } => warn!(size, excess, "firmware exceeds app partition"),
  }
  Ok(report)
}
