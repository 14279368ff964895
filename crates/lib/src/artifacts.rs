//! Copies build outputs into the local artifacts directory.
//!
//! # Layout
//!
//! ```text
//! build_artifacts/
//! ├── t-deck-pro-os_<env>_<timestamp>.bin
//! ├── t-deck-pro-os_<env>.elf
//! └── t-deck-pro-os_<env>.map
//! ```
//!
//! Only the firmware image is timestamped; symbol and map files are
//! overwritten by the next build of the same environment.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::consts::FIRMWARE_PREFIX;
use crate::context::BuildTarget;
use crate::timestamp::RunTimestamp;
use crate::util::copy::copy_preserving_mtime;

#[derive(Debug, Error)]
pub enum ArtifactError {
  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: io::Error },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
  Firmware,
  Symbols,
  MemoryMap,
}

impl ArtifactKind {
  pub const ALL: [ArtifactKind; 3] = [ArtifactKind::Firmware, ArtifactKind::Symbols, ArtifactKind::MemoryMap];

  pub fn label(self) -> &'static str {
    match self {
      ArtifactKind::Firmware => "Firmware",
      ArtifactKind::Symbols => "ELF file",
      ArtifactKind::MemoryMap => "Memory map",
    }
  }

  fn source(self, target: &BuildTarget<'_>) -> PathBuf {
    match self {
      ArtifactKind::Firmware => target.firmware_bin(),
      ArtifactKind::Symbols => target.firmware_elf(),
      ArtifactKind::MemoryMap => target.firmware_map(),
    }
  }

  /// Destination file name for this artifact.
  pub fn file_name(self, env_name: &str, timestamp: &RunTimestamp) -> String {
    match self {
      ArtifactKind::Firmware => format!("{FIRMWARE_PREFIX}_{env_name}_{timestamp}.bin"),
      ArtifactKind::Symbols => format!("{FIRMWARE_PREFIX}_{env_name}.elf"),
      ArtifactKind::MemoryMap => format!("{FIRMWARE_PREFIX}_{env_name}.map"),
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct CopiedArtifact {
  pub kind: ArtifactKind,
  pub source: PathBuf,
  pub destination: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedArtifact {
  pub kind: ArtifactKind,
  pub source: PathBuf,
  pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ArtifactReport {
  pub copied: Vec<CopiedArtifact>,
  pub failed: Vec<FailedArtifact>,
}

/// Copy every artifact present in the build directory into `artifacts_dir`.
///
/// Missing artifacts are skipped silently. A failed copy is recorded in the
/// report and does not stop the remaining copies.
///
/// # Errors
///
/// Returns an error only if `artifacts_dir` cannot be created.
pub fn collect_artifacts(
  target: &BuildTarget<'_>,
  artifacts_dir: &Path,
  timestamp: &RunTimestamp,
) -> Result<ArtifactReport, ArtifactError> {
  fs::create_dir_all(artifacts_dir).map_err(|e| ArtifactError::CreateDir {
    path: artifacts_dir.to_path_buf(),
    source: e,
  })?;

  let mut report = ArtifactReport::default();

  for kind in ArtifactKind::ALL {
    let source = kind.source(target);
    if !source.is_file() {
      debug!(path = %source.display(), "artifact not present, skipping");
      continue;
    }

    let destination = artifacts_dir.join(kind.file_name(target.env_name, timestamp));
    match copy_preserving_mtime(&source, &destination) {
      Ok(bytes) => {
        debug!(src = %source.display(), dst = %destination.display(), bytes, "copied artifact");
        report.copied.push(CopiedArtifact {
          kind,
          source,
          destination,
        });
      }
      Err(e) => {
        warn!(src = %source.display(), error = %e, "failed to copy artifact");
        report.failed.push(FailedArtifact {
          kind,
          source,
          message: e.to_string(),
        });
      }
    }
  }

  Ok(report)
}
