//! OTA update packaging.
//!
//! Release and OTA builds get a copy of the firmware image plus a JSON
//! version record in the OTA directory:
//!
//! ```text
//! ota_packages/
//! ├── t-deck-pro-os_v<version>_<timestamp>.bin
//! └── version_v<version>_<timestamp>.json
//! ```
//!
//! Both files share the run timestamp. Records are never rewritten.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::consts::{FIRMWARE_PREFIX, OTA_ENV_MARKERS};
use crate::context::BuildTarget;
use crate::timestamp::RunTimestamp;
use crate::util::copy::copy_preserving_mtime;
use crate::version::read_version;

#[derive(Debug, Error)]
pub enum OtaError {
  #[error("firmware binary not found for OTA package: {}", path.display())]
  FirmwareMissing { path: PathBuf },

  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: io::Error },

  #[error("failed to copy {} to {}: {source}", src.display(), dst.display())]
  Copy { src: PathBuf, dst: PathBuf, source: io::Error },

  #[error("failed to serialize version record: {0}")]
  Serialize(#[from] serde_json::Error),

  #[error("failed to write {}: {source}", path.display())]
  Write { path: PathBuf, source: io::Error },
}

/// Contents of `version_v<version>_<timestamp>.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
  pub version: String,
  pub timestamp: String,
  pub environment: String,
  pub size: u64,
  /// File name of the package binary next to this record.
  pub filename: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OtaPackage {
  pub package: PathBuf,
  pub manifest: PathBuf,
  pub record: VersionRecord,
}

/// Whether the environment name marks a build that ships over the air.
pub fn is_ota_build(env_name: &str) -> bool {
  OTA_ENV_MARKERS.iter().any(|marker| env_name.contains(marker))
}

pub fn package_file_name(version: &str, timestamp: &RunTimestamp) -> String {
  format!("{FIRMWARE_PREFIX}_v{version}_{timestamp}.bin")
}

pub fn manifest_file_name(version: &str, timestamp: &RunTimestamp) -> String {
  format!("version_v{version}_{timestamp}.json")
}

/// Package the firmware image for OTA distribution.
///
/// Callers decide whether the build qualifies via [`is_ota_build`]; this
/// function always packages.
///
/// # Errors
///
/// Returns [`OtaError::FirmwareMissing`] without touching `ota_dir` when the
/// build produced no firmware image. Other variants report I/O failures.
pub fn create_ota_package(
  target: &BuildTarget<'_>,
  ota_dir: &Path,
  version_header: &Path,
  timestamp: &RunTimestamp,
) -> Result<OtaPackage, OtaError> {
  let firmware = target.firmware_bin();
  let size = match fs::metadata(&firmware) {
    Ok(m) if m.is_file() => m.len(),
    _ => return Err(OtaError::FirmwareMissing { path: firmware }),
  };

  fs::create_dir_all(ota_dir).map_err(|e| OtaError::CreateDir {
    path: ota_dir.to_path_buf(),
    source: e,
  })?;

  let resolved = read_version(version_header);
  let version = resolved.version;

  let package_name = package_file_name(&version, timestamp);
  let package = ota_dir.join(&package_name);
  if let Err(e) = copy_preserving_mtime(&firmware, &package) {
    remove_partial(&package);
    return Err(OtaError::Copy {
      src: firmware,
      dst: package,
      source: e,
    });
  }

  let record = VersionRecord {
    version: version.clone(),
    timestamp: timestamp.to_string(),
    environment: target.env_name.to_string(),
    size,
    filename: package_name,
  };

  let manifest = ota_dir.join(manifest_file_name(&version, timestamp));
  if let Err(e) = write_record(&manifest, &record) {
    remove_partial(&package);
    return Err(e);
  }

  info!(
    package = %package.display(),
    version = %record.version,
    size = record.size,
    "created OTA package"
  );

  Ok(OtaPackage {
    package,
    manifest,
    record,
  })
}

/// Write the record via a temp file and rename so readers never see a partial file.
fn write_record(path: &Path, record: &VersionRecord) -> Result<(), OtaError> {
  let mut temp_name = path.as_os_str().to_os_string();
  temp_name.push(".tmp");
  let temp_path = PathBuf::from(temp_name);

  let content = serde_json::to_string_pretty(record)?;
  let written = fs::write(&temp_path, &content)
    .map_err(|e| OtaError::Write {
      path: temp_path.clone(),
      source: e,
    })
    .and_then(|()| {
      fs::rename(&temp_path, path).map_err(|e| OtaError::Write {
        path: path.to_path_buf(),
        source: e,
      })
    });
  if written.is_err() {
    remove_partial(&temp_path);
  }
  written?;

  debug!(path = %path.display(), "wrote version record");
  Ok(())
}

/// Drop a half-written output so the OTA directory only holds complete pairs.
fn remove_partial(path: &Path) {
  match fs::remove_file(path) {
    Ok(()) => debug!(path = %path.display(), "removed partial OTA output"),
    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
    Err(e) => warn!(path = %path.display(), error = %e, "could not remove partial OTA output"),
  }
}
