//! Post-build configuration.
//!
//! Output directories and the version header resolve against the project
//! directory, which defaults to the current working directory.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::consts::{ARTIFACTS_DIR, MAX_APP_SIZE, OTA_DIR, VERSION_HEADER};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostBuildConfig {
  /// Root of the firmware project.
  pub project_dir: PathBuf,
  /// App partition capacity in bytes.
  pub max_app_size: u64,
  /// Generated version header; relative paths resolve against `project_dir`.
  pub version_header: PathBuf,
}

impl Default for PostBuildConfig {
  fn default() -> Self {
    Self {
      project_dir: PathBuf::from("."),
      max_app_size: MAX_APP_SIZE,
      version_header: PathBuf::from(VERSION_HEADER),
    }
  }
}

impl PostBuildConfig {
  pub fn for_project(project_dir: impl Into<PathBuf>) -> Self {
    Self {
      project_dir: project_dir.into(),
      ..Default::default()
    }
  }

  pub fn artifacts_dir(&self) -> PathBuf {
    self.project_dir.join(ARTIFACTS_DIR)
  }

  pub fn ota_dir(&self) -> PathBuf {
    self.project_dir.join(OTA_DIR)
  }

  pub fn version_header_path(&self) -> PathBuf {
    resolve(&self.project_dir, &self.version_header)
  }

  /// Project directory with `.` and symlinks resolved, for display.
  ///
  /// Falls back to the configured path when it does not exist yet.
  pub fn canonical_project_dir(&self) -> PathBuf {
    dunce::canonicalize(&self.project_dir).unwrap_or_else(|_| self.project_dir.clone())
  }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
  if path.is_absolute() {
    path.to_path_buf()
  } else {
    base.join(path)
  }
}
