//! Firmware version lookup from the generated build header.
//!
//! The header is produced by a pre-build step and contains a line like
//!
//! ```c
//! #define BUILD_VERSION "2.1.0"
//! ```
//!
//! This is a line scan, not a C parser: if the header format changes the
//! lookup falls back to [`DEFAULT_VERSION`].

use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::consts::{DEFAULT_VERSION, VERSION_MARKER};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionSource {
  Header,
  Default,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedVersion {
  pub version: String,
  pub source: VersionSource,
}

impl ResolvedVersion {
  fn fallback() -> Self {
    Self {
      version: DEFAULT_VERSION.to_string(),
      source: VersionSource::Default,
    }
  }
}

/// Find the first quoted literal on a line carrying the version marker.
///
/// The literal runs from the first `"` to the next `"`, or to the end of the
/// line when unterminated. Empty literals are ignored.
pub fn extract_version(content: &str) -> Option<String> {
  let line = content
    .lines()
    .find(|line| line.contains(VERSION_MARKER) && line.contains('"'))?;

  let literal = line.split('"').nth(1)?;
  if literal.is_empty() {
    return None;
  }
  Some(literal.to_string())
}

/// Read the version from `header`, falling back to the default version.
pub fn read_version(header: &Path) -> ResolvedVersion {
  let content = match std::fs::read_to_string(header) {
    Ok(content) => content,
    Err(e) => {
      debug!(path = %header.display(), error = %e, "version header unreadable, using default");
      return ResolvedVersion::fallback();
    }
  };

  match extract_version(&content) {
    Some(version) => ResolvedVersion {
      version,
      source: VersionSource::Header,
    },
    None => {
      debug!(path = %header.display(), "no {} in header, using default", VERSION_MARKER);
      ResolvedVersion::fallback()
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn extracts_define() {
    let header = "#pragma once\n#define BUILD_DATE \"2026-10-16\"\n#define BUILD_VERSION \"2.1.0\"\n";
    assert_eq!(extract_version(header).as_deref(), Some("2.1.0"));
  }

  #[test]
  fn first_marker_line_wins() {
    let header = "#define BUILD_VERSION \"1.2.3\"\n#define BUILD_VERSION \"9.9.9\"\n";
    assert_eq!(extract_version(header).as_deref(), Some("1.2.3"));
  }

  #[test]
  fn marker_without_quotes_is_skipped() {
    let header = "// BUILD_VERSION is defined below\n#define BUILD_VERSION \"3.0.0\"\n";
    assert_eq!(extract_version(header).as_deref(), Some("3.0.0"));
  }

  #[test]
  fn unterminated_literal_runs_to_end_of_line() {
    assert_eq!(
      extract_version("#define BUILD_VERSION \"4.0.0-rc1").as_deref(),
      Some("4.0.0-rc1")
    );
  }

  #[test]
  fn missing_marker_yields_none() {
    assert_eq!(extract_version("#define VERSION \"1.0\"\n"), None);
    assert_eq!(extract_version("#define BUILD_VERSION \"\"\n"), None);
  }

  #[test]
  fn absent_header_uses_default() {
    let temp = TempDir::new().unwrap();
    let resolved = read_version(&temp.path().join("build_info.h"));
    assert_eq!(resolved.version, "1.0.0");
    assert_eq!(resolved.source, VersionSource::Default);
  }

  #[test]
  fn header_on_disk_is_read() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("build_info.h");
    std::fs::write(&path, "#define BUILD_VERSION \"1.4.2\"\n").unwrap();

    let resolved = read_version(&path);
    assert_eq!(resolved.version, "1.4.2");
    assert_eq!(resolved.source, VersionSource::Header);
  }
}
