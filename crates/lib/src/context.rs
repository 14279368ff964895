//! Build context supplied by the firmware build orchestrator.
//!
//! The orchestrator exports the target name, platform, framework and build
//! output directory before invoking the post-build hook. Any of them may be
//! missing when the hook runs outside a real build; the context is only
//! considered available when a build output directory is known.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::consts::{
  ENV_VAR_BUILD_DIR, ENV_VAR_FRAMEWORK, ENV_VAR_NAME, ENV_VAR_PLATFORM, FIRMWARE_BIN, FIRMWARE_ELF, FIRMWARE_MAP,
  UNKNOWN_ENV, UNKNOWN_FIELD,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildContext {
  /// Build target name, e.g. `t-deck-pro-release`.
  pub env_name: Option<String>,
  pub platform: Option<String>,
  pub framework: Option<String>,
  /// Directory holding `firmware.bin`, `firmware.elf` and `firmware.map`.
  pub build_dir: Option<PathBuf>,
}

impl BuildContext {
  /// Read the context from the orchestrator's environment variables.
  ///
  /// Empty values are treated as unset.
  pub fn from_env() -> Self {
    Self {
      env_name: read_var(ENV_VAR_NAME),
      platform: read_var(ENV_VAR_PLATFORM),
      framework: read_var(ENV_VAR_FRAMEWORK),
      build_dir: read_var(ENV_VAR_BUILD_DIR).map(PathBuf::from),
    }
  }

  pub fn is_available(&self) -> bool {
    self.build_dir.is_some()
  }

  /// The environment-dependent view of the context, if a build directory is known.
  pub fn target(&self) -> Option<BuildTarget<'_>> {
    let build_dir = self.build_dir.as_deref()?;
    Some(BuildTarget {
      env_name: self.env_name.as_deref().unwrap_or(UNKNOWN_ENV),
      build_dir,
    })
  }

  pub fn summary(&self) -> ContextSummary {
    let field = |value: &Option<String>| value.clone().unwrap_or_else(|| UNKNOWN_FIELD.to_string());
    ContextSummary {
      environment: field(&self.env_name),
      platform: field(&self.platform),
      framework: field(&self.framework),
      available: self.is_available(),
    }
  }
}

fn read_var(name: &str) -> Option<String> {
  std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Printable view of the context with placeholders for missing fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextSummary {
  pub environment: String,
  pub platform: String,
  pub framework: String,
  pub available: bool,
}

/// A build whose output directory is known.
#[derive(Debug, Clone, Copy)]
pub struct BuildTarget<'a> {
  pub env_name: &'a str,
  pub build_dir: &'a Path,
}

impl BuildTarget<'_> {
  pub fn firmware_bin(&self) -> PathBuf {
    self.build_dir.join(FIRMWARE_BIN)
  }

  pub fn firmware_elf(&self) -> PathBuf {
    self.build_dir.join(FIRMWARE_ELF)
  }

  pub fn firmware_map(&self) -> PathBuf {
    self.build_dir.join(FIRMWARE_MAP)
  }
}
