//! The post-build pipeline.
//!
//! Steps run in a fixed order and never abort the run: each step's result is
//! captured as a [`StepOutcome`] in the [`PostBuildReport`], and rendering is
//! left to the caller.

use std::fmt;

use serde::Serialize;
use tracing::{info, warn};

use crate::artifacts::{ArtifactReport, collect_artifacts};
use crate::cleanup::{CleanupOutcome, remove_version_header};
use crate::config::PostBuildConfig;
use crate::context::{BuildContext, ContextSummary};
use crate::ota::{OtaError, OtaPackage, create_ota_package, is_ota_build};
use crate::size::{SizeError, SizeReport, analyze_firmware_size};
use crate::timestamp::RunTimestamp;

/// Why a step did not run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
  EnvironmentUnavailable,
  FirmwareMissing,
  NotOtaBuild,
}

impl fmt::Display for SkipReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SkipReason::EnvironmentUnavailable => write!(f, "environment not available"),
      SkipReason::FirmwareMissing => write!(f, "firmware binary not found"),
      SkipReason::NotOtaBuild => write!(f, "not a release/OTA build"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum StepOutcome<T> {
  Done(T),
  Skipped(SkipReason),
  Failed(String),
}

impl<T> StepOutcome<T> {
  pub fn done(&self) -> Option<&T> {
    match self {
      StepOutcome::Done(value) => Some(value),
      _ => None,
    }
  }

  pub fn is_failed(&self) -> bool {
    matches!(self, StepOutcome::Failed(_))
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostBuildReport {
  pub timestamp: RunTimestamp,
  pub context: ContextSummary,
  pub size: StepOutcome<SizeReport>,
  pub artifacts: StepOutcome<ArtifactReport>,
  pub ota: StepOutcome<OtaPackage>,
  pub cleanup: StepOutcome<CleanupOutcome>,
}

impl PostBuildReport {
  /// Number of steps that ran and failed.
  pub fn failure_count(&self) -> usize {
    [
      self.size.is_failed(),
      self.artifacts.is_failed(),
      self.ota.is_failed(),
      self.cleanup.is_failed(),
    ]
    .into_iter()
    .filter(|failed| *failed)
    .count()
  }
}

/// Run every post-build step against `ctx`.
///
/// All timestamped outputs of the run use `timestamp`.
pub fn run(ctx: &BuildContext, config: &PostBuildConfig, timestamp: RunTimestamp) -> PostBuildReport {
  let report = PostBuildReport {
    timestamp,
    context: ctx.summary(),
    size: size_step(ctx, config),
    artifacts: artifacts_step(ctx, config, &timestamp),
    ota: ota_step(ctx, config, &timestamp),
    cleanup: cleanup_step(config),
  };

  info!(
    timestamp = %report.timestamp,
    failures = report.failure_count(),
    "post-build pipeline finished"
  );
  report
}

pub fn size_step(ctx: &BuildContext, config: &PostBuildConfig) -> StepOutcome<SizeReport> {
  let Some(target) = ctx.target() else {
    return StepOutcome::Skipped(SkipReason::EnvironmentUnavailable);
  };

  match analyze_firmware_size(&target.firmware_bin(), config.max_app_size) {
    Ok(report) => StepOutcome::Done(report),
    Err(SizeError::NotFound { .. }) => StepOutcome::Skipped(SkipReason::FirmwareMissing),
    Err(e) => StepOutcome::Failed(e.to_string()),
  }
}

fn artifacts_step(ctx: &BuildContext, config: &PostBuildConfig, timestamp: &RunTimestamp) -> StepOutcome<ArtifactReport> {
  let Some(target) = ctx.target() else {
    return StepOutcome::Skipped(SkipReason::EnvironmentUnavailable);
  };

  match collect_artifacts(&target, &config.artifacts_dir(), timestamp) {
    Ok(report) => StepOutcome::Done(report),
    Err(e) => {
      warn!(error = %e, "artifact collection failed");
      StepOutcome::Failed(e.to_string())
    }
  }
}

fn ota_step(ctx: &BuildContext, config: &PostBuildConfig, timestamp: &RunTimestamp) -> StepOutcome<OtaPackage> {
  let Some(target) = ctx.target() else {
    return StepOutcome::Skipped(SkipReason::EnvironmentUnavailable);
  };

  if !is_ota_build(target.env_name) {
    return StepOutcome::Skipped(SkipReason::NotOtaBuild);
  }

  match create_ota_package(&target, &config.ota_dir(), &config.version_header_path(), timestamp) {
    Ok(package) => StepOutcome::Done(package),
    Err(e) => {
      if !matches!(e, OtaError::FirmwareMissing { .. }) {
        warn!(error = %e, "OTA packaging failed");
      }
      StepOutcome::Failed(e.to_string())
    }
  }
}

fn cleanup_step(config: &PostBuildConfig) -> StepOutcome<CleanupOutcome> {
  match remove_version_header(&config.version_header_path()) {
    Ok(outcome) => StepOutcome::Done(outcome),
    Err(e) => StepOutcome::Failed(e.to_string()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::consts::MAX_APP_SIZE;
  use chrono::NaiveDate;
  use std::fs;
  use std::path::{Path, PathBuf};
  use tempfile::TempDir;

  fn stamp(sec: u32) -> RunTimestamp {
    NaiveDate::from_ymd_opt(2026, 10, 16)
      .and_then(|d| d.and_hms_opt(10, 0, sec))
      .unwrap()
      .into()
  }

  struct Fixture {
    temp: TempDir,
  }

  impl Fixture {
    fn new() -> Self {
      let temp = TempDir::new().unwrap();
      fs::create_dir_all(temp.path().join("build")).unwrap();
      Self { temp }
    }

    fn build_dir(&self) -> PathBuf {
      self.temp.path().join("build")
    }

    fn project(&self) -> &Path {
      self.temp.path()
    }

    fn write_build(&self, name: &str, len: usize) {
      fs::write(self.build_dir().join(name), vec![0xAAu8; len]).unwrap();
    }

    fn write_header(&self, content: &str) {
      let path = self.project().join("src/core/build_info.h");
      fs::create_dir_all(path.parent().unwrap()).unwrap();
      fs::write(path, content).unwrap();
    }

    fn context(&self, env_name: &str) -> BuildContext {
      BuildContext {
        env_name: Some(env_name.to_string()),
        platform: Some("espressif32".into()),
        framework: Some("arduino".into()),
        build_dir: Some(self.build_dir()),
      }
    }

    fn config(&self) -> PostBuildConfig {
      PostBuildConfig::for_project(self.project())
    }

    fn ota_files(&self) -> Vec<String> {
      let dir = self.project().join("ota_packages");
      if !dir.exists() {
        return Vec::new();
      }
      let mut names: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
      names.sort();
      names
    }
  }

  #[test]
  fn release_build_runs_every_step() {
    let fx = Fixture::new();
    fx.write_build("firmware.bin", 1000);
    fx.write_build("firmware.elf", 10);
    fx.write_build("firmware.map", 10);
    fx.write_header("#define BUILD_VERSION \"3.2.1\"\n");

    let report = run(&fx.context("t-deck-pro-release"), &fx.config(), stamp(0));

    assert_eq!(report.size.done().unwrap().remaining(), Some(MAX_APP_SIZE - 1000));
    assert_eq!(report.artifacts.done().unwrap().copied.len(), 3);
    assert_eq!(
      fx.ota_files(),
      [
        "t-deck-pro-os_v3.2.1_20261016_100000.bin",
        "version_v3.2.1_20261016_100000.json"
      ]
    );
    assert!(matches!(report.cleanup, StepOutcome::Done(CleanupOutcome::Removed { .. })));
    assert!(!fx.project().join("src/core/build_info.h").exists());
    assert_eq!(report.failure_count(), 0);
  }

  #[test]
  fn debug_build_leaves_ota_dir_empty() {
    let fx = Fixture::new();
    fx.write_build("firmware.bin", 64);

    let report = run(&fx.context("t-deck-pro-debug"), &fx.config(), stamp(0));

    assert!(matches!(report.ota, StepOutcome::Skipped(SkipReason::NotOtaBuild)));
    assert!(fx.ota_files().is_empty());
  }

  #[test]
  fn missing_binary_fails_ota_but_keeps_symbols() {
    let fx = Fixture::new();
    fx.write_build("firmware.elf", 10);
    fx.write_build("firmware.map", 10);

    let report = run(&fx.context("ota"), &fx.config(), stamp(0));

    assert_eq!(report.size, StepOutcome::Skipped(SkipReason::FirmwareMissing));
    assert!(report.ota.is_failed());
    assert!(fx.ota_files().is_empty());

    let artifacts = report.artifacts.done().unwrap();
    assert_eq!(artifacts.copied.len(), 2);
    assert!(fx.project().join("build_artifacts/t-deck-pro-os_ota.elf").exists());
    assert!(fx.project().join("build_artifacts/t-deck-pro-os_ota.map").exists());
  }

  #[test]
  fn absent_header_uses_default_version() {
    let fx = Fixture::new();
    fx.write_build("firmware.bin", 32);

    let report = run(&fx.context("release"), &fx.config(), stamp(5));

    let package = report.ota.done().unwrap();
    assert_eq!(package.record.version, "1.0.0");
    assert_eq!(package.record.timestamp, "20261016_100005");
    assert!(matches!(report.cleanup, StepOutcome::Done(CleanupOutcome::NotPresent { .. })));
  }

  #[test]
  fn oversized_firmware_reports_no_remaining() {
    let fx = Fixture::new();
    fx.write_build("firmware.bin", 300);
    let config = PostBuildConfig {
      max_app_size: 256,
      ..fx.config()
    };

    let report = run(&fx.context("dev"), &config, stamp(0));
    let size = report.size.done().unwrap();
    assert_eq!(size.remaining(), None);
    assert!(matches!(size, SizeReport::Exceeds { excess: 44, .. }));
  }

  #[test]
  fn consecutive_runs_produce_distinct_sets() {
    let fx = Fixture::new();
    fx.write_build("firmware.bin", 16);

    run(&fx.context("release"), &fx.config(), stamp(0));
    run(&fx.context("release"), &fx.config(), stamp(1));

    assert_eq!(fx.ota_files().len(), 4);
    let artifacts = fs::read_dir(fx.project().join("build_artifacts")).unwrap().count();
    assert_eq!(artifacts, 2);
  }

  #[test]
  fn unavailable_context_still_cleans_up() {
    let fx = Fixture::new();
    fx.write_build("firmware.bin", 16);
    fx.write_header("#define BUILD_VERSION \"1.1.1\"\n");

    let report = run(&BuildContext::default(), &fx.config(), stamp(0));

    assert_eq!(report.size, StepOutcome::Skipped(SkipReason::EnvironmentUnavailable));
    assert!(matches!(
      report.artifacts,
      StepOutcome::Skipped(SkipReason::EnvironmentUnavailable)
    ));
    assert!(matches!(report.ota, StepOutcome::Skipped(SkipReason::EnvironmentUnavailable)));
    assert!(matches!(report.cleanup, StepOutcome::Done(CleanupOutcome::Removed { .. })));
    assert!(!fx.project().join("build_artifacts").exists());
    assert_eq!(report.context.environment, "Unknown");
  }

  #[test]
  fn report_serializes_with_status_tags() {
    let fx = Fixture::new();
    let report = run(&fx.context("dev"), &fx.config(), stamp(0));
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["timestamp"], "20261016_100000");
    assert_eq!(json["size"]["status"], "skipped");
    assert_eq!(json["size"]["detail"], "firmware_missing");
    assert_eq!(json["ota"]["detail"], "not_ota_build");
    assert_eq!(json["context"]["platform"], "espressif32");
  }
}
