//! Shared test helpers for CLI tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

const ORCHESTRATOR_VARS: [&str; 7] = [
  "PIOENV",
  "PIOPLATFORM",
  "PIOFRAMEWORK",
  "BUILD_DIR",
  "FWPOST_PROJECT_DIR",
  "FWPOST_MAX_APP_SIZE",
  "FWPOST_VERSION_HEADER",
];

/// Get a Command for the fwpost binary with no inherited build context.
pub fn fwpost_cmd() -> Command {
  let mut cmd = cargo_bin_cmd!("fwpost");
  for var in ORCHESTRATOR_VARS {
    cmd.env_remove(var);
  }
  cmd.env_remove("RUST_LOG");
  cmd
}

/// Isolated firmware project with a build output directory.
pub struct TestProject {
  pub temp: TempDir,
}

impl TestProject {
  pub fn new() -> Self {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join(".pio/build/env")).unwrap();
    Self { temp }
  }

  pub fn root(&self) -> &Path {
    self.temp.path()
  }

  pub fn build_dir(&self) -> PathBuf {
    self.root().join(".pio/build/env")
  }

  pub fn write_build(&self, name: &str, len: usize) {
    fs::write(self.build_dir().join(name), vec![0x5Au8; len]).unwrap();
  }

  pub fn write_header(&self, version: &str) {
    let path = self.header_path();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, format!("#pragma once\n#define BUILD_VERSION \"{}\"\n", version)).unwrap();
  }

  pub fn header_path(&self) -> PathBuf {
    self.root().join("src/core/build_info.h")
  }

  pub fn files_in(&self, dir: &str) -> Vec<String> {
    let path = self.root().join(dir);
    if !path.exists() {
      return Vec::new();
    }
    let mut names: Vec<_> = fs::read_dir(path)
      .unwrap()
      .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
      .collect();
    names.sort();
    names
  }

  /// A `fwpost` command wired to this project as the orchestrator would.
  pub fn cmd(&self, subcommand: &str, env_name: &str) -> Command {
    let mut cmd = fwpost_cmd();
    cmd
      .arg(subcommand)
      .env("PIOENV", env_name)
      .env("PIOPLATFORM", "espressif32")
      .env("PIOFRAMEWORK", "arduino")
      .env("BUILD_DIR", self.build_dir())
      .env("FWPOST_PROJECT_DIR", self.root());
    cmd
  }
}
