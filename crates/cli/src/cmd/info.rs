//! Implementation of the `fwpost info` command.
//!
//! Shows what `fwpost run` would operate on without touching the filesystem.

use anyhow::Result;

use fwpost_lib::ota::is_ota_build;

use crate::BuildArgs;
use crate::output::{OutputFormat, format_thousands, print_heading, print_json, print_stat, print_warning};

pub fn cmd_info(args: &BuildArgs, output: OutputFormat) -> Result<()> {
  let context = args.context();
  let config = args.config();
  let summary = context.summary();
  let target = context.target();
  let ota_eligible = target.map(|t| is_ota_build(t.env_name)).unwrap_or(false);

  if output.is_json() {
    let json_output = serde_json::json!({
      "context": summary,
      "build_dir": context.build_dir,
      "project_dir": config.canonical_project_dir(),
      "artifacts_dir": config.artifacts_dir(),
      "ota_dir": config.ota_dir(),
      "version_header": config.version_header_path(),
      "max_app_size": config.max_app_size,
      "ota_eligible": ota_eligible,
    });
    return print_json(&json_output);
  }

  print_heading("Build context:");
  print_stat("Environment", &summary.environment);
  print_stat("Platform", &summary.platform);
  print_stat("Framework", &summary.framework);
  match &target {
    Some(t) => print_stat("Build dir", &t.build_dir.display().to_string()),
    None => print_warning("Build directory not set; environment-dependent steps will be skipped"),
  }
  println!();
  print_heading("Paths:");
  print_stat("Project", &config.canonical_project_dir().display().to_string());
  print_stat("Artifacts", &config.artifacts_dir().display().to_string());
  print_stat("OTA packages", &config.ota_dir().display().to_string());
  print_stat("Version header", &config.version_header_path().display().to_string());
  println!();
  print_stat("App partition", &format!("{} bytes", format_thousands(config.max_app_size)));
  print_stat("OTA package", if ota_eligible { "yes" } else { "no" });

  Ok(())
}
