//! Implementation of the `fwpost run` command.
//!
//! Runs the whole post-build pipeline and renders each step's outcome in
//! pipeline order. Always exits successfully; failures are shown as
//! warnings or errors.

use anyhow::Result;
use tracing::debug;

use fwpost_lib::artifacts::ArtifactReport;
use fwpost_lib::cleanup::CleanupOutcome;
use fwpost_lib::context::ContextSummary;
use fwpost_lib::ota::OtaPackage;
use fwpost_lib::pipeline::{self, PostBuildReport, SkipReason, StepOutcome};
use fwpost_lib::timestamp::RunTimestamp;

use super::size::print_size_outcome;
use crate::BuildArgs;
use crate::output::{
  OutputFormat, print_error, print_heading, print_info, print_json, print_rule, print_stat, print_success,
  print_warning, symbols,
};

pub fn cmd_run(args: &BuildArgs, output: OutputFormat) -> Result<()> {
  let timestamp = RunTimestamp::now();
  debug!(%timestamp, env = ?args.context().env_name, "starting post-build run");

  let report = pipeline::run(&args.context(), &args.config(), timestamp);
  if report.failure_count() > 0 {
    debug!(failures = report.failure_count(), "post-build run finished with failures");
  }

  if output.is_json() {
    return print_json(&report);
  }

  print_report(&report);
  Ok(())
}

fn print_report(report: &PostBuildReport) {
  print_summary(&report.context);
  print_size_outcome(&report.size);
  print_artifacts_outcome(&report.artifacts);
  print_ota_outcome(&report.ota);
  print_cleanup_outcome(&report.cleanup);
  print_banner();
}

fn print_summary(context: &ContextSummary) {
  print_rule();
  print_heading("T-DECK-PRO OS - POST-BUILD");
  print_rule();
  print_stat("Environment", &context.environment);
  print_stat("Platform", &context.platform);
  print_stat("Framework", &context.framework);
  print_rule();
}

fn print_artifacts_outcome(outcome: &StepOutcome<ArtifactReport>) {
  print_info("Generating build artifacts...");

  match outcome {
    StepOutcome::Done(report) => {
      for copied in &report.copied {
        print_success(&format!("{} copied: {}", copied.kind.label(), copied.destination.display()));
      }
      for failed in &report.failed {
        print_warning(&format!(
          "Could not copy {} {}: {}",
          failed.kind.label(),
          failed.source.display(),
          failed.message
        ));
      }
    }
    StepOutcome::Skipped(SkipReason::EnvironmentUnavailable) => {
      print_warning("Environment not available - skipping artifact generation");
    }
    StepOutcome::Skipped(reason) => print_warning(&format!("Skipping artifacts ({})", reason)),
    StepOutcome::Failed(message) => print_warning(message),
  }
}

fn print_ota_outcome(outcome: &StepOutcome<OtaPackage>) {
  print_info("Creating OTA package...");

  match outcome {
    StepOutcome::Done(package) => {
      print_success(&format!("OTA package created: {}", package.package.display()));
      print_success(&format!("Version info: {}", package.manifest.display()));
    }
    StepOutcome::Skipped(SkipReason::EnvironmentUnavailable) => {
      print_warning("Environment not available - skipping OTA package");
    }
    StepOutcome::Skipped(reason) => print_warning(&format!("Skipping OTA package ({})", reason)),
    StepOutcome::Failed(message) => print_error(message),
  }
}

fn print_cleanup_outcome(outcome: &StepOutcome<CleanupOutcome>) {
  print_info("Cleaning up build files...");

  match outcome {
    StepOutcome::Done(CleanupOutcome::Removed { path }) => {
      let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
      print_success(&format!("Cleaned up {}", name));
    }
    StepOutcome::Done(CleanupOutcome::NotPresent { .. }) => {}
    StepOutcome::Skipped(reason) => print_warning(&format!("Skipping cleanup ({})", reason)),
    StepOutcome::Failed(message) => print_warning(&format!("Could not clean up: {}", message)),
  }
}

fn print_banner() {
  print_rule();
  print_heading(&format!("{} T-DECK-PRO OS BUILD COMPLETE!", symbols::ROCKET));
  print_rule();
  println!("Next steps:");
  println!("  1. Flash firmware to T-Deck-Pro device");
  println!("  2. Check serial monitor for boot messages");
  println!("  3. Test core functionality");
  println!("  4. Deploy to production if release build");
  print_rule();
}
