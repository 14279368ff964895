use anyhow::Result;

use fwpost_lib::pipeline::{SkipReason, StepOutcome, size_step};
use fwpost_lib::size::SizeReport;

use crate::BuildArgs;
use crate::output::{
  OutputFormat, format_kib, format_mib, format_thousands, print_info, print_json, print_success, print_warning,
};

pub fn cmd_size(args: &BuildArgs, output: OutputFormat) -> Result<()> {
  let outcome = size_step(&args.context(), &args.config());

  if output.is_json() {
    print_json(&outcome)?;
  } else {
    print_size_outcome(&outcome);
  }

  Ok(())
}

pub(crate) fn print_size_outcome(outcome: &StepOutcome<SizeReport>) {
  print_info("Analyzing firmware size...");

  match outcome {
    StepOutcome::Done(report) => {
      let size = report.size();
      print_success(&format!(
        "Firmware size: {} bytes ({} / {})",
        format_thousands(size),
        format_kib(size),
        format_mib(size)
      ));

      match report {
        SizeReport::Fits { remaining, .. } => {
          print_success(&format!(
            "Remaining space: {} ({} bytes)",
            format_mib(*remaining),
            format_thousands(*remaining)
          ));
        }
        SizeReport::Exceeds { max, excess, .. } => {
          print_warning(&format!(
            "Warning: firmware exceeds the {} app partition by {} bytes!",
            format_mib(*max),
            format_thousands(*excess)
          ));
          print_warning("  Consider enabling optimization or reducing features");
        }
      }
    }
    StepOutcome::Skipped(SkipReason::EnvironmentUnavailable) => {
      print_warning("Environment not available - skipping size analysis");
    }
    StepOutcome::Skipped(reason) => print_warning(&capitalize(&reason.to_string())),
    StepOutcome::Failed(message) => print_warning(message),
  }
}

pub(crate) fn capitalize(s: &str) -> String {
  let mut chars = s.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}
