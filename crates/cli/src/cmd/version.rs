use anyhow::Result;

use fwpost_lib::version::{VersionSource, read_version};

use crate::BuildArgs;
use crate::output::{OutputFormat, print_json, print_warning};

pub fn cmd_version(args: &BuildArgs, output: OutputFormat) -> Result<()> {
  let header = args.config().version_header_path();
  let resolved = read_version(&header);

  if output.is_json() {
    return print_json(&resolved);
  }

  if resolved.source == VersionSource::Default {
    print_warning(&format!(
      "No version found in {}, using default",
      header.display()
    ));
  }
  println!("{}", resolved.version);

  Ok(())
}
