mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fwpost_lib::config::PostBuildConfig;
use fwpost_lib::consts::{MAX_APP_SIZE, VERSION_HEADER};
use fwpost_lib::context::BuildContext;

use cmd::{cmd_info, cmd_run, cmd_size, cmd_version};
use output::OutputFormat;

/// fwpost - post-build housekeeping for T-Deck-Pro firmware
#[derive(Parser)]
#[command(name = "fwpost")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Output format
  #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
  output: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Run the full post-build pipeline
  Run(BuildArgs),

  /// Analyze firmware size against the app partition
  Size(BuildArgs),

  /// Print the version found in the generated version header
  Version(BuildArgs),

  /// Show the resolved build context and output paths
  Info(BuildArgs),
}

/// Build context and configuration, normally exported by the build orchestrator.
#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
  /// Build target name
  #[arg(long, env = "PIOENV")]
  env_name: Option<String>,

  /// Target platform
  #[arg(long, env = "PIOPLATFORM")]
  platform: Option<String>,

  /// Firmware framework
  #[arg(long, env = "PIOFRAMEWORK")]
  framework: Option<String>,

  /// Directory containing firmware.bin, firmware.elf and firmware.map
  #[arg(long, env = "BUILD_DIR")]
  build_dir: Option<PathBuf>,

  /// Firmware project root; output directories are created here
  #[arg(long, env = "FWPOST_PROJECT_DIR", default_value = ".")]
  project_dir: PathBuf,

  /// App partition capacity in bytes
  #[arg(long, env = "FWPOST_MAX_APP_SIZE", default_value_t = MAX_APP_SIZE)]
  max_app_size: u64,

  /// Generated version header, relative to the project root
  #[arg(long, env = "FWPOST_VERSION_HEADER", default_value = VERSION_HEADER)]
  version_header: PathBuf,
}

impl BuildArgs {
  pub fn context(&self) -> BuildContext {
    let field = |value: &Option<String>| value.clone().filter(|v| !v.trim().is_empty());
    BuildContext {
      env_name: field(&self.env_name),
      platform: field(&self.platform),
      framework: field(&self.framework),
      build_dir: self.build_dir.clone().filter(|p| !p.as_os_str().is_empty()),
    }
  }

  pub fn config(&self) -> PostBuildConfig {
    PostBuildConfig {
      project_dir: self.project_dir.clone(),
      max_app_size: self.max_app_size,
      version_header: self.version_header.clone(),
    }
  }
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let filter = if cli.verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
  };
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match cli.command {
    Commands::Run(args) => cmd_run(&args, cli.output),
    Commands::Size(args) => cmd_size(&args, cli.output),
    Commands::Version(args) => cmd_version(&args, cli.output),
    Commands::Info(args) => cmd_info(&args, cli.output),
  }
}
