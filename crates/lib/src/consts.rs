/// Prefix of every artifact and OTA package file name.
pub const FIRMWARE_PREFIX: &str = "t-deck-pro-os";

/// Linked firmware image inside the build output directory.
pub const FIRMWARE_BIN: &str = "firmware.bin";
/// Debug symbol file inside the build output directory.
pub const FIRMWARE_ELF: &str = "firmware.elf";
/// Linker memory map inside the build output directory.
pub const FIRMWARE_MAP: &str = "firmware.map";

/// Typical ESP32-S3 app partition capacity.
pub const MAX_APP_SIZE: u64 = 6 * 1024 * 1024;

pub const ARTIFACTS_DIR: &str = "build_artifacts";
pub const OTA_DIR: &str = "ota_packages";

/// Generated header carrying `BUILD_VERSION`, relative to the project directory.
pub const VERSION_HEADER: &str = "src/core/build_info.h";
pub const VERSION_MARKER: &str = "BUILD_VERSION";
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Substrings of the environment name that enable OTA packaging.
pub const OTA_ENV_MARKERS: [&str; 2] = ["release", "ota"];

/// Placeholder for context fields the build tool did not supply.
pub const UNKNOWN_FIELD: &str = "Unknown";
/// Environment name used in file names when none was supplied.
pub const UNKNOWN_ENV: &str = "unknown";

/// Format of the per-run timestamp embedded in file names.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

// Variables exported by the build orchestrator.
pub const ENV_VAR_NAME: &str = "PIOENV";
pub const ENV_VAR_PLATFORM: &str = "PIOPLATFORM";
pub const ENV_VAR_FRAMEWORK: &str = "PIOFRAMEWORK";
pub const ENV_VAR_BUILD_DIR: &str = "BUILD_DIR";
