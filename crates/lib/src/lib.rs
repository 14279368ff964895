//! fwpost-lib: post-build housekeeping for the T-Deck-Pro firmware.
//!
//! The pipeline runs once per build, after the firmware image is linked:
//! - `size`: compare the image against the app partition capacity
//! - `artifacts`: keep timestamped copies of the image, symbols and map
//! - `ota`: package release/OTA builds with a JSON version record
//! - `cleanup`: drop the generated version header
//!
//! Every step is fault tolerant; [`pipeline::run`] never fails.

pub mod artifacts;
pub mod cleanup;
pub mod config;
pub mod consts;
pub mod context;
pub mod ota;
pub mod pipeline;
pub mod size;
pub mod timestamp;
pub mod util;
pub mod version;
