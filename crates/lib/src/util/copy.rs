//! File copies that keep the source's modification time.
//!
//! `std::fs::copy` carries contents and permissions over; artifacts also keep
//! the mtime so a copied image still dates from its link step.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;

/// Copy `src` to `dst` and stamp `dst` with the mtime of `src`.
///
/// Returns the number of bytes copied.
pub fn copy_preserving_mtime(src: &Path, dst: &Path) -> io::Result<u64> {
  let bytes = fs::copy(src, dst)?;
  let modified = fs::metadata(src)?.modified()?;
  OpenOptions::new().write(true).open(dst)?.set_modified(modified)?;
  Ok(bytes)
}
