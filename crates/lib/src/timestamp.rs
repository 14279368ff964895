use std::fmt;

use chrono::{Local, NaiveDateTime};
use serde::{Serialize, Serializer};

use crate::consts::TIMESTAMP_FORMAT;

/// Local time captured once per run and embedded in output file names.
///
/// Resolution is one second, so two runs within the same second share a stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RunTimestamp(NaiveDateTime);

impl RunTimestamp {
  pub fn now() -> Self {
    Self(Local::now().naive_local())
  }

  pub fn new(at: NaiveDateTime) -> Self {
    Self(at)
  }

  pub fn datetime(&self) -> NaiveDateTime {
    self.0
  }
}

impl From<NaiveDateTime> for RunTimestamp {
  fn from(at: NaiveDateTime) -> Self {
    Self(at)
  }
}

impl fmt::Display for RunTimestamp {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
  }
}

impl Serialize for RunTimestamp {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}
