//! Shared utilities.

pub mod copy;
