//! Command-line tooling around `sweeplog-core`.

pub mod common;
