//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//!
//! # Design
//!
//! All command output goes through this module so `--quiet` and `--json`
//! behave the same everywhere. Diagnostics go to `tracing`, not here.

pub mod output;
