//! Shared utilities for tradely
//!
//! Logging setup used by the binaries in this workspace.

pub mod logging;

pub use logging::{LogFormat, init_tracing, init_tracing_with};
