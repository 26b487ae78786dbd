//! Shared utilities for the aktien workspace
//!
//! Logging setup and small helpers for reading configuration from the
//! environment.

pub mod env;
pub mod logging;

pub use env::{EnvParseError, parse_env_or};
pub use logging::{init_tracing, init_tracing_with_default};
