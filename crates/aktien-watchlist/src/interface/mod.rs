//! User-facing command line surface

pub mod commands;
pub mod formatter;

pub use commands::Command;
pub use formatter::CliFormatter;
