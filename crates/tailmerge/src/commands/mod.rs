//! CLI subcommands.

pub mod init;
pub mod merge;
pub mod presets;
