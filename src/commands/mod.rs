//! Command implementations behind the CLI subcommands.

pub mod jobs;
pub mod migrate;
pub mod serve;
