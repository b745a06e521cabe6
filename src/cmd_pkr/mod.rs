//! Subcommand modules for the `pkr` binary.

pub mod merge;
pub mod window;
