//! CLI commands.

pub mod account;
pub mod migrate;
