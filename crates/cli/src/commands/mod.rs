//! Subcommand implementations.

pub mod chat;
pub mod init;
pub mod schemas;
