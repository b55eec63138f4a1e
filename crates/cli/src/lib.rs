//! Switchyard: a multi-agent student assistant.
//!
//! The binary is a thin shell over [`app::build_session`]; the pieces are
//! exposed here so integration tests can drive a real roster.

pub mod app;
pub mod commands;
pub mod roster;
