//! Chat-completion providers for Switchyard.
//!
//! All providers implement the `switchyard_core::Provider` trait.
//! [`build_from_config`] picks one based on configuration.

pub mod openai_compat;
pub mod router;

pub use openai_compat::OpenAiCompatProvider;
pub use router::build_from_config;
