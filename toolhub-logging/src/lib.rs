//! Structured logging setup for Toolhub
//!
//! Everything in the workspace logs through `tracing`; this crate owns the
//! one place where a subscriber is installed, driven by the logging domain
//! of [`toolhub_config::ToolhubConfig`].

pub mod init;

pub use init::{build_env_filter, init_logging_from_config, init_simple_tracing};
