//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`artifact`] - Show the release archive for a platform
//! - [`common`] - Command-line overrides shared by commands
//! - [`config`] - Configuration management (get, set, list, path)
//! - [`console`] - Terminal progress output
//! - [`start`] - Full bootstrap and supervision

pub mod artifact;
pub mod common;
pub mod config;
pub mod console;
pub mod start;
