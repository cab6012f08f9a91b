//! nodekeeper - bootstrap and supervision for mev-commit nodes
//!
//! This library installs the node release matching the host platform and
//! network, launches the node as a supervised child process, waits for its
//! account to be funded, and performs the bidder or provider registration.
//!
//! # High-Level API
//!
//! The [`bootstrap`] module wires everything together:
//!
//! ```ignore
//! use nodekeeper::artifact::Platform;
//! use nodekeeper::bootstrap::{Bootstrapper, Collaborators};
//! use nodekeeper::config::ConfigFile;
//! use nodekeeper::supervisor::{install_signal_handler, ProcessSupervisor, ShutdownSignal};
//!
//! let settings = ConfigFile::load()?;
//! let shutdown = ShutdownSignal::new();
//! let supervisor = ProcessSupervisor::new();
//! install_signal_handler(supervisor.cleanup_handle(), shutdown.clone())?;
//!
//! let bootstrapper = Bootstrapper::new(&settings, collaborators, shutdown);
//! let prepared = bootstrapper.prepare(Platform::current()?)?;
//! let outcome = bootstrapper.run(&prepared, &supervisor)?;
//! ```

pub mod artifact;
pub mod bootstrap;
pub mod config;
pub mod contracts;
pub mod error;
pub mod funding;
pub mod install;
pub mod logging;
pub mod network;
pub mod registration;
pub mod supervisor;

/// Version of the nodekeeper library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
