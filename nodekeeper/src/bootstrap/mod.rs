//! Bootstrap orchestration.
//!
//! A run is strictly sequential on one thread:
//!
//! 1. [`BootstrapPlan`] resolves endpoints, the node release and the
//!    protocol generation.
//! 2. The release is installed and contract addresses are fetched; the
//!    result is frozen into a `NodeConfig`.
//! 3. The [`ProcessSupervisor`] launches the node.
//! 4. The funding wait blocks until the node account holds funds.
//! 5. The role action fires once.
//! 6. The run blocks until the node exits or a termination signal arrives.
//!
//! [`ProcessSupervisor`]: crate::supervisor::ProcessSupervisor

mod bootstrapper;
mod observer;
mod plan;

pub use bootstrapper::{BootstrapOutcome, Bootstrapper, Collaborators, PreparedNode};
pub use observer::BootstrapObserver;
pub use plan::BootstrapPlan;
