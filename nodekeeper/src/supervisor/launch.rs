//! Node command line composition.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::config::NodeConfig;

/// Program, arguments and output routing for one node launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    program: PathBuf,
    args: Vec<OsString>,
    log_file: Option<PathBuf>,
}

impl LaunchSpec {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            log_file: None,
        }
    }

    /// Compose the node command line from the frozen configuration.
    ///
    /// Flag order is fixed so that the same configuration always produces
    /// the same command line.
    pub fn from_config(config: &NodeConfig) -> Self {
        let mut spec = Self::new(config.executable())
            .arg("--settlement-rpc-endpoint")
            .arg(config.rpc_url())
            .arg("--peer-type")
            .arg(config.role().as_str());

        if !config.bootnodes().is_empty() {
            spec = spec.arg("--bootnodes").arg(config.bootnodes().join(","));
        }

        spec = spec.arg("--priv-key-file").arg(config.key_file());

        if let Some(contracts) = config.contracts() {
            spec = spec
                .arg("--block-tracker-contract")
                .arg(contracts.block_tracker.to_string())
                .arg("--bidder-registry-contract")
                .arg(contracts.bidder_registry.to_string())
                .arg("--provider-registry-contract")
                .arg(contracts.provider_registry.to_string())
                .arg("--preconf-contract")
                .arg(contracts.commitment_store.to_string());
        }

        for extra in config.extra_args() {
            spec = spec.arg(extra);
        }

        spec.log_to(config.node_log().map(Path::to_path_buf))
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Send node stdout/stderr to `path` instead of inheriting them.
    pub fn log_to(mut self, path: Option<PathBuf>) -> Self {
        self.log_file = path;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }
}
