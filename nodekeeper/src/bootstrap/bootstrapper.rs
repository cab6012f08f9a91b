//! The sequential bootstrap orchestrator.

use std::process::ExitStatus;
use std::time::Duration;

use tracing::{info, warn};

use super::observer::BootstrapObserver;
use super::plan::BootstrapPlan;
use crate::artifact::Platform;
use crate::config::{ConfigFile, NodeConfig};
use crate::error::{BootstrapError, BootstrapResult};
use crate::funding::{
    Account, BalanceSource, FundingError, FundingOutcome, FundingWaiter, TracingObserver,
    WaitPolicy,
};
use crate::install::{ArchiveExtractor, ArtifactDownloader, ArtifactInstaller, InstalledArtifact};
use crate::network::MetadataClient;
use crate::registration::{
    DepositClient, RegistrationOutcome, RegistrationRequest, RoleActionDispatcher, StakeSubmitter,
};
use crate::supervisor::{LaunchSpec, ProcessSupervisor, ShutdownSignal};

/// External collaborators of a bootstrap run.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub metadata: &'a dyn MetadataClient,
    pub downloader: &'a dyn ArtifactDownloader,
    pub extractor: &'a dyn ArchiveExtractor,
    pub balances: &'a dyn BalanceSource,
    pub deposits: &'a dyn DepositClient,
    pub stakes: &'a dyn StakeSubmitter,
}

/// A node that is installed and configured, ready to launch.
#[derive(Debug, Clone)]
pub struct PreparedNode {
    pub plan: BootstrapPlan,
    pub installed: InstalledArtifact,
    pub config: NodeConfig,
}

/// How a bootstrap run that did not fail ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// A termination signal stopped the run (and the node).
    Shutdown {
        registration: Option<RegistrationOutcome>,
    },
    /// The node exited on its own with a success status.
    NodeExited {
        registration: Option<RegistrationOutcome>,
    },
}

enum FundingPhase {
    Funded(Account),
    Cancelled,
    NodeExited,
}

/// Drives one bootstrap run:
/// resolve → install → launch → wait for funding → register → supervise.
pub struct Bootstrapper<'a> {
    settings: &'a ConfigFile,
    collaborators: Collaborators<'a>,
    observer: &'a dyn BootstrapObserver,
    shutdown: ShutdownSignal,
}

impl<'a> Bootstrapper<'a> {
    pub fn new(
        settings: &'a ConfigFile,
        collaborators: Collaborators<'a>,
        shutdown: ShutdownSignal,
    ) -> Self {
        Self {
            settings,
            collaborators,
            observer: &TracingObserver,
            shutdown,
        }
    }

    pub fn with_observer(mut self, observer: &'a dyn BootstrapObserver) -> Self {
        self.observer = observer;
        self
    }

    /// Resolve the release for `platform`, install it, fetch contract
    /// addresses and freeze the node configuration.
    ///
    /// Fails with [`BootstrapError::Cancelled`] when shutdown is requested
    /// while the release is being installed.
    pub fn prepare(&self, platform: Platform) -> BootstrapResult<PreparedNode> {
        let plan = BootstrapPlan::resolve(self.settings, platform, self.collaborators.metadata)?;
        self.observer.artifact_resolved(plan.artifact());

        let installer = ArtifactInstaller::new(
            self.settings.node.install_dir.as_path(),
            self.collaborators.downloader,
            self.collaborators.extractor,
        );
        let installed = installer.install(plan.artifact(), self.observer.download_progress())?;
        self.observer.installed(&installed);

        if self.shutdown.is_triggered() {
            info!("Shutdown requested during install");
            return Err(BootstrapError::Cancelled);
        }

        let contracts = plan.resolve_contracts(self.collaborators.metadata)?;
        let config = plan.node_config(self.settings, installed.executable.clone(), contracts)?;

        Ok(PreparedNode {
            plan,
            installed,
            config,
        })
    }

    /// Launch the node, wait for funding, register, then block until the
    /// node exits or shutdown is requested.
    ///
    /// The caller owns `supervisor`; dropping it stops the node on every
    /// path out of this function, including errors.
    pub fn run(
        &self,
        prepared: &PreparedNode,
        supervisor: &ProcessSupervisor,
    ) -> BootstrapResult<BootstrapOutcome> {
        if self.shutdown.is_triggered() {
            info!("Shutdown requested before launch");
            return Ok(BootstrapOutcome::Shutdown { registration: None });
        }

        let config = &prepared.config;
        let pid = supervisor.start(&LaunchSpec::from_config(config))?;
        self.observer.node_started(pid);

        let registration = match self.wait_for_funding(config, supervisor)? {
            FundingPhase::Funded(_) | FundingPhase::Cancelled if self.shutdown.is_triggered() => {
                info!("Shutdown requested during funding wait");
                supervisor.shutdown();
                return Ok(BootstrapOutcome::Shutdown { registration: None });
            }
            FundingPhase::Funded(account) => {
                let registration = &self.settings.registration;
                let request = RegistrationRequest::from_config(
                    config,
                    registration.deposit_amount,
                    registration.stake_amount,
                )?;
                let outcome =
                    RoleActionDispatcher::new(self.collaborators.deposits, self.collaborators.stakes)
                        .dispatch(request, &account)?;
                self.observer.registered(&outcome);
                Some(outcome)
            }
            FundingPhase::Cancelled | FundingPhase::NodeExited => None,
        };

        let status = supervisor.await_termination()?;
        self.finish(status, supervisor, registration)
    }

    fn wait_for_funding(
        &self,
        config: &NodeConfig,
        supervisor: &ProcessSupervisor,
    ) -> BootstrapResult<FundingPhase> {
        let funding = &self.settings.funding;
        let mut waiter = FundingWaiter::new(self.collaborators.balances, config.key_file())
            .poll_interval(Duration::from_secs(funding.poll_interval_secs))
            .key_poll_interval(Duration::from_secs(funding.key_poll_interval_secs))
            .policy(WaitPolicy::from_timeout_secs(funding.timeout_secs));

        match waiter.wait(&self.shutdown, supervisor, self.observer) {
            Ok(FundingOutcome::Funded { account, .. }) => Ok(FundingPhase::Funded(account)),
            Ok(FundingOutcome::Cancelled) => Ok(FundingPhase::Cancelled),
            Err(FundingError::NodeExited) => {
                warn!("Node exited before its account was funded");
                Ok(FundingPhase::NodeExited)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn finish(
        &self,
        status: ExitStatus,
        supervisor: &ProcessSupervisor,
        registration: Option<RegistrationOutcome>,
    ) -> BootstrapResult<BootstrapOutcome> {
        if self.shutdown.is_triggered() || supervisor.was_stopped() {
            info!("Node stopped on shutdown");
            return Ok(BootstrapOutcome::Shutdown { registration });
        }

        self.observer.node_exited(status);
        if status.success() {
            Ok(BootstrapOutcome::NodeExited { registration })
        } else {
            Err(BootstrapError::NodeFailed(status))
        }
    }
}
