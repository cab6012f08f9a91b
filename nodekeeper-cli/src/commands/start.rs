//! Start command - install, launch, fund, register and supervise the node.

use std::time::Duration;

use tracing::info;

use nodekeeper::artifact::Platform;
use nodekeeper::bootstrap::{BootstrapOutcome, Bootstrapper, Collaborators};
use nodekeeper::config::ConfigFile;
use nodekeeper::error::{BootstrapError, BootstrapResult};
use nodekeeper::funding::JsonRpcBalanceClient;
use nodekeeper::install::{HttpDownloader, ShellExtractor};
use nodekeeper::network::HttpMetadataClient;
use nodekeeper::registration::{AlloyStakeSubmitter, HttpDepositClient};
use nodekeeper::supervisor::{install_signal_handler, ProcessSupervisor, ShutdownSignal};

use super::common::{load_config, NodeOverrides};
use super::console::ConsoleObserver;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the start command.
pub struct StartArgs {
    pub overrides: NodeOverrides,
    pub debug: bool,
}

/// Run the start command.
///
/// Returns once the node has stopped, either on Ctrl+C or because it exited
/// cleanly. Any failure is returned as an error and the node is stopped
/// before this function returns.
pub fn run(args: StartArgs) -> Result<(), CliError> {
    let config = load_config(&args.overrides)?;
    let runner = CliRunner::with_config(config, args.debug)?;
    runner.log_startup("start");

    print_banner(runner.config());

    match bootstrap(runner.config())? {
        BootstrapOutcome::Shutdown { .. } => {
            info!("Shut down on signal");
            println!();
            println!("Node stopped.");
        }
        BootstrapOutcome::NodeExited { .. } => {
            info!("Node exited cleanly");
        }
    }

    Ok(())
}

fn bootstrap(settings: &ConfigFile) -> BootstrapResult<BootstrapOutcome> {
    let platform = Platform::current()?;

    let metadata = HttpMetadataClient::new()?;
    let downloader = HttpDownloader::new()?;
    let extractor = ShellExtractor::new();
    let balances = JsonRpcBalanceClient::new(settings.network.rpc_url.as_str())?;
    let deposits = HttpDepositClient::new()?;
    let stakes = AlloyStakeSubmitter;

    let collaborators = Collaborators {
        metadata: &metadata,
        downloader: &downloader,
        extractor: &extractor,
        balances: &balances,
        deposits: &deposits,
        stakes: &stakes,
    };

    let shutdown = ShutdownSignal::new();
    let supervisor =
        ProcessSupervisor::with_grace(Duration::from_secs(settings.node.shutdown_grace_secs));
    install_signal_handler(supervisor.cleanup_handle(), shutdown.clone())?;

    let console = ConsoleObserver::new();
    let bootstrapper = Bootstrapper::new(settings, collaborators, shutdown).with_observer(&console);

    let prepared = match bootstrapper.prepare(platform) {
        Ok(prepared) => prepared,
        Err(BootstrapError::Cancelled) => {
            return Ok(BootstrapOutcome::Shutdown { registration: None })
        }
        Err(e) => return Err(e),
    };
    println!(
        "Protocol: {} (node {})",
        prepared.plan.generation(),
        prepared.plan.version()
    );
    println!();

    bootstrapper.run(&prepared, &supervisor)
}

fn print_banner(config: &ConfigFile) {
    println!("nodekeeper v{}", nodekeeper::VERSION);
    println!("================");
    println!();
    println!("Role:     {}", config.node.role);
    println!("Network:  {}", config.network.environment);
    println!("RPC:      {}", config.network.rpc_url);
    println!("Data:     {}", config.node.data_dir.display());
}
