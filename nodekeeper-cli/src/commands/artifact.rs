//! Artifact command - show which release archive a platform would install.

use nodekeeper::artifact::Platform;
use nodekeeper::bootstrap::BootstrapPlan;
use nodekeeper::error::BootstrapError;
use nodekeeper::network::HttpMetadataClient;

use super::common::{load_config, NodeOverrides};
use crate::error::CliError;

/// Arguments for the artifact command.
pub struct ArtifactArgs {
    pub overrides: NodeOverrides,
    pub os: Option<String>,
    pub arch: Option<String>,
}

/// Run the artifact command.
///
/// Without `--node-version` (or a pinned `node.version`) the version is
/// fetched from the network metadata endpoint.
pub fn run(args: ArtifactArgs) -> Result<(), CliError> {
    let config = load_config(&args.overrides)?;

    let platform = match (args.os.as_deref(), args.arch.as_deref()) {
        (Some(os), Some(arch)) => Platform::parse(os, arch),
        _ => Platform::current(),
    }
    .map_err(BootstrapError::from)?;

    let client = HttpMetadataClient::new().map_err(BootstrapError::from)?;
    let plan = BootstrapPlan::resolve(&config, platform, &client)?;
    let artifact = plan.artifact();

    println!("Platform:   {}", platform);
    println!("Version:    {}", plan.version());
    println!("Protocol:   {}", plan.generation());
    println!("Identifier: {}", artifact.identifier());
    println!("Archive:    {}", artifact.archive_name());
    println!("Executable: {}", artifact.executable_name());
    println!("URL:        {}", artifact.download_url());

    Ok(())
}
