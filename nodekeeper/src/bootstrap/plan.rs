//! Everything decided before the node is launched.

use std::path::PathBuf;

use semver::Version;
use tracing::info;

use crate::artifact::{ArtifactDescriptor, ArtifactResolver, Platform};
use crate::config::{ConfigFile, NodeConfig, ProtocolGeneration};
use crate::contracts::{ContractAddressResolver, ContractAddresses};
use crate::error::{BootstrapError, BootstrapResult};
use crate::network::{fetch_metadata, MetadataClient, NetworkEndpoints};

/// Release, protocol generation and endpoints for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapPlan {
    version: Version,
    generation: ProtocolGeneration,
    artifact: ArtifactDescriptor,
    endpoints: NetworkEndpoints,
}

impl BootstrapPlan {
    /// Resolve endpoints, node version and artifact for `platform`.
    ///
    /// The version comes from `node.version` when pinned, otherwise from the
    /// network metadata document.
    pub fn resolve(
        settings: &ConfigFile,
        platform: Platform,
        metadata: &dyn MetadataClient,
    ) -> BootstrapResult<Self> {
        let network = &settings.network;
        let endpoints = NetworkEndpoints::resolve(
            network.environment,
            &network.rpc_url,
            network.contracts_url.as_deref(),
            network.metadata_url.as_deref(),
        )?;

        let version = match &settings.node.version {
            Some(version) => version.clone(),
            None => {
                let url = endpoints
                    .metadata_url
                    .as_deref()
                    .ok_or(BootstrapError::UnknownVersion)?;
                fetch_metadata(metadata, url)?.version
            }
        };

        let generation = settings.registration.protocol.resolve(&version);
        let artifact = ArtifactResolver::new(settings.node.binary_name.as_str())
            .with_release_base_url(settings.node.release_url.as_str())
            .resolve(platform, &version);

        info!(
            environment = %network.environment,
            %version,
            protocol = %generation,
            "Bootstrap plan resolved"
        );

        Ok(Self {
            version,
            generation,
            artifact,
            endpoints,
        })
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn generation(&self) -> ProtocolGeneration {
        self.generation
    }

    pub fn artifact(&self) -> &ArtifactDescriptor {
        &self.artifact
    }

    pub fn endpoints(&self) -> &NetworkEndpoints {
        &self.endpoints
    }

    /// Fetch contract addresses, if the network publishes them.
    pub fn resolve_contracts(
        &self,
        metadata: &dyn MetadataClient,
    ) -> BootstrapResult<Option<ContractAddresses>> {
        match &self.endpoints.contracts_url {
            Some(url) => Ok(Some(ContractAddressResolver::new(metadata).resolve(url)?)),
            None => Ok(None),
        }
    }

    /// Freeze the node configuration for launch.
    pub fn node_config(
        &self,
        settings: &ConfigFile,
        executable: PathBuf,
        contracts: Option<ContractAddresses>,
    ) -> BootstrapResult<NodeConfig> {
        let node = &settings.node;
        let config = NodeConfig::builder()
            .rpc_url(settings.network.rpc_url.as_str())
            .role(node.role)
            .bootnodes(settings.network.bootnodes.clone())
            .contracts(contracts)
            .executable(executable)
            .data_dir(node.data_dir.as_path())
            .api_url(node.api_url.as_str())
            .protocol(self.generation)
            .extra_args(node.extra_args.clone())
            .node_log(node.log_file.clone())
            .build()?;
        Ok(config)
    }
}
