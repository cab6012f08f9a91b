//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use super::keys::ConfigKey;
use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let v = |key: ConfigKey| key.get(config);

    format!(
        r#"[network]
; Network to join:
;   production  - use rpc_url, contracts_url and metadata_url as configured
;   development - derive contract and metadata endpoints from the IPv4 host in rpc_url
environment = {}
; Settlement chain RPC endpoint (http, https, ws or wss)
rpc_url = {}
; Bootnode multiaddrs, comma separated
bootnodes = {}
; Contract address document (leave empty to launch without explicit contracts)
contracts_url = {}
; Network metadata document used to pick the node release when node.version is empty
metadata_url = {}

[node]
; Role to run as: bidder or provider
role = {}
; Node release to run (empty = ask the metadata endpoint)
version = {}
; Executable name inside release archives
binary_name = {}
; Base URL of published releases
release_url = {}
; Where releases are unpacked, one subdirectory per version
install_dir = {}
; Node data directory; the node writes its private key file here
data_dir = {}
; Local node HTTP API
api_url = {}
; Write node output to this file instead of the terminal (empty = inherit)
log_file = {}
; Extra arguments appended to the node command line, space separated
extra_args = {}
; Seconds between SIGTERM and SIGKILL when stopping the node
shutdown_grace_secs = {}

[funding]
; Seconds between balance checks while waiting for the node account to be funded
poll_interval_secs = {}
; Seconds between checks for the node's key file
key_poll_interval_secs = {}
; Give up waiting for funds after this many seconds (0 = wait forever)
timeout_secs = {}

[registration]
; Protocol generation: auto, legacy or current
;   legacy  - bidders prepay, providers stake on-chain automatically
;   current - bidders auto-deposit, providers register manually
protocol = {}
; Bidder deposit in wei
deposit_amount = {}
; Provider stake in wei (legacy protocol only)
stake_amount = {}

[logging]
; Log file path
file = {}
"#,
        v(ConfigKey::NetworkEnvironment),
        v(ConfigKey::NetworkRpcUrl),
        v(ConfigKey::NetworkBootnodes),
        v(ConfigKey::NetworkContractsUrl),
        v(ConfigKey::NetworkMetadataUrl),
        v(ConfigKey::NodeRole),
        v(ConfigKey::NodeVersion),
        v(ConfigKey::NodeBinaryName),
        v(ConfigKey::NodeReleaseUrl),
        v(ConfigKey::NodeInstallDir),
        v(ConfigKey::NodeDataDir),
        v(ConfigKey::NodeApiUrl),
        v(ConfigKey::NodeLogFile),
        v(ConfigKey::NodeExtraArgs),
        v(ConfigKey::NodeShutdownGraceSecs),
        v(ConfigKey::FundingPollIntervalSecs),
        v(ConfigKey::FundingKeyPollIntervalSecs),
        v(ConfigKey::FundingTimeoutSecs),
        v(ConfigKey::RegistrationProtocol),
        v(ConfigKey::RegistrationDepositAmount),
        v(ConfigKey::RegistrationStakeAmount),
        v(ConfigKey::LoggingFile),
    )
}
