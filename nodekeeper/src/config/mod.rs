//! Configuration for nodekeeper.
//!
//! Two layers live here:
//!
//! - [`ConfigFile`]: the user-editable `~/.nodekeeper/config.ini`, with
//!   defaults, INI parsing, serialization and typed key access for the
//!   `config` CLI commands.
//! - [`NodeConfig`]: the frozen launch configuration for one run, built once
//!   at startup from the file plus CLI overrides and passed explicitly to
//!   every component that needs it.
//!
//! # Example
//!
//! ```
//! use nodekeeper::config::{NodeConfig, ProtocolGeneration, Role};
//!
//! let config = NodeConfig::builder()
//!     .rpc_url("http://10.0.0.1:8545")
//!     .role(Role::Bidder)
//!     .bootnodes(vec!["/dnsaddr/bootnode.example.xyz".to_string()])
//!     .executable("/opt/node/mev-commit")
//!     .data_dir("/var/lib/node")
//!     .protocol(ProtocolGeneration::Current)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.key_file().to_str(), Some("/var/lib/node/key"));
//! ```

mod defaults;
mod file;
mod keys;
mod node;
mod parser;
mod settings;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use keys::{ConfigKey, ConfigKeyError};
pub use node::{
    NodeConfig, NodeConfigBuilder, NodeConfigError, ProtocolGeneration, ProtocolSelection, Role,
};
pub use settings::*;
