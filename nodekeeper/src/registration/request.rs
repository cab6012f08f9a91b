//! The registration request built from the node configuration.

use alloy::primitives::{Address, U256};

use super::RegistrationError;
use crate::config::{NodeConfig, ProtocolGeneration, Role};

/// Where a registration action is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationTarget {
    /// Local node HTTP API endpoint (bidder deposit).
    NodeApi { url: String },
    /// Provider registry contract on the settlement chain.
    ProviderRegistry { rpc_url: String, registry: Address },
    /// Nothing to call; the operator registers out of band.
    Manual,
}

/// One registration, fixed before it is dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    role: Role,
    generation: ProtocolGeneration,
    target: RegistrationTarget,
    amount: U256,
}

impl RegistrationRequest {
    /// Build the request for the configured role and protocol.
    ///
    /// Bidders use `deposit`, providers use `stake`.
    pub fn from_config(
        config: &NodeConfig,
        deposit: U256,
        stake: U256,
    ) -> Result<Self, RegistrationError> {
        let generation = config.protocol();
        let (target, amount) = match (config.role(), generation) {
            (Role::Bidder, ProtocolGeneration::Current) => (
                RegistrationTarget::NodeApi {
                    url: format!("{}/v1/bidder/auto_deposit/{deposit}", config.api_url()),
                },
                deposit,
            ),
            (Role::Bidder, ProtocolGeneration::Legacy) => (
                RegistrationTarget::NodeApi {
                    url: format!("{}/v1/bidder/prepay/{deposit}", config.api_url()),
                },
                deposit,
            ),
            (Role::Provider, ProtocolGeneration::Legacy) => {
                let contracts = config.contracts().ok_or(RegistrationError::MissingContracts)?;
                (
                    RegistrationTarget::ProviderRegistry {
                        rpc_url: config.rpc_url().to_string(),
                        registry: contracts.provider_registry,
                    },
                    stake,
                )
            }
            (Role::Provider, ProtocolGeneration::Current) => (RegistrationTarget::Manual, stake),
        };

        Ok(Self {
            role: config.role(),
            generation,
            target,
            amount,
        })
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn generation(&self) -> ProtocolGeneration {
        self.generation
    }

    pub fn target(&self) -> &RegistrationTarget {
        &self.target
    }

    /// Deposit or stake amount, in wei.
    pub fn amount(&self) -> U256 {
        self.amount
    }
}
