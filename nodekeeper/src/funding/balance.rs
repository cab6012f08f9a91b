//! Account balance queries over JSON-RPC.

use std::time::Duration;

use alloy::primitives::{Address, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::transports::{RpcError, TransportError, TransportErrorKind};
use tokio::runtime::{Builder, Runtime};

use crate::network::{NetworkError, NetworkResult};

const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Source of account balances, in wei.
pub trait BalanceSource: Send + Sync {
    fn balance_of(&self, address: Address) -> NetworkResult<U256>;
}

/// `eth_getBalance` against the settlement chain RPC endpoint, through an
/// `alloy` HTTP provider.
///
/// Queries run on a private current-thread runtime so callers stay blocking.
pub struct JsonRpcBalanceClient {
    runtime: Runtime,
    rpc_url: String,
    timeout: Duration,
}

impl std::fmt::Debug for JsonRpcBalanceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonRpcBalanceClient")
            .field("rpc_url", &self.rpc_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl JsonRpcBalanceClient {
    pub fn new(rpc_url: impl Into<String>) -> NetworkResult<Self> {
        Self::with_timeout(rpc_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(rpc_url: impl Into<String>, timeout: Duration) -> NetworkResult<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| NetworkError::ClientBuild(format!("runtime: {e}")))?;

        Ok(Self {
            runtime,
            rpc_url: rpc_url.into(),
            timeout,
        })
    }

    fn map_rpc_error(&self, error: TransportError) -> NetworkError {
        match error {
            RpcError::Transport(TransportErrorKind::HttpError(http)) => NetworkError::HttpStatus {
                url: self.rpc_url.clone(),
                status: http.status,
            },
            RpcError::Transport(kind) => NetworkError::Unreachable {
                url: self.rpc_url.clone(),
                reason: kind.to_string(),
            },
            other => NetworkError::InvalidResponse {
                url: self.rpc_url.clone(),
                reason: other.to_string(),
            },
        }
    }
}

impl BalanceSource for JsonRpcBalanceClient {
    fn balance_of(&self, address: Address) -> NetworkResult<U256> {
        self.runtime.block_on(async {
            let provider = ProviderBuilder::new()
                .connect(&self.rpc_url)
                .await
                .map_err(|_| NetworkError::InvalidRpcUrl {
                    url: self.rpc_url.clone(),
                })?;

            tokio::time::timeout(self.timeout, async { provider.get_balance(address).await })
                .await
                .map_err(|_| NetworkError::Timeout {
                    url: self.rpc_url.clone(),
                    timeout_secs: self.timeout.as_secs(),
                })?
                .map_err(|e| self.map_rpc_error(e))
        })
    }
}
