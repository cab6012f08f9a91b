//! Provider registration: on-chain stake or a manual step.

use alloy::network::{EthereumWallet, ReceiptResponse};
use alloy::primitives::{Address, B256, U256};
use alloy::providers::ProviderBuilder;
use alloy::signers::local::PrivateKeySigner;
use alloy::sol;
use tracing::info;

use super::{RegistrationError, RegistrationOutcome, RoleAction};
use crate::funding::{format_ether, Account};

sol! {
    #[sol(rpc)]
    interface IProviderRegistry {
        function registerAndStake() external payable;
    }
}

/// Submits the provider stake transaction and waits for its receipt.
pub trait StakeSubmitter: Send + Sync {
    /// Returns the hash of the successfully mined transaction.
    fn register_and_stake(
        &self,
        rpc_url: &str,
        registry: Address,
        amount: U256,
        signer: &PrivateKeySigner,
    ) -> Result<B256, RegistrationError>;
}

/// [`StakeSubmitter`] using an `alloy` HTTP provider with a local wallet.
///
/// The call is async; it runs on a throwaway current-thread runtime so the
/// rest of the bootstrap stays blocking.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlloyStakeSubmitter;

impl StakeSubmitter for AlloyStakeSubmitter {
    fn register_and_stake(
        &self,
        rpc_url: &str,
        registry: Address,
        amount: U256,
        signer: &PrivateKeySigner,
    ) -> Result<B256, RegistrationError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| RegistrationError::Transaction(format!("runtime: {e}")))?;

        runtime.block_on(async {
            let provider = ProviderBuilder::new()
                .wallet(EthereumWallet::from(signer.clone()))
                .connect(rpc_url)
                .await
                .map_err(|e| RegistrationError::Transaction(e.to_string()))?;

            let contract = IProviderRegistry::new(registry, &provider);
            let pending = contract
                .registerAndStake()
                .value(amount)
                .send()
                .await
                .map_err(|e| RegistrationError::Transaction(e.to_string()))?;
            info!(tx_hash = %pending.tx_hash(), "Stake transaction sent");

            let receipt = pending
                .get_receipt()
                .await
                .map_err(|e| RegistrationError::Transaction(e.to_string()))?;

            let tx_hash = receipt.transaction_hash();
            if receipt.status() {
                Ok(tx_hash)
            } else {
                Err(RegistrationError::Reverted { tx_hash })
            }
        })
    }
}

/// Legacy provider registration: stake from the node account.
pub struct ProviderStake<'a, S: StakeSubmitter + ?Sized> {
    submitter: &'a S,
    rpc_url: String,
    registry: Address,
    amount: U256,
}

impl<'a, S: StakeSubmitter + ?Sized> ProviderStake<'a, S> {
    pub fn new(submitter: &'a S, rpc_url: impl Into<String>, registry: Address, amount: U256) -> Self {
        Self {
            submitter,
            rpc_url: rpc_url.into(),
            registry,
            amount,
        }
    }
}

impl<S: StakeSubmitter + ?Sized> RoleAction for ProviderStake<'_, S> {
    fn describe(&self) -> String {
        format!(
            "provider stake of {} ETH to registry {}",
            format_ether(self.amount),
            self.registry
        )
    }

    fn execute(&self, account: &Account) -> Result<RegistrationOutcome, RegistrationError> {
        info!(
            address = %account.address(),
            registry = %self.registry,
            amount_eth = %format_ether(self.amount),
            "Submitting provider stake"
        );
        let tx_hash = self.submitter.register_and_stake(
            &self.rpc_url,
            self.registry,
            self.amount,
            account.signer(),
        )?;

        info!(%tx_hash, "Provider stake confirmed");
        Ok(RegistrationOutcome::Staked {
            tx_hash,
            amount: self.amount,
        })
    }
}

/// Current-protocol provider registration, done by the operator.
#[derive(Debug, Clone)]
pub struct ProviderManualRegistration {
    amount: U256,
}

impl ProviderManualRegistration {
    pub fn new(amount: U256) -> Self {
        Self { amount }
    }
}

impl RoleAction for ProviderManualRegistration {
    fn describe(&self) -> String {
        "manual provider registration".to_string()
    }

    fn execute(&self, account: &Account) -> Result<RegistrationOutcome, RegistrationError> {
        let instructions = format!(
            "Provider {address} is funded and running.\n\
             Complete registration by staking at least {amount} ETH for this \
             address through the provider registry, signing with the key in \
             {key}. The node keeps running meanwhile.",
            address = account.address(),
            amount = format_ether(self.amount),
            key = account.key_file().display(),
        );
        Ok(RegistrationOutcome::ManualStepRequired { instructions })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Mutex;

    const KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[derive(Default)]
    struct RecordingSubmitter {
        calls: Mutex<Vec<(String, Address, U256, Address)>>,
        revert: bool,
    }

    impl StakeSubmitter for RecordingSubmitter {
        fn register_and_stake(
            &self,
            rpc_url: &str,
            registry: Address,
            amount: U256,
            signer: &PrivateKeySigner,
        ) -> Result<B256, RegistrationError> {
            self.calls.lock().unwrap().push((
                rpc_url.to_string(),
                registry,
                amount,
                signer.address(),
            ));
            if self.revert {
                Err(RegistrationError::Reverted {
                    tx_hash: B256::repeat_byte(0xee),
                })
            } else {
                Ok(B256::repeat_byte(0xaa))
            }
        }
    }

    fn account() -> Account {
        Account::from_hex(KEY, Path::new("/data/key")).unwrap()
    }

    #[test]
    fn test_stake_signs_with_node_key() {
        let submitter = RecordingSubmitter::default();
        let action = ProviderStake::new(
            &submitter,
            "http://10.0.0.1:8545",
            Address::repeat_byte(3),
            U256::from(10),
        );
        let account = account();

        let outcome = action.execute(&account).unwrap();
        assert_eq!(
            outcome,
            RegistrationOutcome::Staked {
                tx_hash: B256::repeat_byte(0xaa),
                amount: U256::from(10)
            }
        );

        let calls = submitter.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0],
            (
                "http://10.0.0.1:8545".to_string(),
                Address::repeat_byte(3),
                U256::from(10),
                account.address()
            )
        );
    }

    #[test]
    fn test_reverted_stake_is_error() {
        let submitter = RecordingSubmitter {
            revert: true,
            ..Default::default()
        };
        let action = ProviderStake::new(&submitter, "http://rpc", Address::ZERO, U256::from(1));
        assert!(matches!(
            action.execute(&account()),
            Err(RegistrationError::Reverted { .. })
        ));
    }

    #[test]
    fn test_manual_registration_mentions_account() {
        let account = account();
        let outcome = ProviderManualRegistration::new(U256::from(10u128.pow(19)))
            .execute(&account)
            .unwrap();

        let RegistrationOutcome::ManualStepRequired { instructions } = outcome else {
            panic!("expected manual step");
        };
        assert!(instructions.contains(&account.address().to_string()));
        assert!(instructions.contains("10.0 ETH"));
        assert!(instructions.contains("/data/key"));
    }
}
