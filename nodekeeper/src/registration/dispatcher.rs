//! Strategy selection and the single dispatch per run.

use tracing::info;

use super::bidder::{BidderDeposit, DepositClient};
use super::provider::{ProviderManualRegistration, ProviderStake, StakeSubmitter};
use super::request::{RegistrationRequest, RegistrationTarget};
use super::{RegistrationError, RegistrationOutcome, RoleAction};
use crate::funding::Account;

/// Pick the one action for a request.
///
/// The target already encodes the (role, generation) pair, so each target
/// maps to exactly one strategy.
pub fn select_action<'a>(
    request: &RegistrationRequest,
    deposits: &'a dyn DepositClient,
    stakes: &'a dyn StakeSubmitter,
) -> Box<dyn RoleAction + 'a> {
    match request.target() {
        RegistrationTarget::NodeApi { url } => {
            Box::new(BidderDeposit::new(deposits, url.clone(), request.amount()))
        }
        RegistrationTarget::ProviderRegistry { rpc_url, registry } => Box::new(ProviderStake::new(
            stakes,
            rpc_url.clone(),
            *registry,
            request.amount(),
        )),
        RegistrationTarget::Manual => Box::new(ProviderManualRegistration::new(request.amount())),
    }
}

/// Fires the registration action for a funded account.
pub struct RoleActionDispatcher<'a> {
    deposits: &'a dyn DepositClient,
    stakes: &'a dyn StakeSubmitter,
}

impl<'a> RoleActionDispatcher<'a> {
    pub fn new(deposits: &'a dyn DepositClient, stakes: &'a dyn StakeSubmitter) -> Self {
        Self { deposits, stakes }
    }

    /// Perform the request's action exactly once.
    ///
    /// Takes the request by value: a request cannot be dispatched twice.
    pub fn dispatch(
        &self,
        request: RegistrationRequest,
        account: &Account,
    ) -> Result<RegistrationOutcome, RegistrationError> {
        let action = select_action(&request, self.deposits, self.stakes);
        info!(
            role = %request.role(),
            protocol = %request.generation(),
            action = %action.describe(),
            "Registering node"
        );
        action.execute(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{NodeConfig, ProtocolGeneration, Role};
    use crate::contracts::ContractAddresses;
    use alloy::primitives::{Address, B256, U256};
    use alloy::signers::local::PrivateKeySigner;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[derive(Default)]
    struct Counting {
        posts: AtomicUsize,
        stakes: AtomicUsize,
    }

    impl DepositClient for Counting {
        fn post(&self, _url: &str) -> Result<u16, RegistrationError> {
            self.posts.fetch_add(1, Ordering::SeqCst);
            Ok(200)
        }
    }

    impl StakeSubmitter for Counting {
        fn register_and_stake(
            &self,
            _rpc_url: &str,
            _registry: Address,
            _amount: U256,
            _signer: &PrivateKeySigner,
        ) -> Result<B256, RegistrationError> {
            self.stakes.fetch_add(1, Ordering::SeqCst);
            Ok(B256::ZERO)
        }
    }

    fn request(role: Role, protocol: ProtocolGeneration) -> RegistrationRequest {
        let config = NodeConfig::builder()
            .rpc_url("http://10.0.0.1:8545")
            .role(role)
            .protocol(protocol)
            .executable("/opt/mev-commit")
            .data_dir("/tmp/node")
            .contracts(Some(ContractAddresses {
                block_tracker: Address::repeat_byte(1),
                bidder_registry: Address::repeat_byte(2),
                provider_registry: Address::repeat_byte(3),
                commitment_store: Address::repeat_byte(4),
            }))
            .build()
            .unwrap();
        RegistrationRequest::from_config(&config, U256::from(1), U256::from(2)).unwrap()
    }

    #[test]
    fn test_each_pair_fires_one_action() {
        let account = Account::from_hex(KEY, Path::new("/tmp/node/key")).unwrap();
        let cases = [
            (Role::Bidder, ProtocolGeneration::Current, 1, 0, false),
            (Role::Bidder, ProtocolGeneration::Legacy, 1, 0, false),
            (Role::Provider, ProtocolGeneration::Legacy, 0, 1, false),
            (Role::Provider, ProtocolGeneration::Current, 0, 0, true),
        ];

        for (role, protocol, posts, stakes, manual) in cases {
            let counting = Counting::default();
            let dispatcher = RoleActionDispatcher::new(&counting, &counting);

            let outcome = dispatcher
                .dispatch(request(role, protocol), &account)
                .unwrap();

            assert_eq!(counting.posts.load(Ordering::SeqCst), posts, "{role} {protocol}");
            assert_eq!(counting.stakes.load(Ordering::SeqCst), stakes, "{role} {protocol}");
            assert_eq!(
                matches!(outcome, RegistrationOutcome::ManualStepRequired { .. }),
                manual
            );
        }
    }

    #[test]
    fn test_describe_names_strategy() {
        let counting = Counting::default();
        let action = select_action(
            &request(Role::Provider, ProtocolGeneration::Legacy),
            &counting,
            &counting,
        );
        assert!(action.describe().starts_with("provider stake"));
    }
}
