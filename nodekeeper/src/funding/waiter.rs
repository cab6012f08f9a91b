//! The funding wait state machine.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use alloy::primitives::{Address, U256};
use tracing::debug;

use super::account::{Account, KeyFileStatus};
use super::balance::BalanceSource;
use super::events::{FundingEvent, FundingObserver};
use super::FundingError;
use crate::config::{DEFAULT_KEY_POLL_INTERVAL_SECS, DEFAULT_POLL_INTERVAL_SECS};
use crate::supervisor::{NodeLiveness, ShutdownSignal};

/// How long the wait may last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaitPolicy {
    /// Poll until funded, cancelled, or the node exits.
    #[default]
    Unbounded,
    /// Fail with [`FundingError::Timeout`] after this long.
    Timeout(Duration),
}

impl WaitPolicy {
    /// `0` means unbounded.
    pub fn from_timeout_secs(secs: u64) -> Self {
        if secs == 0 {
            Self::Unbounded
        } else {
            Self::Timeout(Duration::from_secs(secs))
        }
    }

    fn deadline(&self, start: Instant) -> Option<Instant> {
        match self {
            Self::Unbounded => None,
            Self::Timeout(limit) => Some(start + *limit),
        }
    }
}

/// Where the wait currently is. Transitions only move forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FundingState {
    WaitingForKey,
    PollingBalance {
        address: Address,
        last_balance: Option<U256>,
    },
    Funded {
        address: Address,
        balance: U256,
    },
}

/// How a completed wait ended.
#[derive(Debug)]
pub enum FundingOutcome {
    /// The balance became positive.
    Funded { account: Account, balance: U256 },
    /// Shutdown was requested first.
    Cancelled,
}

/// Waits for the node's key file and then for its account to be funded.
pub struct FundingWaiter<'a, B: BalanceSource + ?Sized> {
    source: &'a B,
    key_file: PathBuf,
    poll_interval: Duration,
    key_poll_interval: Duration,
    policy: WaitPolicy,
    state: FundingState,
}

impl<'a, B: BalanceSource + ?Sized> FundingWaiter<'a, B> {
    pub fn new(source: &'a B, key_file: impl Into<PathBuf>) -> Self {
        Self {
            source,
            key_file: key_file.into(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            key_poll_interval: Duration::from_secs(DEFAULT_KEY_POLL_INTERVAL_SECS),
            policy: WaitPolicy::default(),
            state: FundingState::WaitingForKey,
        }
    }

    /// Interval between balance queries.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Interval between key file checks.
    pub fn key_poll_interval(mut self, interval: Duration) -> Self {
        self.key_poll_interval = interval;
        self
    }

    pub fn policy(mut self, policy: WaitPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn state(&self) -> &FundingState {
        &self.state
    }

    pub fn key_file(&self) -> &Path {
        &self.key_file
    }

    /// Run the wait to completion.
    ///
    /// Balance query failures are reported to `observer` and retried on the
    /// next tick. The wait ends early if `shutdown` is triggered or
    /// `liveness` reports the node gone.
    pub fn wait<O: FundingObserver + ?Sized>(
        &mut self,
        shutdown: &ShutdownSignal,
        liveness: &dyn NodeLiveness,
        observer: &O,
    ) -> Result<FundingOutcome, FundingError> {
        let deadline = self.policy.deadline(Instant::now());

        let Some(account) = self.wait_for_key(deadline, shutdown, liveness, observer)? else {
            return Ok(FundingOutcome::Cancelled);
        };

        let address = account.address();
        self.state = FundingState::PollingBalance {
            address,
            last_balance: None,
        };
        observer.on_event(&FundingEvent::AccountReady { address });

        loop {
            if shutdown.is_triggered() {
                return Ok(FundingOutcome::Cancelled);
            }

            match self.source.balance_of(address) {
                Ok(balance) if balance > U256::ZERO => {
                    self.state = FundingState::Funded { address, balance };
                    observer.on_event(&FundingEvent::Funded { address, balance });
                    return Ok(FundingOutcome::Funded { account, balance });
                }
                Ok(balance) => {
                    self.state = FundingState::PollingBalance {
                        address,
                        last_balance: Some(balance),
                    };
                    observer.on_event(&FundingEvent::Waiting { address, balance });
                }
                Err(e) => {
                    debug!(error = %e, "eth_getBalance failed");
                    observer.on_event(&FundingEvent::QueryFailed {
                        address,
                        reason: e.to_string(),
                    });
                }
            }

            if self.pause(self.poll_interval, deadline, shutdown, liveness)? {
                return Ok(FundingOutcome::Cancelled);
            }
        }
    }

    /// Returns `None` if shutdown was requested before the key appeared.
    fn wait_for_key<O: FundingObserver + ?Sized>(
        &mut self,
        deadline: Option<Instant>,
        shutdown: &ShutdownSignal,
        liveness: &dyn NodeLiveness,
        observer: &O,
    ) -> Result<Option<Account>, FundingError> {
        let mut announced = false;

        loop {
            if shutdown.is_triggered() {
                return Ok(None);
            }

            match Account::probe(&self.key_file)? {
                KeyFileStatus::Ready(account) => return Ok(Some(account)),
                KeyFileStatus::Pending if !announced => {
                    observer.on_event(&FundingEvent::WaitingForKey {
                        path: self.key_file.clone(),
                    });
                    announced = true;
                }
                KeyFileStatus::Pending => {}
            }

            if self.pause(self.key_poll_interval, deadline, shutdown, liveness)? {
                return Ok(None);
            }
        }
    }

    /// Sleep until the next tick. Returns `true` on shutdown.
    fn pause(
        &self,
        interval: Duration,
        deadline: Option<Instant>,
        shutdown: &ShutdownSignal,
        liveness: &dyn NodeLiveness,
    ) -> Result<bool, FundingError> {
        if !liveness.is_alive() {
            return Err(FundingError::NodeExited);
        }

        let sleep = match deadline {
            Some(deadline) => {
                let now = Instant::now();
                if now >= deadline {
                    return Err(self.timeout_error());
                }
                interval.min(deadline - now)
            }
            None => interval,
        };

        Ok(shutdown.wait_timeout(sleep))
    }

    fn timeout_error(&self) -> FundingError {
        match self.policy {
            WaitPolicy::Timeout(limit) => FundingError::Timeout(limit),
            WaitPolicy::Unbounded => FundingError::Timeout(Duration::ZERO),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{NetworkError, NetworkResult};
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::fs;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::thread;
    use tempfile::TempDir;

    const KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    /// Returns scripted balances; repeats the last one when exhausted.
    struct ScriptedSource {
        script: Mutex<VecDeque<NetworkResult<U256>>>,
        last: Mutex<U256>,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(script: Vec<NetworkResult<U256>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                last: Mutex::new(U256::ZERO),
                calls: AtomicUsize::new(0),
            }
        }

        fn balances(values: &[u64]) -> Self {
            Self::new(values.iter().map(|v| Ok(U256::from(*v))).collect())
        }
    }

    impl BalanceSource for ScriptedSource {
        fn balance_of(&self, _address: Address) -> NetworkResult<U256> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.script.lock().unwrap().pop_front() {
                Some(Ok(balance)) => {
                    *self.last.lock().unwrap() = balance;
                    Ok(balance)
                }
                Some(Err(e)) => Err(e),
                None => Ok(*self.last.lock().unwrap()),
            }
        }
    }

    struct Alive(AtomicBool);

    impl Alive {
        fn yes() -> Self {
            Self(AtomicBool::new(true))
        }
    }

    impl NodeLiveness for Alive {
        fn is_alive(&self) -> bool {
            self.0.load(Ordering::SeqCst)
        }
    }

    #[derive(Default)]
    struct Recorder(RefCell<Vec<FundingEvent>>);

    impl FundingObserver for Recorder {
        fn on_event(&self, event: &FundingEvent) {
            self.0.borrow_mut().push(event.clone());
        }
    }

    impl Recorder {
        fn count(&self, pred: impl Fn(&FundingEvent) -> bool) -> usize {
            self.0.borrow().iter().filter(|e| pred(e)).count()
        }
    }

    fn key_dir() -> (TempDir, PathBuf) {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("key");
        fs::write(&path, KEY).unwrap();
        (temp, path)
    }

    fn fast<'a, B: BalanceSource>(source: &'a B, key: &Path) -> FundingWaiter<'a, B> {
        FundingWaiter::new(source, key)
            .poll_interval(Duration::from_millis(1))
            .key_poll_interval(Duration::from_millis(5))
    }

    #[test]
    fn test_zero_zero_five_funds_on_third_poll() {
        let (_temp, key) = key_dir();
        let source = ScriptedSource::balances(&[0, 0, 5]);
        let recorder = Recorder::default();
        let mut waiter = fast(&source, &key);

        let outcome = waiter
            .wait(&ShutdownSignal::new(), &Alive::yes(), &recorder)
            .unwrap();

        let FundingOutcome::Funded { balance, .. } = outcome else {
            panic!("expected funded");
        };
        assert_eq!(balance, U256::from(5));
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
        assert_eq!(
            recorder.count(|e| matches!(e, FundingEvent::Waiting { .. })),
            2
        );
        assert_eq!(
            recorder.count(|e| matches!(e, FundingEvent::Funded { .. })),
            1
        );
        assert!(matches!(
            recorder.0.borrow().last(),
            Some(FundingEvent::Funded { .. })
        ));
        assert!(matches!(waiter.state(), FundingState::Funded { .. }));
    }

    #[test]
    fn test_one_wei_is_enough() {
        let (_temp, key) = key_dir();
        let source = ScriptedSource::balances(&[1]);
        let mut waiter = fast(&source, &key);

        let outcome = waiter
            .wait(&ShutdownSignal::new(), &Alive::yes(), &Recorder::default())
            .unwrap();
        assert!(matches!(outcome, FundingOutcome::Funded { balance, .. } if balance == U256::from(1)));
    }

    #[test]
    fn test_zero_balance_never_funds() {
        let (_temp, key) = key_dir();
        let source = ScriptedSource::balances(&[0]);
        let recorder = Recorder::default();
        let mut waiter = fast(&source, &key).policy(WaitPolicy::Timeout(Duration::from_millis(50)));

        let err = waiter
            .wait(&ShutdownSignal::new(), &Alive::yes(), &recorder)
            .unwrap_err();

        assert!(matches!(err, FundingError::Timeout(_)));
        assert_eq!(
            recorder.count(|e| matches!(e, FundingEvent::Funded { .. })),
            0
        );
        assert!(matches!(
            waiter.state(),
            FundingState::PollingBalance {
                last_balance: Some(b),
                ..
            } if *b == U256::ZERO
        ));
    }

    #[test]
    fn test_query_failure_is_retried() {
        let (_temp, key) = key_dir();
        let source = ScriptedSource::new(vec![
            Err(NetworkError::Unreachable {
                url: "http://rpc".to_string(),
                reason: "connection refused".to_string(),
            }),
            Ok(U256::from(7)),
        ]);
        let recorder = Recorder::default();

        let outcome = fast(&source, &key)
            .wait(&ShutdownSignal::new(), &Alive::yes(), &recorder)
            .unwrap();

        assert!(matches!(outcome, FundingOutcome::Funded { .. }));
        assert_eq!(
            recorder.count(|e| matches!(e, FundingEvent::QueryFailed { .. })),
            1
        );
    }

    #[test]
    fn test_waits_for_key_file() {
        let temp = TempDir::new().unwrap();
        let key = temp.path().join("key");
        let source = ScriptedSource::balances(&[3]);
        let recorder = Recorder::default();

        let writer = {
            let key = key.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(50));
                fs::write(key, KEY).unwrap();
            })
        };

        let outcome = fast(&source, &key)
            .wait(&ShutdownSignal::new(), &Alive::yes(), &recorder)
            .unwrap();
        writer.join().unwrap();

        assert!(matches!(outcome, FundingOutcome::Funded { .. }));
        let events = recorder.0.borrow();
        assert!(matches!(events[0], FundingEvent::WaitingForKey { .. }));
        assert!(matches!(events[1], FundingEvent::AccountReady { .. }));
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, FundingEvent::WaitingForKey { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn test_shutdown_cancels_polling() {
        let (_temp, key) = key_dir();
        let source = ScriptedSource::balances(&[0]);
        let shutdown = ShutdownSignal::new();
        let trigger = shutdown.clone();

        let signaller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            trigger.trigger();
        });

        let mut waiter = FundingWaiter::new(&source, &key).poll_interval(Duration::from_secs(60));
        let started = Instant::now();
        let outcome = waiter
            .wait(&shutdown, &Alive::yes(), &Recorder::default())
            .unwrap();
        signaller.join().unwrap();

        assert!(matches!(outcome, FundingOutcome::Cancelled));
        assert!(started.elapsed() < Duration::from_secs(30));
    }

    #[test]
    fn test_node_exit_aborts_wait() {
        let (_temp, key) = key_dir();
        let source = ScriptedSource::balances(&[0]);
        let dead = Alive(AtomicBool::new(false));

        let err = fast(&source, &key)
            .wait(&ShutdownSignal::new(), &dead, &Recorder::default())
            .unwrap_err();
        assert!(matches!(err, FundingError::NodeExited));
    }

    #[test]
    fn test_wait_policy_from_secs() {
        assert_eq!(WaitPolicy::from_timeout_secs(0), WaitPolicy::Unbounded);
        assert_eq!(
            WaitPolicy::from_timeout_secs(90),
            WaitPolicy::Timeout(Duration::from_secs(90))
        );
    }
}
