//! Process-wide shutdown flag that blocking waits can sleep on.

use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

/// One-way shutdown flag shared between the signal handler and the
/// orchestrator thread.
///
/// Waits on it return early once [`trigger`](Self::trigger) is called, so a
/// poll loop sleeping between RPC calls reacts to Ctrl+C immediately rather
/// than at its next tick.
#[derive(Clone, Default)]
pub struct ShutdownSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl std::fmt::Debug for ShutdownSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShutdownSignal")
            .field("triggered", &self.is_triggered())
            .finish()
    }
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown and wake every waiter. Repeated calls are harmless.
    pub fn trigger(&self) {
        let (flag, condvar) = &*self.inner;
        let mut triggered = flag.lock().unwrap_or_else(|e| e.into_inner());
        *triggered = true;
        condvar.notify_all();
    }

    pub fn is_triggered(&self) -> bool {
        let (flag, _) = &*self.inner;
        *flag.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Sleep for up to `timeout`.
    ///
    /// Returns `true` if shutdown was requested before or during the wait.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let (flag, condvar) = &*self.inner;
        let deadline = Instant::now() + timeout;
        let mut triggered = flag.lock().unwrap_or_else(|e| e.into_inner());

        while !*triggered {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            let (guard, _) = condvar
                .wait_timeout(triggered, deadline - now)
                .unwrap_or_else(|e| e.into_inner());
            triggered = guard;
        }

        *triggered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_wait_times_out_when_not_triggered() {
        let signal = ShutdownSignal::new();
        let start = Instant::now();

        assert!(!signal.wait_timeout(Duration::from_millis(50)));
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn test_trigger_wakes_waiter() {
        let signal = ShutdownSignal::new();
        let trigger = signal.clone();

        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            trigger.trigger();
        });

        let start = Instant::now();
        assert!(signal.wait_timeout(Duration::from_secs(10)));
        assert!(start.elapsed() < Duration::from_secs(5));
        handle.join().unwrap();
    }

    #[test]
    fn test_trigger_is_sticky() {
        let signal = ShutdownSignal::new();
        signal.trigger();
        signal.trigger();

        assert!(signal.is_triggered());
        assert!(signal.wait_timeout(Duration::ZERO));
    }
}
