//! Child process ownership and the idempotent cleanup routine.

use std::fs::File;
use std::io;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::launch::LaunchSpec;
use super::SupervisorError;

/// Time the node gets to exit after SIGTERM before it is killed.
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Interval for `try_wait` polling.
const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Externally visible lifecycle of the node process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    /// `start` has not been called.
    NotStarted,
    /// The process is being spawned.
    Starting,
    /// The process is alive.
    Running { pid: u32 },
    /// The process exited or was stopped, and has been reaped.
    Terminated { pid: u32 },
}

/// What a cleanup call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// No node was ever launched.
    NotStarted,
    /// Cleanup ran while the node was being spawned; it is stopped as soon
    /// as the spawn returns.
    LaunchCancelled,
    /// The node had already exited (or an earlier cleanup stopped it).
    /// No signal was sent.
    AlreadyExited,
    /// The node was signalled and reaped. `forced` is true when it ignored
    /// SIGTERM for the whole grace period and had to be killed.
    Stopped { pid: u32, forced: bool },
}

/// Anything that can report whether the node is still alive.
pub trait NodeLiveness {
    fn is_alive(&self) -> bool;
}

enum Slot {
    Empty,
    Starting { cancelled: bool },
    Running(Child),
    Terminated {
        pid: u32,
        status: Option<ExitStatus>,
        /// Stopped by cleanup rather than exiting on its own.
        stopped: bool,
    },
}

struct Shared {
    slot: Mutex<Slot>,
    grace: Duration,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Slot> {
        // A panic while holding the lock must not prevent cleanup.
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn cleanup(&self) -> CleanupOutcome {
        let mut slot = self.lock();

        match &mut *slot {
            Slot::Empty => CleanupOutcome::NotStarted,
            Slot::Starting { cancelled } => {
                *cancelled = true;
                CleanupOutcome::LaunchCancelled
            }
            Slot::Terminated { .. } => CleanupOutcome::AlreadyExited,
            Slot::Running(child) => {
                let pid = child.id();
                match child.try_wait() {
                    Ok(Some(status)) => {
                        debug!(pid, %status, "Node already exited, nothing to stop");
                        *slot = Slot::Terminated {
                            pid,
                            status: Some(status),
                            stopped: false,
                        };
                        CleanupOutcome::AlreadyExited
                    }
                    _ => {
                        let (status, forced) = stop_child(child, self.grace);
                        *slot = Slot::Terminated {
                            pid,
                            status,
                            stopped: true,
                        };
                        CleanupOutcome::Stopped { pid, forced }
                    }
                }
            }
        }
    }
}

/// Owns the node child process.
///
/// Dropping the supervisor stops the node, so every exit path of the
/// orchestrator (normal return, error, unwinding panic) releases it.
pub struct ProcessSupervisor {
    shared: Arc<Shared>,
}

impl Default for ProcessSupervisor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ProcessSupervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessSupervisor")
            .field("state", &self.state())
            .field("grace", &self.shared.grace)
            .finish()
    }
}

impl ProcessSupervisor {
    pub fn new() -> Self {
        Self::with_grace(DEFAULT_SHUTDOWN_GRACE)
    }

    /// Create a supervisor with a custom SIGTERM grace period.
    pub fn with_grace(grace: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                slot: Mutex::new(Slot::Empty),
                grace,
            }),
        }
    }

    /// Handle that runs the same cleanup from another thread.
    pub fn cleanup_handle(&self) -> CleanupHandle {
        CleanupHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Spawn the node and return its pid.
    ///
    /// The child gets its own process group (Unix) or console group
    /// (Windows), so terminal interrupts reach only the orchestrator, which
    /// then stops the node itself.
    pub fn start(&self, spec: &LaunchSpec) -> Result<u32, SupervisorError> {
        let mut command = self.command(spec)?;

        {
            let mut slot = self.shared.lock();
            match &*slot {
                Slot::Empty => {}
                Slot::Running(child) => return Err(SupervisorError::AlreadyStarted(child.id())),
                Slot::Terminated { pid, .. } => return Err(SupervisorError::AlreadyStarted(*pid)),
                Slot::Starting { .. } => return Err(SupervisorError::AlreadyStarted(0)),
            }
            *slot = Slot::Starting { cancelled: false };
        }

        let spawned = command.spawn();

        let mut slot = self.shared.lock();
        let cancelled = matches!(&*slot, Slot::Starting { cancelled: true });

        let mut child = match spawned {
            Ok(child) => child,
            Err(source) => {
                *slot = Slot::Empty;
                return Err(if source.kind() == io::ErrorKind::NotFound {
                    SupervisorError::MissingExecutable(spec.program().to_path_buf())
                } else {
                    SupervisorError::Spawn {
                        program: spec.program().to_path_buf(),
                        source,
                    }
                });
            }
        };

        let pid = child.id();
        if cancelled {
            warn!(pid, "Shutdown requested during launch, stopping node");
            let (status, _) = stop_child(&mut child, self.shared.grace);
            *slot = Slot::Terminated {
                pid,
                status,
                stopped: true,
            };
        } else {
            info!(pid, program = %spec.program().display(), "Node started");
            *slot = Slot::Running(child);
        }

        Ok(pid)
    }

    fn command(&self, spec: &LaunchSpec) -> Result<Command, SupervisorError> {
        let mut command = Command::new(spec.program());
        command.args(spec.args()).stdin(Stdio::null());

        if let Some(path) = spec.log_file() {
            let open_err = |source| SupervisorError::NodeLog {
                path: path.to_path_buf(),
                source,
            };
            let stdout = File::options()
                .create(true)
                .append(true)
                .open(path)
                .map_err(open_err)?;
            let stderr = stdout.try_clone().map_err(open_err)?;
            command.stdout(stdout).stderr(stderr);
        }

        detach(&mut command);
        Ok(command)
    }

    pub fn state(&self) -> NodeState {
        match &*self.shared.lock() {
            Slot::Empty => NodeState::NotStarted,
            Slot::Starting { .. } => NodeState::Starting,
            Slot::Running(child) => NodeState::Running { pid: child.id() },
            Slot::Terminated { pid, .. } => NodeState::Terminated { pid: *pid },
        }
    }

    /// True once cleanup has stopped the node, as opposed to the node
    /// exiting on its own.
    pub fn was_stopped(&self) -> bool {
        matches!(&*self.shared.lock(), Slot::Terminated { stopped: true, .. })
    }

    pub fn pid(&self) -> Option<u32> {
        match self.state() {
            NodeState::Running { pid } | NodeState::Terminated { pid } => Some(pid),
            NodeState::NotStarted | NodeState::Starting => None,
        }
    }

    /// Block the calling thread until the node exits and return its status.
    ///
    /// Returns promptly after a concurrent cleanup stops the node.
    pub fn await_termination(&self) -> Result<ExitStatus, SupervisorError> {
        loop {
            {
                let mut slot = self.shared.lock();
                match &mut *slot {
                    Slot::Empty => return Err(SupervisorError::NotStarted),
                    Slot::Starting { .. } => {}
                    Slot::Terminated { status, .. } => {
                        return status.ok_or_else(|| {
                            SupervisorError::Wait(io::Error::other("exit status unavailable"))
                        });
                    }
                    Slot::Running(child) => {
                        let pid = child.id();
                        if let Some(status) = child.try_wait().map_err(SupervisorError::Wait)? {
                            info!(pid, %status, "Node exited");
                            *slot = Slot::Terminated {
                                pid,
                                status: Some(status),
                                stopped: false,
                            };
                            return Ok(status);
                        }
                    }
                }
            }
            thread::sleep(WAIT_POLL_INTERVAL * 2);
        }
    }

    /// Stop the node now. Same routine as the signal handler and `Drop`.
    pub fn shutdown(&self) -> CleanupOutcome {
        self.shared.cleanup()
    }
}

impl NodeLiveness for ProcessSupervisor {
    fn is_alive(&self) -> bool {
        let mut slot = self.shared.lock();
        match &mut *slot {
            Slot::Starting { .. } => true,
            Slot::Empty | Slot::Terminated { .. } => false,
            Slot::Running(child) => match child.try_wait() {
                Ok(None) => true,
                Ok(Some(status)) => {
                    let pid = child.id();
                    warn!(pid, %status, "Node exited unexpectedly");
                    *slot = Slot::Terminated {
                        pid,
                        status: Some(status),
                        stopped: false,
                    };
                    false
                }
                // Can't tell; assume alive and let the next check decide.
                Err(_) => true,
            },
        }
    }
}

impl Drop for ProcessSupervisor {
    fn drop(&mut self) {
        if let CleanupOutcome::Stopped { pid, forced } = self.shared.cleanup() {
            info!(pid, forced, "Node stopped on supervisor drop");
        }
    }
}

/// Cloneable handle that stops the supervised node from any thread.
#[derive(Clone)]
pub struct CleanupHandle {
    shared: Arc<Shared>,
}

impl CleanupHandle {
    /// Stop the node if it is running. Safe to call any number of times,
    /// concurrently with the supervisor's own waits.
    pub fn run(&self) -> CleanupOutcome {
        self.shared.cleanup()
    }
}

#[cfg(unix)]
fn detach(command: &mut Command) {
    use std::os::unix::process::CommandExt;
    command.process_group(0);
}

#[cfg(windows)]
fn detach(command: &mut Command) {
    use std::os::windows::process::CommandExt;
    const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;
    command.creation_flags(CREATE_NEW_PROCESS_GROUP);
}

#[cfg(not(any(unix, windows)))]
fn detach(_command: &mut Command) {}

/// Ask the child to exit, escalate after `grace`, and reap it.
fn stop_child(child: &mut Child, grace: Duration) -> (Option<ExitStatus>, bool) {
    let pid = child.id();

    if send_terminate(pid) {
        info!(pid, grace_secs = grace.as_secs(), "Sent SIGTERM to node");
        let deadline = Instant::now() + grace;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return (Some(status), false),
                Ok(None) if Instant::now() < deadline => thread::sleep(WAIT_POLL_INTERVAL),
                _ => break,
            }
        }
        warn!(pid, "Node ignored SIGTERM, killing");
    }

    force_kill(child);
    (child.wait().ok(), true)
}

/// Send SIGTERM to the child's process group. Returns false if no signal
/// could be delivered.
#[cfg(unix)]
fn send_terminate(pid: u32) -> bool {
    let Ok(pid) = libc::pid_t::try_from(pid) else {
        return false;
    };
    // SAFETY: kill(2) has no memory-safety preconditions. The child leads
    // its own process group (see `detach`), so -pid addresses that group.
    unsafe { libc::kill(-pid, libc::SIGTERM) == 0 || libc::kill(pid, libc::SIGTERM) == 0 }
}

#[cfg(not(unix))]
fn send_terminate(_pid: u32) -> bool {
    false
}

fn force_kill(child: &mut Child) {
    #[cfg(unix)]
    if let Ok(pid) = libc::pid_t::try_from(child.id()) {
        // SAFETY: see `send_terminate`.
        unsafe {
            libc::kill(-pid, libc::SIGKILL);
        }
    }
    if let Err(e) = child.kill() {
        debug!(pid = child.id(), error = %e, "kill after group SIGKILL");
    }
}
