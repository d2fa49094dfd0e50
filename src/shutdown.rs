//! Cooperative shutdown for the writer pool.
//!
//! [`ShutdownFlag`] is the cancellation token writers poll between writes.
//! [`CompletionBarrier`] counts writers that have not yet drained: every
//! writer holds a [`CompletionGuard`] whose drop marks it as done, and
//! [`CompletionBarrier::wait`] blocks until all guards are gone.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread;

use anyhow::{Context, Result};
use tracing::info;

/// One-directional cancellation token shared by the pool.
///
/// Once set it stays set; a draining pool cannot be resumed.
#[derive(Clone, Debug, Default)]
pub struct ShutdownFlag(Arc<AtomicBool>);

impl ShutdownFlag {
    /// Creates an unset flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests shutdown.
    pub fn set(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns `true` once shutdown has been requested.
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Countdown of writers that have not yet drained.
///
/// Cloning the barrier shares the countdown, like the writers' other shared
/// state.
#[derive(Clone, Debug)]
pub struct CompletionBarrier {
    state: Arc<BarrierState>,
}

#[derive(Debug)]
struct BarrierState {
    remaining: Mutex<usize>,
    drained: Condvar,
}

impl CompletionBarrier {
    /// Creates a barrier expecting `writers` guards.
    pub fn new(writers: usize) -> Self {
        Self {
            state: Arc::new(BarrierState {
                remaining: Mutex::new(writers),
                drained: Condvar::new(),
            }),
        }
    }

    /// Hands out the guard for one writer.
    ///
    /// Exactly one guard must be taken per writer the barrier was created
    /// for; the guard's drop is what counts the writer as drained.
    pub fn guard(&self) -> CompletionGuard {
        CompletionGuard {
            state: Arc::clone(&self.state),
        }
    }

    /// Blocks until every guard has been dropped.
    pub fn wait(&self) {
        let mut remaining = self.state.remaining.lock().unwrap();
        while *remaining > 0 {
            remaining = self.state.drained.wait(remaining).unwrap();
        }
    }
}

impl BarrierState {
    fn complete_one(&self) {
        let mut remaining = self.remaining.lock().unwrap();
        *remaining = remaining.checked_sub(1).expect("more guards than writers");
        if *remaining == 0 {
            self.drained.notify_all();
        }
    }
}

/// Marks one writer as drained when dropped.
///
/// Dropping is the only way to count down, so a writer is counted exactly
/// once no matter how it exits.
#[derive(Debug)]
pub struct CompletionGuard {
    state: Arc<BarrierState>,
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        self.state.complete_one();
    }
}

/// Spawns a background thread that sets `flag` when the process receives
/// SIGINT or SIGTERM.
pub fn listen_for_termination(flag: ShutdownFlag) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build the signal runtime")?;

    thread::Builder::new()
        .name("signal-listener".into())
        .spawn(move || {
            runtime.block_on(termination_signal());
            info!("termination signal received; draining writers");
            flag.set();
        })
        .context("failed to spawn the signal listener")?;

    Ok(())
}

async fn termination_signal() {
    let interrupt = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install the SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install the SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => {}
        _ = terminate => {}
    }
}
