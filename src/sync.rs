//! The synchronization set: five blocking signals that order every step of a
//! game, plus the shutdown token every wait observes.
//!
//! Each signal is a counting semaphore. The two turnstiles are addressed per
//! player so the player who joined first is always the one let through first.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{Notify, Semaphore};

use crate::shared::PlayerId;

/// Why a wait or signal did not complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    #[error("shutdown requested")]
    Shutdown,
    #[error("synchronization primitive `{0}` is closed")]
    Closed(&'static str),
}

/// Cancellation token shared by the server and every party blocked in its
/// protocol. Once triggered it stays triggered.
#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    inner: Arc<ShutdownInner>,
}

#[derive(Debug, Default)]
struct ShutdownInner {
    requested: AtomicBool,
    notify: Notify,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown and wake everyone waiting on it.
    pub fn trigger(&self) {
        self.inner.requested.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_triggered(&self) -> bool {
        self.inner.requested.load(Ordering::SeqCst)
    }

    /// Resolves once shutdown has been requested.
    pub async fn triggered(&self) {
        loop {
            // Register before checking the flag so a concurrent trigger is not lost.
            let notified = self.inner.notify.notified();
            if self.is_triggered() {
                return;
            }
            notified.await;
        }
    }
}

/// A named counting semaphore whose waits give up on shutdown.
#[derive(Debug)]
pub struct Signal {
    name: &'static str,
    sem: Semaphore,
}

impl Signal {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            sem: Semaphore::new(0),
        }
    }

    /// Release one waiter (or bank a permit for the next one).
    pub fn post(&self) -> Result<(), SyncError> {
        if self.sem.is_closed() {
            return Err(SyncError::Closed(self.name));
        }
        self.sem.add_permits(1);
        Ok(())
    }

    /// Block until a permit is available, consuming it.
    pub async fn wait(&self, shutdown: &Shutdown) -> Result<(), SyncError> {
        tokio::select! {
            biased;
            _ = shutdown.triggered() => Err(SyncError::Shutdown),
            permit = self.sem.acquire() => match permit {
                Ok(permit) => {
                    permit.forget();
                    Ok(())
                }
                Err(_) => Err(SyncError::Closed(self.name)),
            },
        }
    }

    /// Permits banked and not yet consumed.
    pub fn pending(&self) -> usize {
        self.sem.available_permits()
    }

    pub fn close(&self) {
        self.sem.close();
    }

    pub fn is_closed(&self) -> bool {
        self.sem.is_closed()
    }
}

/// The handshake fabric of one hosted game.
#[derive(Debug)]
pub struct SyncSet {
    join: Signal,
    place_turnstile: [Signal; 2],
    place_ready: Signal,
    action_turnstile: [Signal; 2],
    action_ready: Signal,
    shutdown: Shutdown,
}

impl SyncSet {
    pub fn new(shutdown: Shutdown) -> Self {
        Self {
            join: Signal::new("join"),
            place_turnstile: [
                Signal::new("placeTurnstile"),
                Signal::new("placeTurnstile"),
            ],
            place_ready: Signal::new("placeReady"),
            action_turnstile: [
                Signal::new("actionTurnstile"),
                Signal::new("actionTurnstile"),
            ],
            action_ready: Signal::new("actionReady"),
            shutdown,
        }
    }

    pub fn shutdown(&self) -> &Shutdown {
        &self.shutdown
    }

    // join

    pub fn signal_join(&self) -> Result<(), SyncError> {
        self.join.post()
    }

    pub async fn await_join(&self) -> Result<(), SyncError> {
        self.join.wait(&self.shutdown).await
    }

    /// Both seats are taken; late joiners are refused from here on.
    pub fn close_join(&self) {
        self.join.close();
    }

    pub fn join_closed(&self) -> bool {
        self.join.is_closed()
    }

    // placement

    pub fn open_placement(&self, player: PlayerId) -> Result<(), SyncError> {
        self.place_turnstile[player.index()].post()
    }

    pub async fn await_placement_turn(&self, player: PlayerId) -> Result<(), SyncError> {
        self.place_turnstile[player.index()].wait(&self.shutdown).await
    }

    pub fn signal_placed(&self) -> Result<(), SyncError> {
        self.place_ready.post()
    }

    pub async fn await_placed(&self) -> Result<(), SyncError> {
        self.place_ready.wait(&self.shutdown).await
    }

    // play

    /// Let `player` through: either to act or to read a resolved response.
    pub fn open_action(&self, player: PlayerId) -> Result<(), SyncError> {
        self.action_turnstile[player.index()].post()
    }

    pub async fn await_action_turn(&self, player: PlayerId) -> Result<(), SyncError> {
        self.action_turnstile[player.index()].wait(&self.shutdown).await
    }

    /// A move was submitted, or a response was consumed.
    pub fn signal_action_ready(&self) -> Result<(), SyncError> {
        self.action_ready.post()
    }

    pub async fn await_action_ready(&self) -> Result<(), SyncError> {
        self.action_ready.wait(&self.shutdown).await
    }

    /// Request shutdown: every party blocked in this set wakes with
    /// [`SyncError::Shutdown`].
    pub fn terminate(&self) {
        self.shutdown.trigger();
    }

    /// Close every primitive so stragglers fail fast instead of blocking.
    pub fn close(&self) {
        for signal in self.signals() {
            signal.close();
        }
    }

    fn signals(&self) -> [&Signal; 7] {
        [
            &self.join,
            &self.place_turnstile[0],
            &self.place_turnstile[1],
            &self.place_ready,
            &self.action_turnstile[0],
            &self.action_turnstile[1],
            &self.action_ready,
        ]
    }
}
