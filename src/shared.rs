//! The shared state store: registration and game action records.
//!
//! Access is serialized by the [`SyncSet`](crate::sync::SyncSet) handshake.
//! The mutexes only make each read or write of a record atomic so no party
//! ever observes a half-written record.

use core::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::common::Response;
use crate::config::PLAYERS;

/// Position of a player in join order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    pub const BOTH: [PlayerId; PLAYERS] = [PlayerId::One, PlayerId::Two];

    pub fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(PlayerId::One),
            1 => Some(PlayerId::Two),
            _ => None,
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.index() + 1)
    }
}

/// Raw ship registration as typed by the client. Validation is the
/// server's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Registration {
    pub x: i32,
    pub y: i32,
    pub orientation: i32,
}

/// The single per-turn record exchanged during play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameAction {
    pub x: usize,
    pub y: usize,
    pub give_up: bool,
    /// `None` while a turn is open and nothing has been resolved yet.
    pub response: Option<Response>,
    pub terminated: bool,
}

/// Records shared by the server and both client sessions of one game.
#[derive(Debug, Default)]
pub struct SharedState {
    registration: Mutex<Registration>,
    action: Mutex<GameAction>,
    seats: Mutex<usize>,
}

impl SharedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registration(&self) -> Registration {
        *lock(&self.registration)
    }

    pub fn write_registration(&self, registration: Registration) {
        *lock(&self.registration) = registration;
    }

    pub fn action(&self) -> GameAction {
        *lock(&self.action)
    }

    /// Apply `f` to the action record in place.
    pub fn update_action<R>(&self, f: impl FnOnce(&mut GameAction) -> R) -> R {
        f(&mut lock(&self.action))
    }

    pub fn is_terminated(&self) -> bool {
        lock(&self.action).terminated
    }

    pub fn mark_terminated(&self) {
        lock(&self.action).terminated = true;
    }

    /// Take the next free seat in join order, or `None` once the game is full.
    pub fn claim_seat(&self) -> Option<PlayerId> {
        let mut seats = lock(&self.seats);
        let id = PlayerId::from_index(*seats)?;
        *seats += 1;
        Some(id)
    }

    /// Seats claimed so far.
    pub fn seats_taken(&self) -> usize {
        *lock(&self.seats)
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}
