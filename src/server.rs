//! Hosting loop: one game per iteration until shutdown.

use std::sync::Arc;

use tokio::sync::watch;

use crate::error::ServerError;
use crate::game::{Game, GameReport, Phase};
use crate::registry::Registry;
use crate::sync::Shutdown;

/// Observable progress of a [`GameServer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerStatus {
    /// 1-based number of the game being hosted, 0 before the first one.
    pub game: u64,
    pub phase: Phase,
}

pub struct GameServer {
    registry: Registry,
    name: String,
    shutdown: Shutdown,
    status: Arc<watch::Sender<ServerStatus>>,
}

impl GameServer {
    pub fn new(registry: Registry, name: impl Into<String>, shutdown: Shutdown) -> Self {
        let (status, _) = watch::channel(ServerStatus {
            game: 0,
            phase: Phase::Finished,
        });
        Self {
            registry,
            name: name.into(),
            shutdown,
            status: Arc::new(status),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Follow the server's game counter and phase.
    pub fn subscribe(&self) -> watch::Receiver<ServerStatus> {
        self.status.subscribe()
    }

    /// Host a single game: create its resources, run it, release them.
    pub async fn host_game(&self) -> Result<GameReport, ServerError> {
        if self.shutdown.is_triggered() {
            return Err(ServerError::Terminated);
        }
        let session = self.registry.host(&self.name, self.shutdown.clone())?;
        let game_no = self.status.borrow().game + 1;
        log::info!("New game");

        let status = self.status.clone();
        let mut game = Game::new(session).with_phase_observer(move |phase| {
            status.send_replace(ServerStatus {
                game: game_no,
                phase,
            });
        });
        let result = game.run().await;
        self.registry.release(&self.name);

        match &result {
            Ok(report) => log::info!(
                "Game {} over after {} turns: {:?}",
                game_no,
                report.turns,
                report.result
            ),
            Err(err) => log::error!("Game {} failed: {}", game_no, err),
        }
        result
    }

    /// Host games back to back. Only returns on shutdown or a fatal error.
    pub async fn run(&self) -> Result<(), ServerError> {
        loop {
            self.host_game().await?;
        }
    }
}
