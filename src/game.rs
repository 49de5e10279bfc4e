//! Server-side game state machine: join, placement, play, finish.

use std::sync::Arc;

use crate::board::Board;
use crate::common::{Response, ShotOutcome};
use crate::config::{PLAYERS, WINNING_HITS};
use crate::error::ServerError;
use crate::registry::GameSession;
use crate::shared::PlayerId;
use crate::ship::ShipPlacement;

/// Where a hosted game currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingPlayers,
    AwaitingPlacement(PlayerId),
    Playing(PlayerId),
    Finished,
}

/// How a finished game was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    /// `winner` struck every ship cell of the opponent.
    Won { winner: PlayerId },
    /// The opponent of `winner` gave up.
    Walkover { winner: PlayerId },
}

impl GameResult {
    pub fn winner(&self) -> PlayerId {
        match *self {
            GameResult::Won { winner } | GameResult::Walkover { winner } => winner,
        }
    }
}

/// Summary of a finished game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameReport {
    pub result: GameResult,
    /// Turns played, give-up included.
    pub turns: usize,
    /// Hits scored by each player, in join order.
    pub hits: [usize; PLAYERS],
}

/// One hosted game. Owns both boards and drives the protocol over the
/// session's store and synchronization set.
pub struct Game {
    session: Arc<GameSession>,
    boards: [Board; PLAYERS],
    hits: [usize; PLAYERS],
    turns: usize,
    phase: Phase,
    on_phase: Box<dyn Fn(Phase) + Send + Sync>,
}

impl Game {
    pub fn new(session: Arc<GameSession>) -> Self {
        Self {
            session,
            boards: [Board::new(), Board::new()],
            hits: [0; PLAYERS],
            turns: 0,
            phase: Phase::AwaitingPlayers,
            on_phase: Box::new(|_| {}),
        }
    }

    /// Call `f` on every phase change.
    pub fn with_phase_observer(mut self, f: impl Fn(Phase) + Send + Sync + 'static) -> Self {
        self.on_phase = Box::new(f);
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn board(&self, player: PlayerId) -> &Board {
        &self.boards[player.index()]
    }

    /// Run the game to completion. On shutdown the terminated flag is set
    /// and every party blocked in the protocol is woken before returning.
    pub async fn run(&mut self) -> Result<GameReport, ServerError> {
        let result = self.run_phases().await;
        if let Err(err) = &result {
            log::warn!("Game aborted: {}", err);
            self.abort();
        }
        self.set_phase(Phase::Finished);
        result
    }

    async fn run_phases(&mut self) -> Result<GameReport, ServerError> {
        self.await_players().await?;
        self.await_placements().await?;
        let result = self.play().await?;
        Ok(GameReport {
            result,
            turns: self.turns,
            hits: self.hits,
        })
    }

    async fn await_players(&mut self) -> Result<(), ServerError> {
        self.set_phase(Phase::AwaitingPlayers);
        log::info!("Waiting for players to join ...");
        let sync = self.session.sync();
        for player in PlayerId::BOTH {
            sync.await_join().await?;
            log::info!("{} joined", player);
        }
        sync.close_join();
        Ok(())
    }

    async fn await_placements(&mut self) -> Result<(), ServerError> {
        for player in PlayerId::BOTH {
            self.set_phase(Phase::AwaitingPlacement(player));
            let sync = self.session.sync();
            sync.open_placement(player)?;
            sync.await_placed().await?;

            let raw = self.session.state().registration();
            let board = &mut self.boards[player.index()];
            match ShipPlacement::from_raw(raw.x, raw.y, raw.orientation) {
                Some(ship) if board.place(&ship) => {
                    log::debug!("{} placed {:?}", player, ship);
                }
                _ => log::debug!("{} sent an unusable placement {:?}; ignored", player, raw),
            }
            log::info!("-{}-\n{}", player.to_string().to_uppercase(), board);
        }
        Ok(())
    }

    async fn play(&mut self) -> Result<GameResult, ServerError> {
        let mut actor = PlayerId::One;
        loop {
            self.set_phase(Phase::Playing(actor));
            self.turns += 1;
            let opponent = actor.opponent();
            let state = self.session.state();
            let sync = self.session.sync();

            state.update_action(|a| {
                a.response = None;
                a.give_up = false;
            });
            sync.open_action(actor)?;
            sync.await_action_ready().await?;
            let action = state.action();

            if action.give_up {
                log::info!("Turn {}: {} gave up", self.turns, actor);
                self.deliver(opponent, Response::Walkover).await?;
                return Ok(GameResult::Walkover { winner: opponent });
            }

            let outcome = match self.boards[opponent.index()].shoot(action.x, action.y) {
                Ok(outcome) => outcome,
                Err(err) => {
                    log::warn!("{} fired off the board: {}", actor, err);
                    ShotOutcome::Miss
                }
            };
            if outcome == ShotOutcome::Hit {
                self.hits[actor.index()] += 1;
            }
            let won = self.hits[actor.index()] >= WINNING_HITS;
            log::info!(
                "Turn {}: {} shoots ({}, {}) -> {:?}",
                self.turns,
                actor,
                action.x,
                action.y,
                outcome
            );

            let response = if won { Response::Won } else { outcome.into() };
            self.deliver(actor, response).await?;
            if won {
                log::info!("{} won", actor);
                self.deliver(opponent, Response::Lost).await?;
                return Ok(GameResult::Won { winner: actor });
            }
            actor = opponent;
        }
    }

    /// Hand `response` to `player` and wait until it has been read.
    async fn deliver(&self, player: PlayerId, response: Response) -> Result<(), ServerError> {
        let sync = self.session.sync();
        self.session
            .state()
            .update_action(|a| a.response = Some(response));
        sync.open_action(player)?;
        sync.await_action_ready().await?;
        Ok(())
    }

    fn abort(&self) {
        self.session.state().mark_terminated();
        self.session.sync().terminate();
    }

    fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
        (self.on_phase)(phase);
    }
}
