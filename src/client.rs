//! Client session: join, place a ship, then take turns until the game ends.

use std::sync::Arc;

use serde::Serialize;

use crate::board::TargetBoard;
use crate::common::Response;
use crate::console::Console;
use crate::error::{ResourceError, SessionError};
use crate::input::{parse_command, parse_placement, Command};
use crate::registry::{GameSession, Registry};
use crate::shared::PlayerId;
use crate::ship::Orientation;

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Won,
    Lost,
    /// The opponent gave up.
    WonByWalkover,
    GaveUp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionReport {
    pub outcome: Outcome,
    pub shots: usize,
    pub hits: usize,
}

/// The protocol step a session is in, so one that leaves early can still
/// finish it for the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Joined, waiting for the placement turnstile.
    AwaitingPlacement,
    /// Let through to place; the server waits on `placeReady`.
    Placing,
    /// Waiting for the action turnstile.
    AwaitingTurn,
    /// Holding the turn; the server waits on `actionReady`.
    Acting,
    /// Shot submitted, its response not yet delivered.
    AwaitingResponse,
    /// A response was delivered and must be acknowledged. `last` is set when
    /// it ends the game.
    Acknowledging { last: bool },
    Done,
}

/// One player's side of a hosted game.
///
/// A session dropped before the game ends forfeits in the background, see
/// [`ClientSession::abandon`].
pub struct ClientSession {
    session: Arc<GameSession>,
    player: PlayerId,
    view: TargetBoard,
    shots: usize,
    step: Step,
}

impl ClientSession {
    /// Attach to the game hosted under `name` and announce ourselves. Seats
    /// are handed out in call order, so the first caller is player 1.
    pub fn connect(registry: &Registry, name: &str) -> Result<Self, SessionError> {
        let session = registry.attach(name)?;
        if session.state().is_terminated() {
            return Err(SessionError::ServerTerminated);
        }
        if session.sync().join_closed() {
            return Err(ResourceError::GameFull(name.to_owned()).into());
        }
        let player = session
            .state()
            .claim_seat()
            .ok_or_else(|| ResourceError::GameFull(name.to_owned()))?;
        session.sync().signal_join()?;
        log::debug!("Joined `{}` as {}", session.name(), player);
        Ok(Self {
            session,
            player,
            view: TargetBoard::new(),
            shots: 0,
            step: Step::AwaitingPlacement,
        })
    }

    pub fn player(&self) -> PlayerId {
        self.player
    }

    pub fn view(&self) -> &TargetBoard {
        &self.view
    }

    /// Play the session to its end, talking to the player through `console`.
    pub async fn run<C>(&mut self, console: &mut C) -> Result<SessionReport, SessionError>
    where
        C: Console + ?Sized,
    {
        say(console, "Successfully joined. Waiting to place the ship ...").await?;
        self.place_ship(console).await?;
        let outcome = self.play(console).await?;
        Ok(SessionReport {
            outcome,
            shots: self.shots,
            hits: self.view.hits(),
        })
    }

    async fn place_ship<C>(&mut self, console: &mut C) -> Result<(), SessionError>
    where
        C: Console + ?Sized,
    {
        let sync = self.session.sync();
        sync.await_placement_turn(self.player).await?;
        self.step = Step::Placing;
        self.check_terminated()?;

        let mut menu =
            String::from("Please enter your ship position and orientation (format x y [0|1|2|3])");
        for orientation in Orientation::ALL {
            menu.push_str(&format!("\n{} = {}", orientation.code(), orientation));
        }
        say(console, &menu).await?;
        prompt(console, "Your position data: ").await?;
        let line = read(console).await?.unwrap_or_default();
        self.check_terminated()?;

        self.session.state().write_registration(parse_placement(&line));
        sync.signal_placed()?;
        self.step = Step::AwaitingTurn;
        Ok(())
    }

    async fn play<C>(&mut self, console: &mut C) -> Result<Outcome, SessionError>
    where
        C: Console + ?Sized,
    {
        let session = self.session.clone();
        let sync = session.sync();
        loop {
            sync.await_action_turn(self.player).await?;
            let notice = session.state().action().response;
            self.step = match notice {
                Some(Response::Lost | Response::Walkover) => Step::Acknowledging { last: true },
                _ => Step::Acting,
            };
            self.check_terminated()?;

            // A response waiting at the start of a turn is the opponent's final word.
            match notice {
                None => {}
                Some(Response::Lost) => {
                    say(console, "YOU LOST :(").await?;
                    sync.signal_action_ready()?;
                    self.step = Step::Done;
                    return Ok(Outcome::Lost);
                }
                Some(Response::Walkover) => {
                    say(console, "Your opponent gave up. YOU WON :)").await?;
                    sync.signal_action_ready()?;
                    self.step = Step::Done;
                    return Ok(Outcome::WonByWalkover);
                }
                other => return Err(SessionError::UnexpectedResponse(other)),
            }

            let command = self.ask_command(console).await?;
            self.check_terminated()?;
            let (x, y) = match command {
                Command::GiveUp => {
                    session.state().update_action(|a| a.give_up = true);
                    sync.signal_action_ready()?;
                    self.step = Step::Done;
                    say(console, "You gave up.").await?;
                    return Ok(Outcome::GaveUp);
                }
                Command::Shot { x, y } => (x, y),
            };
            session.state().update_action(|a| {
                a.x = x;
                a.y = y;
            });
            self.shots += 1;
            sync.signal_action_ready()?;
            self.step = Step::AwaitingResponse;

            sync.await_action_turn(self.player).await?;
            let response = session.state().action().response;
            self.step = Step::Acknowledging {
                last: response == Some(Response::Won),
            };
            self.check_terminated()?;
            let response = match response {
                Some(r @ (Response::Hit | Response::Miss | Response::Won)) => r,
                other => return Err(SessionError::UnexpectedResponse(other)),
            };
            self.view.record(x, y, response)?;
            let headline = match response {
                Response::Won => "***YOU WON***",
                Response::Hit => "IT'S A HIT!!!",
                _ => "it's a miss :(",
            };
            say(console, headline).await?;
            say(console, &self.view.to_string()).await?;
            sync.signal_action_ready()?;

            if response == Response::Won {
                self.step = Step::Done;
                return Ok(Outcome::Won);
            }
            self.step = Step::AwaitingTurn;
        }
    }

    /// Show the turn menu and read until a well-formed move arrives. End of
    /// input counts as giving up.
    async fn ask_command<C>(&mut self, console: &mut C) -> Result<Command, SessionError>
    where
        C: Console + ?Sized,
    {
        say(console, "\nIt's your turn!\nYOUR BOARD:").await?;
        say(console, &self.view.to_string()).await?;
        say(
            console,
            &format!(
                "Hits: {}\nPOSSIBLE OPTIONS:\n1. Enter position where to shoot (x y)\n2. Give up (q)",
                self.view.hits()
            ),
        )
        .await?;
        prompt(console, "Enter your input: ").await?;
        loop {
            let Some(line) = read(console).await? else {
                return Ok(Command::GiveUp);
            };
            if let Some(command) = parse_command(&line) {
                return Ok(command);
            }
            prompt(console, "Input invalid. Try again: ").await?;
        }
    }

    /// Finish the game as a forfeit: an empty placement if the ship is not
    /// placed yet, then giving up at the next turn. Responses still owed are
    /// acknowledged. Returns once the server needs nothing more from this
    /// player, or when the server terminates.
    pub async fn abandon(&mut self) -> Result<(), SessionError> {
        let step = std::mem::replace(&mut self.step, Step::Done);
        forfeit(&self.session, self.player, step).await
    }

    fn check_terminated(&self) -> Result<(), SessionError> {
        if self.session.state().is_terminated() {
            Err(SessionError::ServerTerminated)
        } else {
            Ok(())
        }
    }
}

impl Drop for ClientSession {
    fn drop(&mut self) {
        if self.step == Step::Done {
            return;
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            log::warn!(
                "{} left `{}` with no runtime to forfeit on",
                self.player,
                self.session.name()
            );
            return;
        };
        let (session, player, step) = (self.session.clone(), self.player, self.step);
        runtime.spawn(async move {
            if let Err(err) = forfeit(&session, player, step).await {
                log::debug!("Forfeit of {} cut short: {}", player, err);
            }
        });
    }
}

async fn forfeit(
    session: &GameSession,
    player: PlayerId,
    mut step: Step,
) -> Result<(), SessionError> {
    let (state, sync) = (session.state(), session.sync());
    if step != Step::Done {
        log::info!("{} leaves `{}` and forfeits", player, session.name());
    }
    loop {
        if step != Step::Done && state.is_terminated() {
            return Err(SessionError::ServerTerminated);
        }
        step = match step {
            Step::AwaitingPlacement => {
                sync.await_placement_turn(player).await?;
                Step::Placing
            }
            Step::Placing => {
                state.write_registration(parse_placement(""));
                sync.signal_placed()?;
                Step::AwaitingTurn
            }
            Step::AwaitingTurn => {
                sync.await_action_turn(player).await?;
                match state.action().response {
                    Some(Response::Lost | Response::Walkover) => Step::Acknowledging { last: true },
                    _ => Step::Acting,
                }
            }
            Step::Acting => {
                state.update_action(|a| a.give_up = true);
                sync.signal_action_ready()?;
                Step::Done
            }
            Step::AwaitingResponse => {
                sync.await_action_turn(player).await?;
                Step::Acknowledging {
                    last: state.action().response == Some(Response::Won),
                }
            }
            Step::Acknowledging { last } => {
                sync.signal_action_ready()?;
                if last {
                    Step::Done
                } else {
                    Step::AwaitingTurn
                }
            }
            Step::Done => return Ok(()),
        };
    }
}

async fn say<C: Console + ?Sized>(console: &mut C, text: &str) -> Result<(), SessionError> {
    console.write_line(text).await.map_err(SessionError::Console)
}

async fn prompt<C: Console + ?Sized>(console: &mut C, text: &str) -> Result<(), SessionError> {
    console.write(text).await.map_err(SessionError::Console)
}

async fn read<C: Console + ?Sized>(console: &mut C) -> Result<Option<String>, SessionError> {
    console.read_line().await.map_err(SessionError::Console)
}
