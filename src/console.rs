//! Line-oriented consoles a client session talks to.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin, Stdout};

use crate::config::DIMENSION;
use crate::protocol::Message;
use crate::transport::Transport;

#[async_trait::async_trait]
pub trait Console: Send {
    /// Write `text` as is (prompts carry no newline).
    async fn write(&mut self, text: &str) -> anyhow::Result<()>;

    /// Next input line without its terminator, `None` at end of input.
    async fn read_line(&mut self) -> anyhow::Result<Option<String>>;

    async fn write_line(&mut self, line: &str) -> anyhow::Result<()> {
        self.write(&format!("{}\n", line)).await
    }
}

/// The process terminal.
pub struct StdConsole {
    input: Lines<BufReader<Stdin>>,
    output: Stdout,
}

impl StdConsole {
    pub fn new() -> Self {
        Self {
            input: BufReader::new(tokio::io::stdin()).lines(),
            output: tokio::io::stdout(),
        }
    }
}

impl Default for StdConsole {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Console for StdConsole {
    async fn write(&mut self, text: &str) -> anyhow::Result<()> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.flush().await?;
        Ok(())
    }

    async fn read_line(&mut self) -> anyhow::Result<Option<String>> {
        Ok(self.input.next_line().await?)
    }
}

/// Feeds canned input lines and records everything written.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    input: VecDeque<String>,
    transcript: Arc<Mutex<String>>,
}

impl ScriptedConsole {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: lines.into_iter().map(Into::into).collect(),
            transcript: Arc::default(),
        }
    }

    /// Shared handle to the output written so far.
    pub fn transcript(&self) -> Arc<Mutex<String>> {
        self.transcript.clone()
    }

    pub fn output(&self) -> String {
        self.transcript
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait::async_trait]
impl Console for ScriptedConsole {
    async fn write(&mut self, text: &str) -> anyhow::Result<()> {
        self.transcript
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_str(text);
        Ok(())
    }

    async fn read_line(&mut self) -> anyhow::Result<Option<String>> {
        Ok(self.input.pop_front())
    }
}

/// Plays by itself: a random valid placement, then every cell once in random
/// order, giving up when it runs out of targets.
pub struct BotConsole {
    rng: SmallRng,
    placed: bool,
    targets: Vec<(usize, usize)>,
}

impl BotConsole {
    pub fn new(seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut targets: Vec<_> = (0..DIMENSION)
            .flat_map(|x| (0..DIMENSION).map(move |y| (x, y)))
            .collect();
        targets.shuffle(&mut rng);
        Self {
            rng,
            placed: false,
            targets,
        }
    }
}

#[async_trait::async_trait]
impl Console for BotConsole {
    async fn write(&mut self, _text: &str) -> anyhow::Result<()> {
        Ok(())
    }

    async fn read_line(&mut self) -> anyhow::Result<Option<String>> {
        if !self.placed {
            self.placed = true;
            // Centers away from the edge fit every orientation.
            let x = self.rng.random_range(1..DIMENSION - 1);
            let y = self.rng.random_range(1..DIMENSION - 1);
            let orientation = self.rng.random_range(0..4u8);
            return Ok(Some(format!("{} {} {}", x, y, orientation)));
        }
        Ok(Some(match self.targets.pop() {
            Some((x, y)) => format!("{} {}", x, y),
            None => "q".to_owned(),
        }))
    }
}

/// A console whose terminal sits on the far side of a [`Transport`].
///
/// Once the transport fails or the terminal answers out of turn, the console
/// counts as disconnected: writes are dropped and reads report end of input, so the session winds down the same
/// way it would for a player who closed their input.
pub struct RemoteConsole<T: Transport> {
    transport: T,
    connected: bool,
}

impl<T: Transport> RemoteConsole<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            connected: true,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn into_inner(self) -> T {
        self.transport
    }

    fn disconnect(&mut self, err: anyhow::Error) {
        if self.connected {
            log::warn!("Remote terminal lost: {:#}", err);
            self.connected = false;
        }
    }
}

#[async_trait::async_trait]
impl<T: Transport> Console for RemoteConsole<T> {
    async fn write(&mut self, text: &str) -> anyhow::Result<()> {
        if !self.connected {
            return Ok(());
        }
        let msg = Message::Output {
            text: text.to_owned(),
        };
        if let Err(e) = self.transport.send(msg).await {
            self.disconnect(e);
        }
        Ok(())
    }

    async fn read_line(&mut self) -> anyhow::Result<Option<String>> {
        if !self.connected {
            return Ok(None);
        }
        if let Err(e) = self.transport.send(Message::InputRequest).await {
            self.disconnect(e);
            return Ok(None);
        }
        match self.transport.recv().await {
            Ok(Message::Input { line }) => Ok(line),
            Ok(other) => {
                self.disconnect(anyhow::anyhow!("Expected Input, got {:?}", other));
                Ok(None)
            }
            Err(e) => {
                self.disconnect(e);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_console_replays_and_records() {
        let mut console = ScriptedConsole::new(["1 1 0", "q"]);
        console.write_line("hello").await.unwrap();
        assert_eq!(console.read_line().await.unwrap().as_deref(), Some("1 1 0"));
        assert_eq!(console.read_line().await.unwrap().as_deref(), Some("q"));
        assert_eq!(console.read_line().await.unwrap(), None);
        assert_eq!(console.output(), "hello\n");
    }

    #[tokio::test]
    async fn bot_places_then_shoots_each_cell_once() {
        let mut bot = BotConsole::new(7);
        let placement = bot.read_line().await.unwrap().unwrap();
        assert_eq!(placement.split_whitespace().count(), 3);

        let mut seen = std::collections::HashSet::new();
        for _ in 0..DIMENSION * DIMENSION {
            let shot = bot.read_line().await.unwrap().unwrap();
            assert!(seen.insert(shot));
        }
        assert_eq!(bot.read_line().await.unwrap().as_deref(), Some("q"));
    }

    #[tokio::test]
    async fn remote_console_drops_terminal_answering_out_of_turn() {
        use crate::transport::in_memory::InMemoryTransport;

        let (near, mut far) = InMemoryTransport::pair();
        far.send(Message::Output { text: "hi".into() }).await.unwrap();
        let mut console = RemoteConsole::new(near);

        assert_eq!(console.read_line().await.unwrap(), None);
        assert!(!console.is_connected());
        assert_eq!(far.recv().await.unwrap(), Message::InputRequest);

        // Nothing more goes out once disconnected.
        console.write_line("ignored").await.unwrap();
        assert_eq!(console.read_line().await.unwrap(), None);
        drop(console);
        assert!(far.recv().await.is_err());
    }
}
