//! Commonly used types and utilities for ease of import.

pub use crate::{
    ClientSession, GameServer, Outcome, Registry, Shutdown, DEFAULT_GAME_NAME,
};

pub use crate::console::{BotConsole, Console, ScriptedConsole, StdConsole};
pub use crate::transport::{in_memory::InMemoryTransport, tcp::TcpTransport, Transport};
