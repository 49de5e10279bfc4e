//! A two-player battleships coordinator: one server hosts successive games
//! between two client sessions that talk to it only through a shared state
//! store and a set of blocking signals.

mod board;
pub mod bridge;
mod client;
mod common;
mod config;
pub mod console;
mod error;
mod game;
mod input;
mod logging;
pub mod prelude;
pub mod protocol;
mod registry;
mod server;
mod shared;
mod ship;
pub mod sync;
pub mod transport;

pub use board::*;
pub use client::*;
pub use common::*;
pub use config::*;
pub use error::*;
pub use game::*;
pub use input::*;
pub use logging::init_logging;
pub use protocol::*;
pub use registry::*;
pub use server::*;
pub use shared::*;
pub use ship::*;
pub use sync::{Shutdown, SyncError, SyncSet};
pub use transport::tcp::TcpTransport;
