//! Error taxonomy shared by the server, client sessions and the bridge.

use crate::common::{BoardError, Response};
use crate::sync::SyncError;

/// The store or synchronization set could not be created or attached.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResourceError {
    #[error("no game is hosted under `{0}`; start the server first")]
    NotHosted(String),
    #[error("a game is already hosted under `{0}`")]
    AlreadyHosted(String),
    #[error("game `{0}` already has two players")]
    GameFull(String),
}

/// Fatal conditions observed by a client session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Resource(#[from] ResourceError),
    #[error("server terminated unexpectedly")]
    ServerTerminated,
    #[error("synchronization failed: {0}")]
    Sync(SyncError),
    #[error("unexpected response from server: {0:?}")]
    UnexpectedResponse(Option<Response>),
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error("console failure: {0:#}")]
    Console(anyhow::Error),
}

impl From<SyncError> for SessionError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::Shutdown => SessionError::ServerTerminated,
            other => SessionError::Sync(other),
        }
    }
}

/// Reasons the server stops hosting.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Resource(#[from] ResourceError),
    #[error("shutdown requested")]
    Terminated,
    #[error("synchronization failed: {0}")]
    Sync(SyncError),
}

impl From<SyncError> for ServerError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::Shutdown => ServerError::Terminated,
            other => ServerError::Sync(other),
        }
    }
}
