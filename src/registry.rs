//! Resource naming: lets the server and both clients find the same store and
//! synchronization set by a well-known name.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::ResourceError;
use crate::shared::SharedState;
use crate::sync::{Shutdown, SyncSet};

/// Store plus synchronization set of one hosted game.
#[derive(Debug)]
pub struct GameSession {
    name: String,
    state: SharedState,
    sync: SyncSet,
}

impl GameSession {
    fn new(name: &str, shutdown: Shutdown) -> Self {
        Self {
            name: name.to_owned(),
            state: SharedState::new(),
            sync: SyncSet::new(shutdown),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    pub fn sync(&self) -> &SyncSet {
        &self.sync
    }
}

/// Name table of hosted games. Cloning shares the table.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    sessions: Arc<Mutex<HashMap<String, Arc<GameSession>>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create fresh resources under `name`. Fails if the name is taken.
    pub fn host(&self, name: &str, shutdown: Shutdown) -> Result<Arc<GameSession>, ResourceError> {
        let mut sessions = self.lock();
        if sessions.contains_key(name) {
            return Err(ResourceError::AlreadyHosted(name.to_owned()));
        }
        let session = Arc::new(GameSession::new(name, shutdown));
        sessions.insert(name.to_owned(), session.clone());
        log::debug!("Created game resources `{}`", name);
        Ok(session)
    }

    /// Open the resources hosted under `name`.
    pub fn attach(&self, name: &str) -> Result<Arc<GameSession>, ResourceError> {
        self.lock()
            .get(name)
            .cloned()
            .ok_or_else(|| ResourceError::NotHosted(name.to_owned()))
    }

    /// Unlink `name` and close its primitives. Parties still holding the
    /// session keep their handle but every further wait fails.
    pub fn release(&self, name: &str) -> Option<Arc<GameSession>> {
        let session = self.lock().remove(name)?;
        session.sync().close();
        log::debug!("Released game resources `{}`", name);
        Some(session)
    }

    pub fn is_hosted(&self, name: &str) -> bool {
        self.lock().contains_key(name)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<GameSession>>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_is_exclusive() {
        let registry = Registry::new();
        registry.host("g", Shutdown::new()).unwrap();
        assert_eq!(
            registry.host("g", Shutdown::new()).unwrap_err(),
            ResourceError::AlreadyHosted("g".into())
        );
    }

    #[test]
    fn attach_requires_host() {
        let registry = Registry::new();
        assert_eq!(
            registry.attach("g").unwrap_err(),
            ResourceError::NotHosted("g".into())
        );
        let hosted = registry.host("g", Shutdown::new()).unwrap();
        let attached = registry.attach("g").unwrap();
        assert!(Arc::ptr_eq(&hosted, &attached));
    }

    #[test]
    fn release_unlinks_and_closes() {
        let registry = Registry::new();
        let session = registry.host("g", Shutdown::new()).unwrap();
        registry.release("g").unwrap();
        assert!(!registry.is_hosted("g"));
        assert!(session.sync().join_closed());
        assert!(registry.release("g").is_none());
    }
}
