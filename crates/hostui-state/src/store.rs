use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::agent_state::AgentState;
use crate::app_state::AppState;

/// Session-wide holder of the view-state snapshot.
///
/// Cloning shares the same underlying state. Writers are the state-sync
/// adapter and the page load hooks; the push channel only reads.
#[derive(Debug, Clone, Default)]
pub struct AppStateStore {
    app: Arc<RwLock<AppState>>,
    agents: Arc<RwLock<AgentState>>,
}

impl AppStateStore {
    pub fn new(initial: AppState) -> Self {
        Self {
            app: Arc::new(RwLock::new(initial)),
            agents: Arc::new(RwLock::new(AgentState::default())),
        }
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, AppState> {
        self.app.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, AppState> {
        self.app.write().await
    }

    /// Owned copy of the current app state.
    pub async fn snapshot(&self) -> AppState {
        self.app.read().await.clone()
    }

    pub async fn agents(&self) -> RwLockReadGuard<'_, AgentState> {
        self.agents.read().await
    }

    pub async fn agents_mut(&self) -> RwLockWriteGuard<'_, AgentState> {
        self.agents.write().await
    }
}
