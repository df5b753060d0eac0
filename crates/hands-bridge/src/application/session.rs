//! Session registry: per-connection state on top of the shared pipeline.
//!
//! Every WebSocket connection gets a [`Session`] when it opens.  The session
//! carries the connection's identity and the control output the page last
//! selected, and hands out the process-wide [`PipelineContext`].  Dropping
//! the session removes it from the registry, so a connection task that ends
//! early (or panics) never leaves a stale entry behind.
//!
//! # Connection lifecycle
//!
//! ```text
//! open() ──► select_output() / record_frame() per frame ──► drop
//! ```

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::info;
use uuid::Uuid;

use crate::application::pipeline::PipelineContext;

/// Snapshot of one connection's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub id: Uuid,
    pub peer: SocketAddr,
    /// Output device named by the most recent frame, empty if none.
    pub selected_output: String,
    pub frames_received: u64,
    pub frames_processed: u64,
}

/// All open connections plus the context they share.
pub struct SessionRegistry {
    context: Arc<PipelineContext>,
    sessions: Mutex<HashMap<Uuid, SessionInfo>>,
}

impl SessionRegistry {
    pub fn new(context: Arc<PipelineContext>) -> Self {
        Self {
            context,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn context(&self) -> &Arc<PipelineContext> {
        &self.context
    }

    /// Registers a new connection from `peer`.
    pub fn open(self: &Arc<Self>, peer: SocketAddr) -> Session {
        let id = Uuid::new_v4();
        self.entries().insert(
            id,
            SessionInfo {
                id,
                peer,
                selected_output: String::new(),
                frames_received: 0,
                frames_processed: 0,
            },
        );
        Session {
            id,
            registry: Arc::clone(self),
        }
    }

    /// Number of open connections.
    pub fn count(&self) -> usize {
        self.entries().len()
    }

    pub fn get(&self, id: Uuid) -> Option<SessionInfo> {
        self.entries().get(&id).cloned()
    }

    /// Snapshots of every open connection.
    pub fn all(&self) -> Vec<SessionInfo> {
        self.entries().values().cloned().collect()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<Uuid, SessionInfo>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update(&self, id: Uuid, f: impl FnOnce(&mut SessionInfo)) {
        if let Some(info) = self.entries().get_mut(&id) {
            f(info);
        }
    }
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("sessions", &self.count())
            .finish_non_exhaustive()
    }
}

/// Handle for one open connection.  Unregisters itself on drop.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    registry: Arc<SessionRegistry>,
}

impl Session {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn context(&self) -> &Arc<PipelineContext> {
        self.registry.context()
    }

    /// Records the output device named by the latest frame.
    ///
    /// Returns `true` when the selection changed.
    pub fn select_output(&self, name: &str) -> bool {
        let mut changed = false;
        self.registry.update(self.id, |info| {
            if info.selected_output != name {
                info.selected_output = name.to_string();
                changed = true;
            }
        });
        if changed {
            info!(session = %self.id, output = name, "control output selected");
        }
        changed
    }

    /// Counts one decoded frame and whether the scheduler let it through.
    pub fn record_frame(&self, processed: bool) {
        self.registry.update(self.id, |info| {
            info.frames_received += 1;
            if processed {
                info.frames_processed += 1;
            }
        });
    }

    pub fn info(&self) -> Option<SessionInfo> {
        self.registry.get(self.id)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.registry.entries().remove(&self.id);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
