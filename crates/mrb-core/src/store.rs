use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::warn;

use crate::domain::{ChatId, MessageId, UserId};
use crate::{errors::Error, Result};

/// Default retention window for sessions and routing links: two weeks.
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(14 * 24 * 60 * 60);

/// Latest known routing metadata for one user. One per user, latest-wins;
/// `chat_id` always identifies the chat through which outbound replies reach
/// that user.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
    pub chat_id: ChatId,
    pub last_routed_message_id: Option<MessageId>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: UserId, chat_id: ChatId) -> Self {
        Self {
            user_id,
            chat_id,
            last_routed_message_id: None,
            created_at: Utc::now(),
        }
    }
}

/// One-shot mapping from a forwarded-message id back to the originating
/// user message. Consumed on first match.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoutingLink {
    pub user_chat_id: ChatId,
    pub user_message_id: MessageId,
}

/// Access contract for the session store.
///
/// Implementations must give at least last-writer-wins semantics under
/// concurrent access, and must treat entries older than their retention
/// window as absent on read.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get_session(&self, user_id: UserId) -> Result<Option<Session>>;
    async fn put_session(&self, session: Session) -> Result<()>;

    async fn put_link(&self, forwarded: MessageId, link: RoutingLink) -> Result<()>;
    /// Remove and return the link for a forwarded message, if present and
    /// within the retention window.
    async fn take_link(&self, forwarded: MessageId) -> Result<Option<RoutingLink>>;
}

fn is_expired(created_at: DateTime<Utc>, retention: Duration) -> bool {
    Utc::now()
        .signed_duration_since(created_at)
        .to_std()
        .map(|age| age > retention)
        .unwrap_or(false)
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
struct LinkRecord {
    link: RoutingLink,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreState {
    sessions: HashMap<i64, Session>,
    links: HashMap<i32, LinkRecord>,
}

impl StoreState {
    /// Drop expired entries opportunistically; reads also filter, so this is
    /// only housekeeping.
    fn prune(&mut self, retention: Duration) {
        self.sessions
            .retain(|_, s| !is_expired(s.created_at, retention));
        self.links
            .retain(|_, l| !is_expired(l.created_at, retention));
    }

    fn get_session(&self, user_id: UserId, retention: Duration) -> Option<Session> {
        self.sessions
            .get(&user_id.0)
            .copied()
            .filter(|s| !is_expired(s.created_at, retention))
    }

    fn take_link(&mut self, forwarded: MessageId, retention: Duration) -> Option<RoutingLink> {
        self.links
            .remove(&forwarded.0)
            .filter(|l| !is_expired(l.created_at, retention))
            .map(|l| l.link)
    }
}

/// In-memory store. Used in tests and anywhere persistence across restarts
/// is not needed.
pub struct MemorySessionStore {
    retention: Duration,
    state: Mutex<StoreState>,
}

impl MemorySessionStore {
    pub fn new(retention: Duration) -> Self {
        Self {
            retention,
            state: Mutex::new(StoreState::default()),
        }
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_RETENTION)
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get_session(&self, user_id: UserId) -> Result<Option<Session>> {
        Ok(self.state.lock().await.get_session(user_id, self.retention))
    }

    async fn put_session(&self, session: Session) -> Result<()> {
        let mut st = self.state.lock().await;
        st.prune(self.retention);
        st.sessions.insert(session.user_id.0, session);
        Ok(())
    }

    async fn put_link(&self, forwarded: MessageId, link: RoutingLink) -> Result<()> {
        let mut st = self.state.lock().await;
        st.prune(self.retention);
        st.links.insert(
            forwarded.0,
            LinkRecord {
                link,
                created_at: Utc::now(),
            },
        );
        Ok(())
    }

    async fn take_link(&self, forwarded: MessageId) -> Result<Option<RoutingLink>> {
        Ok(self.state.lock().await.take_link(forwarded, self.retention))
    }
}

/// Store persisted as a JSON snapshot, rewritten on every mutation and loaded
/// at open. Durability is whatever the filesystem offers; an unreadable
/// snapshot starts the store empty rather than refusing to serve.
pub struct FileSessionStore {
    path: PathBuf,
    retention: Duration,
    state: Mutex<StoreState>,
}

impl FileSessionStore {
    pub fn open(path: impl Into<PathBuf>, retention: Duration) -> Result<Self> {
        let path = path.into();
        let state = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<StoreState>(&raw) {
                Ok(st) => st,
                Err(e) => {
                    warn!("session snapshot {} unreadable, starting empty: {e}", path.display());
                    StoreState::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoreState::default(),
            Err(e) => return Err(Error::Store(format!("open {}: {e}", path.display()))),
        };

        Ok(Self {
            path,
            retention,
            state: Mutex::new(state),
        })
    }

    fn persist(&self, state: &StoreState) -> Result<()> {
        let raw = serde_json::to_vec_pretty(state)
            .map_err(|e| Error::Store(format!("serialize sessions: {e}")))?;
        std::fs::write(&self.path, raw)
            .map_err(|e| Error::Store(format!("write {}: {e}", self.path.display())))
    }

    fn snapshot_path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn get_session(&self, user_id: UserId) -> Result<Option<Session>> {
        Ok(self.state.lock().await.get_session(user_id, self.retention))
    }

    async fn put_session(&self, session: Session) -> Result<()> {
        let mut st = self.state.lock().await;
        st.prune(self.retention);
        st.sessions.insert(session.user_id.0, session);
        self.persist(&st)
    }

    async fn put_link(&self, forwarded: MessageId, link: RoutingLink) -> Result<()> {
        let mut st = self.state.lock().await;
        st.prune(self.retention);
        st.links.insert(
            forwarded.0,
            LinkRecord {
                link,
                created_at: Utc::now(),
            },
        );
        self.persist(&st)
    }

    async fn take_link(&self, forwarded: MessageId) -> Result<Option<RoutingLink>> {
        let mut st = self.state.lock().await;
        let link = st.take_link(forwarded, self.retention);
        if link.is_some() {
            self.persist(&st)?;
        }
        Ok(link)
    }
}
