//! In-memory session store holding each visitor's API credentials.
//!
//! Sessions are identified by a random id carried in a cookie and expire
//! after a fixed TTL. Nothing is written to disk; a restart forgets all
//! credentials.

use std::collections::HashMap;
use std::time::Duration;

use axum::http::{header, HeaderMap};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::datasource::Credentials;
use crate::domain::TimeMs;

pub const SESSION_COOKIE: &str = "fd_session";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn random() -> Self {
        SessionId(Uuid::new_v4())
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(SessionId)
    }

    /// Session id from the request's `Cookie` headers, if present and well-formed.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == SESSION_COOKIE)
            .and_then(|(_, value)| Self::parse(value))
    }

    /// `Set-Cookie` value binding this id to the browser for `ttl`.
    pub fn cookie(&self, ttl: Duration) -> String {
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            SESSION_COOKIE,
            self.0,
            ttl.as_secs()
        )
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct Entry {
    credentials: Option<Credentials>,
    expires_at: TimeMs,
}

#[derive(Debug)]
pub struct SessionStore {
    entries: RwLock<HashMap<SessionId, Entry>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn expiry_from(&self, now: TimeMs) -> TimeMs {
        TimeMs::new(now.as_ms().saturating_add(self.ttl.as_millis() as i64))
    }

    /// Credentials stored for `id`, if the session is live.
    pub async fn get(&self, id: SessionId) -> Option<Credentials> {
        self.get_at(id, TimeMs::now()).await
    }

    pub async fn get_at(&self, id: SessionId, now: TimeMs) -> Option<Credentials> {
        {
            let entries = self.entries.read().await;
            match entries.get(&id) {
                Some(entry) if entry.expires_at > now => return entry.credentials.clone(),
                Some(_) => {}
                None => return None,
            }
        }
        // Expired: evict.
        self.entries.write().await.remove(&id);
        None
    }

    /// Store credentials, starting a new session when `id` is absent or
    /// expired. Returns the id now holding them.
    pub async fn set_credentials(&self, id: Option<SessionId>, creds: Credentials) -> SessionId {
        self.set_credentials_at(id, creds, TimeMs::now()).await
    }

    pub async fn set_credentials_at(
        &self,
        id: Option<SessionId>,
        creds: Credentials,
        now: TimeMs,
    ) -> SessionId {
        let mut entries = self.entries.write().await;
        let id = match id {
            Some(id) if entries.get(&id).is_some_and(|e| e.expires_at > now) => id,
            _ => SessionId::random(),
        };
        entries.insert(
            id,
            Entry {
                credentials: Some(creds),
                expires_at: self.expiry_from(now),
            },
        );
        id
    }

    /// Forget the credentials of `id` while keeping the session.
    pub async fn clear_credentials(&self, id: SessionId) {
        if let Some(entry) = self.entries.write().await.get_mut(&id) {
            entry.credentials = None;
        }
    }

    /// Drop every expired session. Returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        self.purge_expired_at(TimeMs::now()).await
    }

    pub async fn purge_expired_at(&self, now: TimeMs) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, e| e.expires_at > now);
        before - entries.len()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
