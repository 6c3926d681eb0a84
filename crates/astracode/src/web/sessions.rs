use astracode_core::codegen::SessionState;
use axum::http::{header, HeaderMap};
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

pub const SESSION_COOKIE: &str = "astracode_session";
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;
pub const DEFAULT_IDLE_MINUTES: u64 = 24 * 60;

struct Entry {
    state: Arc<Mutex<SessionState>>,
    last_seen: Instant,
}

/// In-memory session states keyed by session id.
///
/// Each session has its own lock, held for the whole of an action, so one
/// session handles one interaction at a time while other sessions proceed.
/// Sessions idle for longer than `idle_timeout` are dropped, and the store
/// never holds more than `capacity` sessions; the least recently used one is
/// evicted to make room.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<String, Entry>>>,
    capacity: usize,
    idle_timeout: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_SESSIONS,
            Duration::from_secs(DEFAULT_IDLE_MINUTES * 60),
        )
    }
}

impl SessionStore {
    pub fn new(capacity: usize, idle_timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            capacity: capacity.max(1),
            idle_timeout,
        }
    }

    /// An existing, unexpired session. Never creates one.
    pub async fn get(&self, id: &str) -> Option<Arc<Mutex<SessionState>>> {
        let mut sessions = self.sessions.lock().await;
        let now = Instant::now();
        let entry = sessions.get_mut(id)?;
        if now.duration_since(entry.last_seen) > self.idle_timeout {
            sessions.remove(id);
            return None;
        }
        entry.last_seen = now;
        Some(entry.state.clone())
    }

    /// The session for `id`, created empty when missing.
    pub async fn get_or_create(&self, id: &str) -> Arc<Mutex<SessionState>> {
        let mut sessions = self.sessions.lock().await;
        let now = Instant::now();

        if let Some(entry) = sessions.get_mut(id) {
            if now.duration_since(entry.last_seen) <= self.idle_timeout {
                entry.last_seen = now;
                return entry.state.clone();
            }
        }

        sessions.retain(|_, entry| now.duration_since(entry.last_seen) <= self.idle_timeout);
        while sessions.len() >= self.capacity {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(key, _)| key.clone());
            match oldest {
                Some(key) => {
                    log::debug!("Evicting session {key}");
                    sessions.remove(&key);
                }
                None => break,
            }
        }

        let state = Arc::new(Mutex::new(SessionState::default()));
        sessions.insert(
            id.to_string(),
            Entry {
                state: state.clone(),
                last_seen: now,
            },
        );
        state
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

/// Session id from the request cookie, or a fresh one.
///
/// The boolean is true when the id is new and must be set on the response.
pub fn resolve(headers: &HeaderMap) -> (String, bool) {
    match session_id(headers) {
        Some(id) => (id, false),
        None => (new_session_id(), true),
    }
}

pub fn set_cookie_value(id: &str) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax")
}

fn session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && is_valid_id(value))
        .map(|(_, value)| value.to_string())
}

fn new_session_id() -> String {
    let mut rng = rand::thread_rng();
    format!("{:016x}{:016x}", rng.gen::<u64>(), rng.gen::<u64>())
}

fn is_valid_id(id: &str) -> bool {
    id.len() == 32 && id.chars().all(|c| c.is_ascii_hexdigit())
}
