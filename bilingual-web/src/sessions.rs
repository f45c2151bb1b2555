use bilingual_render::ResultSession;
use std::collections::{HashMap, VecDeque};

/// Sessions kept for audio requests before the oldest is dropped.
pub const MAX_SESSIONS: usize = 256;

/// Result sessions keyed by data hash, oldest evicted first.
#[derive(Debug)]
pub struct SessionStore {
    capacity: usize,
    sessions: HashMap<String, ResultSession>,
    order: VecDeque<String>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_capacity(MAX_SESSIONS)
    }
}

impl SessionStore {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            sessions: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    /// Store `session`, replacing any earlier one for the same document.
    pub fn insert(&mut self, session: ResultSession) {
        let key = session.data_hash.clone();
        if self.sessions.insert(key.clone(), session).is_some() {
            self.order.retain(|k| k != &key);
        }
        self.order.push_back(key);

        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.sessions.remove(&oldest);
            }
        }
    }

    pub fn get(&self, data_hash: &str) -> Option<&ResultSession> {
        self.sessions.get(data_hash)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn clear(&mut self) {
        self.sessions.clear();
        self.order.clear();
    }
}
