use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;

/// Tokens revoked before their natural expiry.
///
/// Each entry remembers when its token would have expired anyway; expired
/// entries are dropped whenever the set is touched, so it never outgrows the
/// number of tokens still alive.
#[derive(Clone, Default)]
pub struct TokenBlacklist {
    inner: Arc<Mutex<HashMap<String, i64>>>,
}

impl TokenBlacklist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn revoke(&self, token: &str, expires_at: i64) {
        self.revoke_at(token, expires_at, Utc::now().timestamp());
    }

    pub fn revoke_at(&self, token: &str, expires_at: i64, now: i64) {
        let mut map = self.lock();
        evict(&mut map, now);
        // an already expired token is rejected by signature validation anyway
        if expires_at > now {
            map.insert(token.to_string(), expires_at);
        }
    }

    pub fn is_revoked(&self, token: &str) -> bool {
        self.is_revoked_at(token, Utc::now().timestamp())
    }

    pub fn is_revoked_at(&self, token: &str, now: i64) -> bool {
        let mut map = self.lock();
        evict(&mut map, now);
        map.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, i64>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn evict(map: &mut HashMap<String, i64>, now: i64) {
    map.retain(|_, exp| *exp > now);
}
