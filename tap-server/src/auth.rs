//! Authentication
//!
//! Argon2 password hashing plus an in-process session store. Login
//! checks the submitted password against the live system's user and
//! admin hashes and hands back an opaque token; the web layer treats
//! that token as its session marker.

use std::time::Duration;

use dashmap::DashMap;
use serde::Serialize;

use shared::util::now_millis;

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    use argon2::password_hash::SaltString;
    use argon2::password_hash::rand_core::OsRng;
    use argon2::{Argon2, PasswordHasher};
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Which credential the patron matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub system_id: i64,
    pub role: Role,
    /// Epoch milliseconds.
    pub expires_at: i64,
}

/// Opaque-token session store with TTL. Expired entries are dropped
/// lazily on lookup and in bulk by the periodic sweep task.
#[derive(Debug)]
pub struct SessionStore {
    ttl: Duration,
    inner: DashMap<String, Session>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            inner: DashMap::new(),
        }
    }

    pub fn issue(&self, system_id: i64, role: Role) -> String {
        let token = generate_token();
        let session = Session {
            system_id,
            role,
            expires_at: now_millis() + self.ttl.as_millis() as i64,
        };
        self.inner.insert(token.clone(), session);
        token
    }

    pub fn get(&self, token: &str) -> Option<Session> {
        let session = self.inner.get(token)?.clone();
        if session.expires_at <= now_millis() {
            drop(self.inner.remove(token));
            return None;
        }
        Some(session)
    }

    pub fn revoke(&self, token: &str) {
        self.inner.remove(token);
    }

    /// Drop every expired session.
    pub fn sweep(&self) {
        let now = now_millis();
        self.inner.retain(|_, session| session.expires_at > now);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner.len()
    }
}

fn generate_token() -> String {
    use rand::RngCore;
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_password("Bier!").unwrap();
        assert!(verify_password("Bier!", &hash));
        assert!(!verify_password("bier!", &hash));
    }

    #[test]
    fn verify_rejects_garbage_hash() {
        assert!(!verify_password("x", "not-a-phc-string"));
    }

    #[test]
    fn issued_session_is_retrievable() {
        let store = SessionStore::new(Duration::from_secs(60));
        let token = store.issue(1, Role::Admin);

        let session = store.get(&token).unwrap();
        assert_eq!(session.system_id, 1);
        assert_eq!(session.role, Role::Admin);
        assert!(store.get("unknown-token").is_none());
    }

    #[test]
    fn expired_sessions_disappear() {
        let store = SessionStore::new(Duration::ZERO);
        let token = store.issue(1, Role::User);

        assert!(store.get(&token).is_none());

        let _ = store.issue(1, Role::User);
        store.sweep();
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn tokens_are_unique_and_opaque() {
        let store = SessionStore::new(Duration::from_secs(60));
        let a = store.issue(1, Role::User);
        let b = store.issue(1, Role::User);
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
    }
}
