//! # Session Store
//!
//! The single owner of session state. All session mutation funnels through
//! [`SessionStore::set_session`], [`SessionStore::clear_session`], and
//! [`SessionStore::load_persisted`]; every other component only reads a
//! snapshot of the current value at the moment of use.
//!
//! State changes are published through a `tokio::sync::watch` channel so
//! screens re-render reactively and the request pipeline always sees the
//! latest credential.

use std::sync::Arc;

use shared::AuthBody;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::Result;
use lib_auth::decode_claims;

use super::storage::SessionStorage;
use super::Session;

/// Storage key for the full durable session record.
pub const SESSION_KEY: &str = "eventra.session";

/// Storage key for the standalone expiry record (decimal epoch seconds).
///
/// Written in lockstep with [`SESSION_KEY`] so host apps can answer "is
/// anyone logged in, until when" without parsing the full record. The core
/// itself only ever reads the full record back.
pub const SESSION_EXP_KEY: &str = "eventra.session_exp";

/// Process-wide session state with durable persistence.
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    tx: watch::Sender<Option<Session>>,
}

impl SessionStore {
    /// Create a store with no current session.
    ///
    /// Call [`load_persisted`](Self::load_persisted) once at startup to pick
    /// up a prior login.
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { storage, tx }
    }

    /// Establish a session from a login/signup response body.
    ///
    /// Decodes the access token's claims, then atomically replaces the
    /// in-memory session and persists both durable records.
    ///
    /// # Errors
    ///
    /// On a credential decode failure or a storage failure the prior
    /// session (or absence thereof) is left untouched — a bad response can
    /// never partially overwrite a good session.
    pub fn set_session(&self, body: &AuthBody) -> Result<()> {
        let claims = decode_claims(&body.access_token).map_err(|e| {
            warn!(error = %e, "login response carried an undecodable credential, keeping prior session");
            e
        })?;

        let session = Session {
            username: claims.username,
            role: body.role.clone(),
            access_token: body.access_token.clone(),
            refresh_token: body.refresh_token.clone(),
            exp: claims.exp,
            sub: claims.sub,
        };

        self.persist(&session)?;
        info!(username = %session.username, exp = session.exp, "session established");
        self.tx.send_replace(Some(session));
        Ok(())
    }

    /// Drop the session from memory and durable storage.
    ///
    /// Idempotent: clearing when no session exists is a no-op.
    pub fn clear_session(&self) {
        for key in [SESSION_KEY, SESSION_EXP_KEY] {
            if let Err(e) = self.storage.remove(key) {
                warn!(key, error = %e, "failed to delete session record");
            }
        }

        let had_session = self.tx.send_replace(None).is_some();
        if had_session {
            info!("session cleared");
        }
    }

    /// Load a persisted session into memory, if one exists.
    ///
    /// Startup-only path. An absent or malformed record leaves the store
    /// unauthenticated; malformed records are logged, not surfaced.
    pub fn load_persisted(&self) {
        let raw = match self.storage.get(SESSION_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("no persisted session");
                return;
            }
            Err(e) => {
                warn!(error = %e, "failed to read persisted session, starting unauthenticated");
                return;
            }
        };

        match serde_json::from_str::<Session>(&raw) {
            Ok(session) => {
                info!(username = %session.username, exp = session.exp, "restored persisted session");
                self.tx.send_replace(Some(session));
            }
            Err(e) => {
                warn!(error = %e, "persisted session is malformed, starting unauthenticated");
            }
        }
    }

    /// Snapshot of the current session.
    pub fn current(&self) -> Option<Session> {
        self.tx.borrow().clone()
    }

    /// Subscribe to session changes. The receiver sees the current value
    /// immediately and every subsequent `set`/`clear`.
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.tx.subscribe()
    }

    fn persist(&self, session: &Session) -> Result<()> {
        let record = serde_json::to_string(session)
            .map_err(|e| crate::error::AppError::Storage(format!("serialize session: {e}")))?;
        self.storage.put(SESSION_KEY, &record)?;
        self.storage.put(SESSION_EXP_KEY, &session.exp.to_string())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::storage::MemoryStorage;
    use lib_utils::b64u_encode;

    fn token(username: &str, exp: i64, sub: i64) -> String {
        let claims = format!(r#"{{"username":"{username}","exp":{exp},"sub":{sub}}}"#);
        format!("eyJhbGciOiJIUzI1NiJ9.{}.c2ln", b64u_encode(claims))
    }

    fn auth_body(username: &str, exp: i64, sub: i64) -> AuthBody {
        AuthBody {
            role: "user".to_string(),
            access_token: token(username, exp, sub),
            refresh_token: "r1".to_string(),
        }
    }

    #[test]
    fn test_set_session_decodes_and_persists() {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::new(storage.clone());

        store.set_session(&auth_body("alice", 1_999_999_999, 42)).unwrap();

        let session = store.current().expect("session should be present");
        assert_eq!(session.username, "alice");
        assert_eq!(session.role, "user");
        assert_eq!(session.refresh_token, "r1");
        assert_eq!(session.exp, 1_999_999_999);
        assert_eq!(session.sub, 42);

        // both durable records exist; the expiry record is the bare value
        let record = storage.get(SESSION_KEY).unwrap().expect("session record");
        assert!(record.contains("\"accessToken\""));
        assert_eq!(
            storage.get(SESSION_EXP_KEY).unwrap().as_deref(),
            Some("1999999999")
        );
    }

    #[test]
    fn test_set_session_failure_preserves_prior_session() {
        let store = SessionStore::new(Arc::new(MemoryStorage::new()));
        store.set_session(&auth_body("alice", 1_999_999_999, 42)).unwrap();

        let bad = AuthBody {
            role: "user".to_string(),
            access_token: "definitely.not-base64url!.token".to_string(),
            refresh_token: "r2".to_string(),
        };
        assert!(store.set_session(&bad).is_err());

        let session = store.current().expect("prior session should survive");
        assert_eq!(session.username, "alice");
        assert_eq!(session.refresh_token, "r1");
    }

    #[test]
    fn test_persisted_session_round_trips() {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::new(storage.clone());
        store.set_session(&auth_body("alice", 1_999_999_999, 42)).unwrap();
        let original = store.current().unwrap();

        // a fresh store over the same storage simulates a process restart
        let restarted = SessionStore::new(storage);
        assert_eq!(restarted.current(), None);
        restarted.load_persisted();
        assert_eq!(restarted.current(), Some(original));
    }

    #[test]
    fn test_load_persisted_tolerates_malformed_record() {
        let storage = Arc::new(MemoryStorage::new());
        storage.put(SESSION_KEY, "{ not json").unwrap();

        let store = SessionStore::new(storage);
        store.load_persisted();
        assert_eq!(store.current(), None);
    }

    #[test]
    fn test_clear_session_is_idempotent() {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::new(storage.clone());
        store.set_session(&auth_body("alice", 1_999_999_999, 42)).unwrap();

        store.clear_session();
        assert_eq!(store.current(), None);
        assert_eq!(storage.get(SESSION_KEY).unwrap(), None);
        assert_eq!(storage.get(SESSION_EXP_KEY).unwrap(), None);

        // clearing again (and clearing with no session ever set) is a no-op
        store.clear_session();
        assert_eq!(store.current(), None);
    }

    #[test]
    fn test_subscribers_observe_mutations() {
        let store = SessionStore::new(Arc::new(MemoryStorage::new()));
        let rx = store.subscribe();
        assert!(rx.borrow().is_none());

        store.set_session(&auth_body("alice", 1_999_999_999, 42)).unwrap();
        assert_eq!(rx.borrow().as_ref().map(|s| s.username.clone()), Some("alice".to_string()));

        store.clear_session();
        assert!(rx.borrow().is_none());
    }
}
