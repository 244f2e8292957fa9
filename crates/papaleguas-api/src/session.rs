//! Cookie sessions for the admin area.
//!
//! Sessions live in a `tower-sessions` [`MemoryStore`]; the only payload is the
//! signed-in [`Identity`], stored under [`SESSION_USER_KEY`]. Expiry is fixed at
//! login and is not pushed back by later requests.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tower_sessions::cookie::SameSite;
use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};
use tracing::{debug, warn};

use papaleguas_types::models::{Capability, Id};

pub const SESSION_COOKIE: &str = "papaleguas.sid";

/// Session key holding the signed-in user.
pub const SESSION_USER_KEY: &str = "user";

/// Upper bound accepted for a configured session lifetime.
pub const MAX_SESSION_TTL: Duration = Duration::days(30);

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Lifetime from login.
    pub ttl: Duration,
    pub secure_cookie: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { ttl: Duration::hours(1), secure_cookie: false }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session expiry out of range")]
    ExpiryOutOfRange,
    #[error(transparent)]
    Store(#[from] tower_sessions::session::Error),
}

/// Who is making an authenticated request. Inserted as a request extension
/// by [`crate::middleware::require_auth`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: Id,
    pub capabilities: BTreeSet<Capability>,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.capabilities.contains(&Capability::Admin)
    }
}

pub fn layer(config: &SessionConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE)
        .with_path("/")
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_secure(config.secure_cookie)
}

pub fn expires_at(now: OffsetDateTime, ttl: Duration) -> Result<OffsetDateTime, SessionError> {
    now.checked_add(ttl).ok_or(SessionError::ExpiryOutOfRange)
}

/// Bind `identity` to the session under a fresh id. Any previous id for this
/// client is deleted from the store.
pub async fn begin(session: &Session, identity: Identity, ttl: Duration) -> Result<(), SessionError> {
    let expiry = expires_at(OffsetDateTime::now_utc(), ttl)?;
    let user_id = identity.user_id;

    session.cycle_id().await?;
    session.insert(SESSION_USER_KEY, identity).await?;
    session.set_expiry(Some(Expiry::AtDateTime(expiry)));

    debug!("Session started for user {}", user_id);
    Ok(())
}

/// The signed-in user, if any. A missing, unknown or expired session is
/// anonymous; so is a store failure.
pub async fn identify(session: &Session) -> Option<Identity> {
    match session.get::<Identity>(SESSION_USER_KEY).await {
        Ok(identity) => identity,
        Err(e) => {
            warn!("Session lookup failed, treating caller as anonymous: {}", e);
            None
        }
    }
}

/// Drop the session data and its store record.
pub async fn end(session: &Session) -> Result<(), SessionError> {
    session.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use papaleguas_types::models::default_capabilities;

    fn admin(user_id: Id) -> Identity {
        Identity { user_id, capabilities: default_capabilities() }
    }

    fn fresh(store: &Arc<MemoryStore>) -> Session {
        Session::new(None, store.clone(), None)
    }

    #[test]
    fn test_expiry_is_ttl_after_login() {
        let now = OffsetDateTime::now_utc();
        assert_eq!(expires_at(now, Duration::hours(1)).unwrap(), now + Duration::hours(1));
    }

    #[test]
    fn test_expiry_overflow_is_an_error() {
        let now = OffsetDateTime::now_utc();
        assert!(matches!(expires_at(now, Duration::MAX), Err(SessionError::ExpiryOutOfRange)));
    }

    #[tokio::test]
    async fn test_begin_rejects_out_of_range_ttl() {
        let session = fresh(&Arc::new(MemoryStore::default()));
        let result = begin(&session, admin(1), Duration::MAX).await;
        assert!(matches!(result, Err(SessionError::ExpiryOutOfRange)));
        assert!(identify(&session).await.is_none());
    }

    #[tokio::test]
    async fn test_new_session_is_anonymous() {
        let session = fresh(&Arc::new(MemoryStore::default()));
        assert!(identify(&session).await.is_none());
    }

    #[tokio::test]
    async fn test_begin_then_identify() {
        let session = fresh(&Arc::new(MemoryStore::default()));
        begin(&session, admin(3), Duration::hours(1)).await.unwrap();

        let identity = identify(&session).await.unwrap();
        assert_eq!(identity.user_id, 3);
        assert!(identity.is_admin());
        assert!(matches!(session.expiry(), Some(Expiry::AtDateTime(_))));
    }

    #[tokio::test]
    async fn test_end_clears_identity() {
        let session = fresh(&Arc::new(MemoryStore::default()));
        begin(&session, admin(1), Duration::hours(1)).await.unwrap();
        end(&session).await.unwrap();
        assert!(identify(&session).await.is_none());
    }

    #[tokio::test]
    async fn test_saved_session_is_found_by_id() {
        let store = Arc::new(MemoryStore::default());
        let session = fresh(&store);
        begin(&session, admin(5), Duration::hours(1)).await.unwrap();
        session.save().await.unwrap();

        let reloaded = Session::new(session.id(), store.clone(), None);
        assert_eq!(identify(&reloaded).await, Some(admin(5)));
    }
}
