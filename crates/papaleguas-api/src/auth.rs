use std::sync::{Arc, LazyLock};

use anyhow::anyhow;
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::Value;
use tower_sessions::Session;
use tracing::{error, info, warn};

use papaleguas_store::Store;
use papaleguas_types::api::{LoginRequest, MeResponse, MessageResponse};
use papaleguas_types::models::default_capabilities;

use crate::error::{ApiError, Result};
use crate::session::{self, Identity, SessionConfig};
use crate::timeline::TimelineService;
use crate::validation::{self, Mode};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub store: Arc<Store>,
    pub session_config: SessionConfig,
    pub timeline: TimelineService,
}

impl AppStateInner {
    pub fn new(store: Arc<Store>, session_config: SessionConfig) -> AppState {
        Arc::new(Self {
            timeline: TimelineService::new(store.clone()),
            session_config,
            store,
        })
    }
}

/// Verified against when the username is unknown, so both failure paths pay
/// for one Argon2 run.
static DUMMY_HASH: LazyLock<String> = LazyLock::new(|| {
    hash_password("papaleguas-unknown-user").unwrap_or_else(|e| {
        error!("Failed to build dummy password hash: {}", e);
        String::new()
    })
});

/// Argon2id PHC string for `password`.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow!("password hashing failed: {}", e))
}

/// `Ok(false)` on mismatch; `Err` only when the stored hash is unreadable.
pub fn verify_password(password: &str, stored_hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| anyhow!("corrupt password hash: {}", e))?;
    Ok(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
}

pub async fn login(
    State(state): State<AppState>,
    session: Session,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(body) = payload?;
    let req: LoginRequest = validation::parse(&body, validation::LOGIN, Mode::Create)?;

    let user = state.store.get_user_by_username(&req.username)?;
    let stored_hash = match &user {
        Some(user) => user.password_hash.clone(),
        None => DUMMY_HASH.clone(),
    };

    // Argon2 verification is CPU-bound; run it off the async workers
    let verified = tokio::task::spawn_blocking(move || verify_password(&req.password, &stored_hash))
        .await
        .map_err(|e| anyhow!("spawn_blocking join error: {}", e))?;

    let Some(user) = user else {
        return Err(ApiError::InvalidCredentials);
    };
    if !verified? {
        warn!("Failed login for '{}'", user.username);
        return Err(ApiError::InvalidCredentials);
    }

    let identity = Identity { user_id: user.id, capabilities: default_capabilities() };
    session::begin(&session, identity, state.session_config.ttl).await?;
    info!("User '{}' logged in", user.username);

    Ok(Json(MessageResponse::new("Login successful")))
}

pub async fn me(session: Session) -> impl IntoResponse {
    match session::identify(&session).await {
        Some(identity) => (
            StatusCode::OK,
            Json(MeResponse { authenticated: true, is_admin: Some(identity.is_admin()) }),
        ),
        None => (StatusCode::UNAUTHORIZED, Json(MeResponse::anonymous())),
    }
}

/// Always ends anonymous. Fails only if the session store itself errors.
pub async fn logout(session: Session) -> Result<impl IntoResponse> {
    if let Some(identity) = session::identify(&session).await {
        info!("User {} logged out", identity.user_id);
    }
    session::end(&session).await?;
    Ok(Json(MessageResponse::new("Logout successful")))
}
