use axum::{extract::Request, middleware::Next, response::Response};
use tower_sessions::Session;
use tracing::debug;

use crate::error::ApiError;
use crate::session;

/// Reject the request unless its session belongs to a signed-in user.
/// On success the caller's [`Identity`](crate::session::Identity) is added to
/// the request extensions; the wrapped handler never runs otherwise.
pub async fn require_auth(
    session: Session,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(identity) = session::identify(&session).await else {
        debug!("Rejected anonymous {} {}", req.method(), req.uri().path());
        return Err(ApiError::Unauthorized);
    };

    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}
