use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::Value;
use tracing::info;

use papaleguas_types::api::ContactCreatedResponse;
use papaleguas_types::models::NewContactSubmission;

use crate::auth::AppState;
use crate::error::Result;
use crate::session::Identity;
use crate::validation::{self, Mode};

/// Public contact form. Submissions are append-only.
pub async fn submit(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(body) = payload?;
    let submission: NewContactSubmission =
        validation::parse(&body, validation::CONTACT_SUBMISSION, Mode::Create)?;

    let saved = state.store.create_contact_submission(submission)?;
    info!("Contact submission {} received ({})", saved.id, saved.service);

    Ok((
        StatusCode::CREATED,
        Json(ContactCreatedResponse {
            message: "Contact form submitted successfully".to_string(),
            id: saved.id,
        }),
    ))
}

/// Inbox, newest first.
pub async fn list(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<impl IntoResponse> {
    let submissions = state.store.list_contact_submissions()?;
    info!("User {} listed {} contact submissions", identity.user_id, submissions.len());
    Ok(Json(submissions))
}
