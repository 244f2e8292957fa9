use serde::{Deserialize, Serialize};

use crate::models::Id;

// -- Auth --

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
}

impl MeResponse {
    pub fn anonymous() -> Self {
        Self { authenticated: false, is_admin: None }
    }
}

// -- Generic --

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

// -- Contact --

#[derive(Debug, Serialize)]
pub struct ContactCreatedResponse {
    pub message: String,
    pub id: Id,
}
