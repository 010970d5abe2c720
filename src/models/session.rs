//! Admin session model.

use serde::Serialize;

/// Role stored on admin sessions; the only role the backend knows.
pub const ADMIN_ROLE: &str = "admin";

/// A persisted admin session. Resolution only accepts unexpired rows.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub token: String,
    pub role: String,
    pub expires_at: String,
    pub created_at: String,
}

/// Response body for POST /api/auth/login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    pub token: String,
    pub expires_at: String,
}
