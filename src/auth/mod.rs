//! Admin authentication: credential verification and session resolution.
//!
//! Credentials are compared in constant time to mitigate timing attacks.
//! Successful logins are exchanged for opaque session tokens persisted in the
//! database; every admin-gated handler resolves the presented token before
//! touching any store.

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use subtle::ConstantTimeEq;

use crate::config::Config;
use crate::errors::AppError;
use crate::models::{AdminSession, ADMIN_ROLE};
use crate::AppState;

/// Verify a login attempt against the configured admin credentials.
///
/// Returns false when no credentials are configured, so admin access stays
/// closed rather than open on a missing deployment variable.
pub fn verify_credentials(config: &Config, username: &str, password: &str) -> bool {
    let (Some(expected_user), Some(expected_pass)) =
        (&config.admin_username, &config.admin_password)
    else {
        return false;
    };

    // Single non-short-circuiting AND keeps the comparison constant-time
    // across both fields.
    let user_ok = constant_time_compare(username, expected_user);
    let pass_ok = constant_time_compare(password, expected_pass);
    user_ok & pass_ok
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Extract the bearer token from the Authorization header.
pub fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
}

/// Requires a valid, unexpired admin session. Rejects with 401 otherwise,
/// before the handler body runs.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(session): RequireAdmin) -> ApiResult<()> {
///     // session.role is guaranteed to be the admin role here
/// }
/// ```
pub struct RequireAdmin(pub AdminSession);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::Unauthorized("Missing session token".to_string()))?
            .to_string();

        let session = state
            .repo
            .find_admin_session(&token)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid or expired session".to_string()))?;

        if session.role != ADMIN_ROLE {
            return Err(AppError::Unauthorized("Admin role required".to_string()));
        }

        Ok(RequireAdmin(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_compare_equal() {
        assert!(constant_time_compare("studio-admin", "studio-admin"));
    }

    #[test]
    fn test_constant_time_compare_not_equal() {
        assert!(!constant_time_compare("studio-admin", "studio-admim"));
    }

    #[test]
    fn test_constant_time_compare_different_lengths() {
        assert!(!constant_time_compare("short", "much-longer-secret"));
    }

    #[test]
    fn test_verify_credentials_requires_configuration() {
        let mut config = test_config();
        config.admin_username = None;
        config.admin_password = None;
        assert!(!verify_credentials(&config, "admin", "secret"));
    }

    #[test]
    fn test_verify_credentials_checks_both_fields() {
        let config = test_config();
        assert!(verify_credentials(&config, "admin", "secret"));
        assert!(!verify_credentials(&config, "admin", "wrong"));
        assert!(!verify_credentials(&config, "wrong", "secret"));
    }

    fn test_config() -> Config {
        Config {
            admin_username: Some("admin".to_string()),
            admin_password: Some("secret".to_string()),
            session_ttl_hours: 24,
            db_path: "./test.sqlite".into(),
            media_root: "./media".into(),
            public_base_url: "http://127.0.0.1:8080".to_string(),
            hero_slot_cap: 3,
            contact_inbox: None,
            smtp: None,
            bind_addr: "127.0.0.1:8080".parse().unwrap(),
            log_level: "warn".to_string(),
        }
    }
}
