//! Configuration module for the Atelier backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Highest hero slot position the schema admits.
pub const HERO_SLOT_MAX: usize = 4;

/// Default number of hero slots the API accepts per save.
pub const DEFAULT_HERO_SLOT_CAP: usize = 3;

/// SMTP settings for outbound notification email.
///
/// Absent entirely when `ATELIER_SMTP_HOST` is not set, in which case email
/// dispatch is disabled and intake requests proceed without it.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// SMTP server hostname
    pub host: String,
    /// SMTP server port (defaults to 587, STARTTLS)
    pub port: u16,
    /// RFC 5322 "From" address
    pub from_address: String,
    /// Optional SMTP username
    pub username: Option<String>,
    /// Optional SMTP password
    pub password: Option<String>,
}

impl SmtpConfig {
    /// Load SMTP configuration; `None` when no host is configured.
    pub fn from_env() -> Option<Self> {
        let host = env::var("ATELIER_SMTP_HOST").ok()?;
        Some(Self {
            host,
            port: env::var("ATELIER_SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(587),
            from_address: env::var("ATELIER_SMTP_FROM")
                .unwrap_or_else(|_| "noreply@atelier.studio".to_string()),
            username: env::var("ATELIER_SMTP_USER").ok(),
            password: env::var("ATELIER_SMTP_PASSWORD").ok(),
        })
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Admin login name (admin routes reject everything when unset)
    pub admin_username: Option<String>,
    /// Admin password (required alongside the username)
    pub admin_password: Option<String>,
    /// Lifetime of an admin session in hours
    pub session_ttl_hours: i64,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Root directory for stored media objects
    pub media_root: PathBuf,
    /// Base URL under which stored media is publicly reachable
    pub public_base_url: String,
    /// Number of hero slots accepted per save (1..=4)
    pub hero_slot_cap: usize,
    /// Studio inbox that receives contact/booking notifications
    pub contact_inbox: Option<String>,
    /// SMTP settings; `None` disables email dispatch
    pub smtp: Option<SmtpConfig>,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let admin_username = env::var("ATELIER_ADMIN_USER").ok();
        let admin_password = env::var("ATELIER_ADMIN_PASSWORD").ok();

        let session_ttl_hours = env::var("ATELIER_SESSION_TTL_HOURS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(24);

        let db_path = env::var("ATELIER_DB_PATH")
            .unwrap_or_else(|_| "./data/app.sqlite".to_string())
            .into();

        let media_root = env::var("ATELIER_MEDIA_ROOT")
            .unwrap_or_else(|_| "./data/media".to_string())
            .into();

        let bind_addr: SocketAddr = env::var("ATELIER_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid ATELIER_BIND_ADDR format");

        let public_base_url = env::var("ATELIER_PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://{}", bind_addr));

        // The schema admits positions 1..=4 while the API historically capped
        // saves at 3; the cap is a config knob clamped to the schema bound.
        let hero_slot_cap = env::var("ATELIER_HERO_SLOT_CAP")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_HERO_SLOT_CAP)
            .clamp(1, HERO_SLOT_MAX);

        let contact_inbox = env::var("ATELIER_CONTACT_INBOX").ok();

        let log_level = env::var("ATELIER_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self {
            admin_username,
            admin_password,
            session_ttl_hours,
            db_path,
            media_root,
            public_base_url,
            hero_slot_cap,
            contact_inbox,
            smtp: SmtpConfig::from_env(),
            bind_addr,
            log_level,
        }
    }
}
