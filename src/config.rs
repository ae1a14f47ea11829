use serde::Deserialize;
use time::UtcOffset;

/// Longest admin session a deployment may configure: one year.
pub const MAX_SESSION_TTL_MINUTES: i64 = 60 * 24 * 365;

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// Shared admin secret, either as plaintext (hashed at startup) or as an
/// Argon2 PHC string.
#[derive(Debug, Clone, Deserialize)]
pub enum AdminSecret {
    Plain(String),
    Hash(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub admin_secret: AdminSecret,
    pub session: SessionConfig,
    /// Offset used for "today" and for rendered dates on the dashboard.
    pub dashboard_offset_minutes: i32,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;

        let admin_secret = match (
            std::env::var("ADMIN_PASSWORD_HASH").ok(),
            std::env::var("ADMIN_PASSWORD").ok(),
        ) {
            (Some(hash), _) if !hash.is_empty() => AdminSecret::Hash(hash),
            (_, Some(plain)) if !plain.is_empty() => AdminSecret::Plain(plain),
            _ => anyhow::bail!("ADMIN_PASSWORD or ADMIN_PASSWORD_HASH must be set"),
        };

        let session = SessionConfig {
            secret: std::env::var("SESSION_SECRET")?,
            issuer: std::env::var("SESSION_ISSUER").unwrap_or_else(|_| "fairway".into()),
            audience: std::env::var("SESSION_AUDIENCE")
                .unwrap_or_else(|_| "fairway-admin".into()),
            ttl_minutes: std::env::var("SESSION_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 8)
                .clamp(1, MAX_SESSION_TTL_MINUTES),
        };

        let dashboard_offset_minutes = std::env::var("DASHBOARD_UTC_OFFSET_MINUTES")
            .ok()
            .and_then(|v| v.parse::<i32>().ok())
            .unwrap_or(0);

        Ok(Self {
            database_url,
            admin_secret,
            session,
            dashboard_offset_minutes,
        })
    }

    /// Falls back to UTC when the configured minutes are out of range.
    pub fn dashboard_offset(&self) -> UtcOffset {
        self.dashboard_offset_minutes
            .checked_mul(60)
            .and_then(|secs| UtcOffset::from_whole_seconds(secs).ok())
            .unwrap_or(UtcOffset::UTC)
    }
}
