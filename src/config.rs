//! Explicitly-constructed configuration for the auth core. No module-level
//! secrets: the signing key is injected at construction time so tests can run
//! with fixture secrets.

use chrono::Duration;

/// Signing material and lifetime for issued bearer tokens.
#[derive(Clone)]
pub struct TokenConfig {
    pub secret: Vec<u8>,
    pub ttl: Duration,
}

impl TokenConfig {
    pub fn new(secret: impl Into<Vec<u8>>, ttl: Duration) -> Self {
        Self { secret: secret.into(), ttl }
    }

    /// One-hour tokens with the given secret.
    pub fn with_secret(secret: impl Into<Vec<u8>>) -> Self {
        Self::new(secret, Duration::hours(1))
    }
}

/// Top-level knobs for the auth core.
#[derive(Clone)]
pub struct CoreConfig {
    pub token: TokenConfig,
    /// Role assigned to newly registered subjects. Registration fails when
    /// this role does not exist.
    pub default_role: String,
}

impl CoreConfig {
    pub fn new(token: TokenConfig) -> Self {
        Self { token, default_role: "user".into() }
    }
}
