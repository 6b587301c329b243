//! Credential codec: issues and verifies signed, expiring bearer tokens.
//! Stateless by design: verification is a pure function of the token and the
//! injected signing secret. Signature comparison (and its timing behavior) is
//! delegated to the jsonwebtoken primitive, not reimplemented here.

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::TokenConfig;
use crate::error::{AppError, CredentialError};
use super::SubjectId;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    /// Subject identifier the token was issued to.
    pub sub: SubjectId,
    /// Absolute expiry, seconds since the Unix epoch.
    pub exp: i64,
    pub iat: i64,
}

impl TokenClaims {
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: chrono::Duration,
}

impl TokenCodec {
    pub fn new(config: &TokenConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(&config.secret),
            decoding_key: DecodingKey::from_secret(&config.secret),
            ttl: config.ttl,
        }
    }

    pub fn issue(&self, subject_id: SubjectId) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: subject_id,
            exp: (now + self.ttl).timestamp(),
            iat: now.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal("token_encode_failed".into(), e.to_string()))
    }

    /// Expiry wins over malformation only in the sense jsonwebtoken reports
    /// it: a token with a bad signature is malformed even if also expired.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, CredentialError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        match decode::<TokenClaims>(token, &self.decoding_key, &validation) {
            Ok(data) => Ok(data.claims),
            Err(e) => match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => Err(CredentialError::Expired),
                _ => Err(CredentialError::Malformed),
            },
        }
    }
}
