//! Unified application error model and mapping helpers.
//! This module provides the common error enum returned across the auth and
//! access-control surfaces, along with the HTTP status mapping the calling
//! layer uses when translating to transport responses.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppError {
    /// Bad client input with field-level detail (registration, profile edits).
    #[error("validation failed on `{field}`: {message}")]
    Validation { field: String, message: String },
    /// Uniform login failure. Carries no detail so callers cannot distinguish
    /// an unknown email from a wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,
    /// Duplicate unique key on a write.
    #[error("{message}")]
    Conflict { code: String, message: String },
    /// Direct lookup by identifier found nothing.
    #[error("{message}")]
    NotFound { code: String, message: String },
    /// Caller is not authenticated where authentication is required.
    #[error("{message}")]
    Auth { code: String, message: String },
    /// Caller is authenticated but the access engine denied the operation.
    #[error("{message}")]
    Forbidden { code: String, message: String },
    #[error("{message}")]
    Internal { code: String, message: String },
}

impl AppError {
    pub fn validation<S: Into<String>>(field: S, msg: S) -> Self {
        AppError::Validation { field: field.into(), message: msg.into() }
    }
    pub fn conflict<S: Into<String>>(code: S, msg: S) -> Self {
        AppError::Conflict { code: code.into(), message: msg.into() }
    }
    pub fn not_found<S: Into<String>>(code: S, msg: S) -> Self {
        AppError::NotFound { code: code.into(), message: msg.into() }
    }
    pub fn auth<S: Into<String>>(code: S, msg: S) -> Self {
        AppError::Auth { code: code.into(), message: msg.into() }
    }
    pub fn forbidden<S: Into<String>>(code: S, msg: S) -> Self {
        AppError::Forbidden { code: code.into(), message: msg.into() }
    }
    pub fn internal<S: Into<String>>(code: S, msg: S) -> Self {
        AppError::Internal { code: code.into(), message: msg.into() }
    }

    /// Map to HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            AppError::Validation { .. } => 400,
            AppError::InvalidCredentials => 401,
            AppError::Conflict { .. } => 409,
            AppError::NotFound { .. } => 404,
            AppError::Auth { .. } => 401,
            AppError::Forbidden { .. } => 403,
            AppError::Internal { .. } => 500,
        }
    }
}

/// Credential verification failures. These never escape the identity
/// resolver, which folds both cases into an anonymous caller.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum CredentialError {
    /// Embedded expiry is in the past; signature may still be valid.
    #[error("credential expired")]
    Expired,
    /// Bad signature, structural corruption, or missing required claims.
    #[error("credential malformed")]
    Malformed,
}
