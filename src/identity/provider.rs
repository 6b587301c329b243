//! Registration, login, logout, and profile flows. Login failure is a single
//! uniform error value: callers can never tell an unknown email from a wrong
//! password or an inactive account.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::access::AccessStore;
use crate::error::AppError;
use crate::security::{hash_password, verify_password};
use crate::tprintln;

use super::{RequestContext, RevocationStore, Subject, SubjectId, SubjectStore, TokenCodec};

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub middle_name: String,
    pub email: String,
    pub password: String,
    pub password_repeat: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Partial profile edit; `None` fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub middle_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

pub struct AuthProvider {
    subjects: Arc<dyn SubjectStore>,
    access: Arc<dyn AccessStore>,
    revocations: Arc<dyn RevocationStore>,
    codec: Arc<TokenCodec>,
    default_role: String,
}

fn normalize_email(email: &str) -> Result<String, AppError> {
    let e = email.trim().to_ascii_lowercase();
    if e.is_empty() || !e.contains('@') || e.contains(char::is_whitespace) {
        return Err(AppError::validation("email", "invalid email address"));
    }
    Ok(e)
}

impl AuthProvider {
    pub fn new(
        subjects: Arc<dyn SubjectStore>,
        access: Arc<dyn AccessStore>,
        revocations: Arc<dyn RevocationStore>,
        codec: Arc<TokenCodec>,
        default_role: impl Into<String>,
    ) -> Self {
        Self { subjects, access, revocations, codec, default_role: default_role.into() }
    }

    pub fn register(&self, req: &RegisterRequest) -> Result<Subject, AppError> {
        let email = normalize_email(&req.email)?;
        if req.password.is_empty() {
            return Err(AppError::validation("password", "password must not be empty"));
        }
        if req.password != req.password_repeat {
            return Err(AppError::validation("password_repeat", "passwords do not match"));
        }
        if self.access.get_role(&self.default_role).is_none() {
            return Err(AppError::validation(
                "role",
                "default registration role does not exist; seed access data first",
            ));
        }
        if self.subjects.find_by_email(&email).is_some() {
            return Err(AppError::validation("email", "email already in use"));
        }
        let subject = Subject {
            id: Uuid::new_v4(),
            first_name: req.first_name.clone(),
            last_name: req.last_name.clone(),
            middle_name: req.middle_name.clone(),
            email,
            password_hash: hash_password(&req.password)?,
            active: true,
            role: self.default_role.clone(),
        };
        // The store re-checks uniqueness under its write lock; a racing
        // registration surfaces as a validation failure like the pre-check.
        match self.subjects.insert(subject.clone()) {
            Ok(()) => {}
            Err(AppError::Conflict { .. }) => {
                return Err(AppError::validation("email", "email already in use"));
            }
            Err(e) => return Err(e),
        }
        tprintln!("auth.register id={} email={}", subject.id, subject.email);
        Ok(subject)
    }

    pub fn login(&self, req: &LoginRequest) -> Result<LoginResponse, AppError> {
        let email = req.email.trim().to_ascii_lowercase();
        let Some(subject) = self.subjects.find_by_email(&email) else {
            return Err(AppError::InvalidCredentials);
        };
        if !subject.active || !verify_password(&subject.password_hash, &req.password) {
            return Err(AppError::InvalidCredentials);
        }
        let token = self.codec.issue(subject.id)?;
        let claims = self
            .codec
            .verify(&token)
            .map_err(|e| AppError::internal("token_issue_invalid".into(), e.to_string()))?;
        tprintln!("auth.login id={} email={}", subject.id, subject.email);
        Ok(LoginResponse { token, expires_at: claims.expires_at() })
    }

    /// Revoke the token the caller presented. Requires a resolved principal;
    /// concurrent logouts of the same token are safe.
    pub fn logout(&self, ctx: &RequestContext) -> Result<(), AppError> {
        let (Some(principal), Some(token)) = (&ctx.principal, &ctx.token) else {
            return Err(AppError::auth("unauthorized", "authentication required"));
        };
        let claims = self
            .codec
            .verify(token)
            .map_err(|_| AppError::auth("unauthorized", "authentication required"))?;
        self.revocations.revoke(token, claims.expires_at());
        tprintln!("auth.logout id={}", principal.subject_id);
        Ok(())
    }

    pub fn current_subject(&self, ctx: &RequestContext) -> Result<Subject, AppError> {
        let Some(principal) = &ctx.principal else {
            return Err(AppError::auth("unauthorized", "authentication required"));
        };
        self.subjects
            .find_by_id(principal.subject_id)
            .ok_or_else(|| AppError::auth("unauthorized", "authentication required"))
    }

    pub fn update_profile(&self, id: SubjectId, update: &ProfileUpdate) -> Result<Subject, AppError> {
        let Some(mut subject) = self.subjects.find_by_id(id) else {
            return Err(AppError::not_found("subject_not_found", "no such subject"));
        };
        if let Some(v) = &update.first_name {
            subject.first_name = v.clone();
        }
        if let Some(v) = &update.last_name {
            subject.last_name = v.clone();
        }
        if let Some(v) = &update.middle_name {
            subject.middle_name = v.clone();
        }
        if let Some(v) = &update.email {
            subject.email = normalize_email(v)?;
        }
        self.subjects.update(&subject)?;
        Ok(subject)
    }

    /// Soft delete: the record persists with `active=false`, and every
    /// outstanding token for the subject resolves anonymous from the next
    /// request on.
    pub fn deactivate(&self, id: SubjectId) -> Result<(), AppError> {
        self.subjects.set_active(id, false)?;
        tprintln!("auth.deactivate id={}", id);
        Ok(())
    }
}
