use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type SubjectId = Uuid;

/// Stored subject record. `password_hash` is the PHC-encoded Argon2 hash;
/// the plaintext is never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subject {
    pub id: SubjectId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub middle_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub active: bool,
    /// Name of the single role this subject holds.
    pub role: String,
}

/// What authorization sees: the resolved caller identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Principal {
    pub subject_id: SubjectId,
    pub email: String,
    pub role: String,
}

impl Principal {
    pub fn of(subject: &Subject) -> Self {
        Self {
            subject_id: subject.id,
            email: subject.email.clone(),
            role: subject.role.clone(),
        }
    }
}
