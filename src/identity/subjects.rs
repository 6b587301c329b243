//! Subject persistence seam. The engine and resolver only need lookups; the
//! provider needs inserts and profile updates. Email uniqueness is enforced
//! here, case-insensitively.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::debug;

use crate::error::AppError;
use super::{Subject, SubjectId};

pub trait SubjectStore: Send + Sync {
    /// Insert a new subject. Fails with Conflict when the email is taken.
    fn insert(&self, subject: Subject) -> Result<(), AppError>;
    fn find_by_id(&self, id: SubjectId) -> Option<Subject>;
    fn find_by_email(&self, email: &str) -> Option<Subject>;
    /// Replace an existing subject record (profile edits). Fails with
    /// NotFound when missing and Conflict when the new email collides with a
    /// different subject.
    fn update(&self, subject: &Subject) -> Result<(), AppError>;
    /// Flip the active flag. Soft delete keeps the record; authentication
    /// rejects inactive subjects.
    fn set_active(&self, id: SubjectId, active: bool) -> Result<(), AppError>;
    /// Referential-integrity input for role deletion: does any subject still
    /// reference this role?
    fn role_in_use(&self, role: &str) -> bool;
}

#[derive(Default)]
pub struct MemorySubjectStore {
    subjects: RwLock<HashMap<SubjectId, Subject>>,
}

impl MemorySubjectStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SubjectStore for MemorySubjectStore {
    fn insert(&self, subject: Subject) -> Result<(), AppError> {
        let mut m = self.subjects.write();
        if m.values().any(|s| s.email.eq_ignore_ascii_case(&subject.email)) {
            return Err(AppError::conflict("duplicate_email", "email already registered"));
        }
        debug!(target: "authgate::subjects", "insert id={} email={}", subject.id, subject.email);
        m.insert(subject.id, subject);
        Ok(())
    }

    fn find_by_id(&self, id: SubjectId) -> Option<Subject> {
        self.subjects.read().get(&id).cloned()
    }

    fn find_by_email(&self, email: &str) -> Option<Subject> {
        self.subjects
            .read()
            .values()
            .find(|s| s.email.eq_ignore_ascii_case(email))
            .cloned()
    }

    fn update(&self, subject: &Subject) -> Result<(), AppError> {
        let mut m = self.subjects.write();
        if !m.contains_key(&subject.id) {
            return Err(AppError::not_found("subject_not_found", "no such subject"));
        }
        if m.values().any(|s| s.id != subject.id && s.email.eq_ignore_ascii_case(&subject.email)) {
            return Err(AppError::conflict("duplicate_email", "email already registered"));
        }
        m.insert(subject.id, subject.clone());
        Ok(())
    }

    fn set_active(&self, id: SubjectId, active: bool) -> Result<(), AppError> {
        let mut m = self.subjects.write();
        let Some(s) = m.get_mut(&id) else {
            return Err(AppError::not_found("subject_not_found", "no such subject"));
        };
        debug!(target: "authgate::subjects", "set_active id={} active={}", id, active);
        s.active = active;
        Ok(())
    }

    fn role_in_use(&self, role: &str) -> bool {
        self.subjects.read().values().any(|s| s.role == role)
    }
}
