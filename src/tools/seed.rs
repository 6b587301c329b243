//! Idempotent seed data: the four stock roles, the protected business
//! elements (including the access configuration itself), and the permission
//! matrix for each role. Re-running against a populated store changes
//! nothing.

use tracing::info;

use crate::access::{AccessStore, BusinessElement, PermissionRule, Role};
use crate::error::AppError;
use crate::identity::{Subject, SubjectStore};
use crate::security::hash_password;

const ROLES: &[(&str, &str)] = &[
    ("admin", "Administrator - full access to every resource"),
    ("manager", "Manager - broad access, own-record writes"),
    ("user", "Regular user - basic rights"),
    ("guest", "Guest - minimal read-only rights"),
];

const ELEMENTS: &[(&str, &str)] = &[
    ("users", "User management"),
    ("products", "Product management"),
    ("orders", "Order management"),
    ("access_rules", "Access rule management"),
    ("roles", "Role management"),
    ("elements", "Business element management"),
];

fn all_flags(role: &str, element: &str) -> PermissionRule {
    PermissionRule {
        role: role.into(),
        element: element.into(),
        read: true,
        read_all: true,
        create: true,
        update: true,
        update_all: true,
        delete: true,
        delete_all: true,
    }
}

// Reads everything, writes only own records.
fn manager_flags(role: &str, element: &str) -> PermissionRule {
    PermissionRule {
        role: role.into(),
        element: element.into(),
        read: true,
        read_all: true,
        create: true,
        update: true,
        delete: true,
        ..Default::default()
    }
}

fn own_rw_flags(role: &str, element: &str) -> PermissionRule {
    PermissionRule {
        role: role.into(),
        element: element.into(),
        read: true,
        create: true,
        update: true,
        delete: true,
        ..Default::default()
    }
}

fn own_read_flags(role: &str, element: &str) -> PermissionRule {
    PermissionRule { role: role.into(), element: element.into(), read: true, ..Default::default() }
}

/// Provision roles, elements, and the per-role permission matrix.
pub fn seed_access_data(access: &dyn AccessStore) -> Result<(), AppError> {
    for (name, description) in ROLES {
        if access.get_role(name).is_none() {
            access.create_role(Role { name: (*name).into(), description: (*description).into() })?;
        }
    }
    for (code, description) in ELEMENTS {
        if access.get_element(code).is_none() {
            access.create_element(BusinessElement {
                code: (*code).into(),
                description: (*description).into(),
            })?;
        }
    }
    for (code, _) in ELEMENTS {
        let rules = [
            all_flags("admin", code),
            manager_flags("manager", code),
            if *code == "products" { own_rw_flags("user", code) } else { own_read_flags("user", code) },
            own_read_flags("guest", code),
        ];
        for rule in rules {
            if access.rule_for(&rule.role, &rule.element).is_none() {
                access.create_rule(rule)?;
            }
        }
    }
    info!(target: "authgate::seed", "access data seeded");
    Ok(())
}

/// Create an active admin subject when none exists for `email`. Returns the
/// subject either way.
pub fn ensure_default_admin(
    subjects: &dyn SubjectStore,
    email: &str,
    password: &str,
) -> Result<Subject, AppError> {
    if let Some(existing) = subjects.find_by_email(email) {
        return Ok(existing);
    }
    let subject = Subject {
        id: uuid::Uuid::new_v4(),
        first_name: "Admin".into(),
        last_name: "Admin".into(),
        middle_name: String::new(),
        email: email.to_ascii_lowercase(),
        password_hash: hash_password(password)?,
        active: true,
        role: "admin".into(),
    };
    subjects.insert(subject.clone())?;
    info!(target: "authgate::seed", "default admin provisioned email={}", email);
    Ok(subject)
}
