//! Permission rule persistence seam: roles, business elements, and the rules
//! keyed by their (role, element) pair. Writes enforce the unique keys;
//! deleting either parent cascades to its rules. One lock guards all three
//! maps so a cascade is observed atomically.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::error::AppError;
use super::{BusinessElement, PermissionRule, Role};

pub trait AccessStore: Send + Sync {
    // --- roles ---
    fn create_role(&self, role: Role) -> Result<(), AppError>;
    fn get_role(&self, name: &str) -> Option<Role>;
    fn list_roles(&self) -> Vec<Role>;
    /// Role names are immutable; only the description changes.
    fn update_role(&self, name: &str, description: &str) -> Result<Role, AppError>;
    /// Deletes the role and every rule attached to it. The caller is
    /// responsible for refusing deletion while subjects still reference the
    /// role.
    fn delete_role(&self, name: &str) -> Result<(), AppError>;

    // --- business elements ---
    fn create_element(&self, element: BusinessElement) -> Result<(), AppError>;
    fn get_element(&self, code: &str) -> Option<BusinessElement>;
    fn list_elements(&self) -> Vec<BusinessElement>;
    fn update_element(&self, code: &str, description: &str) -> Result<BusinessElement, AppError>;
    /// Deletes the element and every rule attached to it.
    fn delete_element(&self, code: &str) -> Result<(), AppError>;

    // --- permission rules ---
    /// Fails with Conflict when a rule for the (role, element) pair already
    /// exists, NotFound when either parent is missing.
    fn create_rule(&self, rule: PermissionRule) -> Result<(), AppError>;
    fn update_rule(&self, rule: PermissionRule) -> Result<(), AppError>;
    fn delete_rule(&self, role: &str, element: &str) -> Result<(), AppError>;
    fn rule_for(&self, role: &str, element: &str) -> Option<PermissionRule>;
    /// All rules of one role, keyed by element code. Absent keys mean
    /// default-deny on that element.
    fn rules_for(&self, role: &str) -> HashMap<String, PermissionRule>;
    fn list_rules(&self) -> Vec<PermissionRule>;
}

#[derive(Default)]
struct Catalog {
    roles: HashMap<String, Role>,
    elements: HashMap<String, BusinessElement>,
    rules: HashMap<(String, String), PermissionRule>,
}

#[derive(Default)]
pub struct MemoryAccessStore {
    inner: RwLock<Catalog>,
}

impl MemoryAccessStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccessStore for MemoryAccessStore {
    fn create_role(&self, role: Role) -> Result<(), AppError> {
        let mut c = self.inner.write();
        if c.roles.contains_key(&role.name) {
            return Err(AppError::conflict("duplicate_role", "role already exists"));
        }
        info!(target: "authgate::access", "create role {}", role.name);
        c.roles.insert(role.name.clone(), role);
        Ok(())
    }

    fn get_role(&self, name: &str) -> Option<Role> {
        self.inner.read().roles.get(name).cloned()
    }

    fn list_roles(&self) -> Vec<Role> {
        let mut out: Vec<Role> = self.inner.read().roles.values().cloned().collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }

    fn update_role(&self, name: &str, description: &str) -> Result<Role, AppError> {
        let mut c = self.inner.write();
        let Some(role) = c.roles.get_mut(name) else {
            return Err(AppError::not_found("role_not_found", "no such role"));
        };
        role.description = description.to_string();
        Ok(role.clone())
    }

    fn delete_role(&self, name: &str) -> Result<(), AppError> {
        let mut c = self.inner.write();
        if c.roles.remove(name).is_none() {
            return Err(AppError::not_found("role_not_found", "no such role"));
        }
        c.rules.retain(|(r, _), _| r != name);
        info!(target: "authgate::access", "delete role {} (rules cascaded)", name);
        Ok(())
    }

    fn create_element(&self, element: BusinessElement) -> Result<(), AppError> {
        let mut c = self.inner.write();
        if c.elements.contains_key(&element.code) {
            return Err(AppError::conflict("duplicate_element", "element already exists"));
        }
        info!(target: "authgate::access", "create element {}", element.code);
        c.elements.insert(element.code.clone(), element);
        Ok(())
    }

    fn get_element(&self, code: &str) -> Option<BusinessElement> {
        self.inner.read().elements.get(code).cloned()
    }

    fn list_elements(&self) -> Vec<BusinessElement> {
        let mut out: Vec<BusinessElement> = self.inner.read().elements.values().cloned().collect();
        out.sort_by(|a, b| a.code.cmp(&b.code));
        out
    }

    fn update_element(&self, code: &str, description: &str) -> Result<BusinessElement, AppError> {
        let mut c = self.inner.write();
        let Some(element) = c.elements.get_mut(code) else {
            return Err(AppError::not_found("element_not_found", "no such element"));
        };
        element.description = description.to_string();
        Ok(element.clone())
    }

    fn delete_element(&self, code: &str) -> Result<(), AppError> {
        let mut c = self.inner.write();
        if c.elements.remove(code).is_none() {
            return Err(AppError::not_found("element_not_found", "no such element"));
        }
        c.rules.retain(|(_, e), _| e != code);
        info!(target: "authgate::access", "delete element {} (rules cascaded)", code);
        Ok(())
    }

    fn create_rule(&self, rule: PermissionRule) -> Result<(), AppError> {
        let mut c = self.inner.write();
        if !c.roles.contains_key(&rule.role) {
            return Err(AppError::not_found("role_not_found", "no such role"));
        }
        if !c.elements.contains_key(&rule.element) {
            return Err(AppError::not_found("element_not_found", "no such element"));
        }
        let key = (rule.role.clone(), rule.element.clone());
        if c.rules.contains_key(&key) {
            return Err(AppError::conflict(
                "duplicate_rule",
                "a rule for this role and element already exists",
            ));
        }
        debug!(target: "authgate::access", "create rule {}:{}", rule.role, rule.element);
        c.rules.insert(key, rule);
        Ok(())
    }

    fn update_rule(&self, rule: PermissionRule) -> Result<(), AppError> {
        let mut c = self.inner.write();
        let key = (rule.role.clone(), rule.element.clone());
        if !c.rules.contains_key(&key) {
            return Err(AppError::not_found("rule_not_found", "no such rule"));
        }
        c.rules.insert(key, rule);
        Ok(())
    }

    fn delete_rule(&self, role: &str, element: &str) -> Result<(), AppError> {
        let mut c = self.inner.write();
        let key = (role.to_string(), element.to_string());
        if c.rules.remove(&key).is_none() {
            return Err(AppError::not_found("rule_not_found", "no such rule"));
        }
        Ok(())
    }

    fn rule_for(&self, role: &str, element: &str) -> Option<PermissionRule> {
        self.inner
            .read()
            .rules
            .get(&(role.to_string(), element.to_string()))
            .cloned()
    }

    fn rules_for(&self, role: &str) -> HashMap<String, PermissionRule> {
        self.inner
            .read()
            .rules
            .iter()
            .filter(|((r, _), _)| r == role)
            .map(|((_, e), rule)| (e.clone(), rule.clone()))
            .collect()
    }

    fn list_rules(&self) -> Vec<PermissionRule> {
        let mut out: Vec<PermissionRule> = self.inner.read().rules.values().cloned().collect();
        out.sort_by(|a, b| (&a.role, &a.element).cmp(&(&b.role, &b.element)));
        out
    }
}
