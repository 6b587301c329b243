//! Admin CRUD over the access configuration, gated by the decision engine
//! itself: roles, elements, and rules are business elements in their own
//! right, so the RBAC system protects its own configuration.

use std::sync::Arc;

use crate::error::AppError;
use crate::identity::{RequestContext, SubjectStore};

use super::{AccessEngine, AccessScope, Action, BusinessElement, PermissionRule, Role};

pub const ELEMENT_ROLES: &str = "roles";
pub const ELEMENT_ELEMENTS: &str = "elements";
pub const ELEMENT_ACCESS_RULES: &str = "access_rules";

pub struct AccessAdmin {
    engine: Arc<AccessEngine>,
    subjects: Arc<dyn SubjectStore>,
}

impl AccessAdmin {
    pub fn new(engine: Arc<AccessEngine>, subjects: Arc<dyn SubjectStore>) -> Self {
        Self { engine, subjects }
    }

    /// Gate one admin operation. Config records have no owner, so an
    /// own-scoped grant has nothing to attach to: only an all-scoped grant
    /// passes. Anything less would let an own-only `update` flag rewrite
    /// rules belonging to every role. Anonymous denials map to 401 and
    /// authenticated denials to 403.
    fn require(&self, ctx: &RequestContext, element: &str, action: Action) -> Result<(), AppError> {
        let decision = self.engine.decide(ctx.principal.as_ref(), element, action, None);
        if decision.allowed && decision.scope == AccessScope::All {
            return Ok(());
        }
        match &ctx.principal {
            None => Err(AppError::auth("unauthorized", "authentication required")),
            Some(_) => Err(AppError::forbidden("forbidden", "access denied")),
        }
    }

    // --- roles ---

    pub fn list_roles(&self, ctx: &RequestContext) -> Result<Vec<Role>, AppError> {
        self.require(ctx, ELEMENT_ROLES, Action::Read)?;
        Ok(self.engine.store().list_roles())
    }

    pub fn get_role(&self, ctx: &RequestContext, name: &str) -> Result<Role, AppError> {
        self.require(ctx, ELEMENT_ROLES, Action::Read)?;
        self.engine
            .store()
            .get_role(name)
            .ok_or_else(|| AppError::not_found("role_not_found", "no such role"))
    }

    pub fn create_role(&self, ctx: &RequestContext, role: Role) -> Result<Role, AppError> {
        self.require(ctx, ELEMENT_ROLES, Action::Create)?;
        if role.name.trim().is_empty() {
            return Err(AppError::validation("name", "role name must not be empty"));
        }
        self.engine.store().create_role(role.clone())?;
        Ok(role)
    }

    pub fn update_role(
        &self,
        ctx: &RequestContext,
        name: &str,
        description: &str,
    ) -> Result<Role, AppError> {
        self.require(ctx, ELEMENT_ROLES, Action::Update)?;
        self.engine.store().update_role(name, description)
    }

    /// Refuses while any subject still references the role.
    pub fn delete_role(&self, ctx: &RequestContext, name: &str) -> Result<(), AppError> {
        self.require(ctx, ELEMENT_ROLES, Action::Delete)?;
        if self.subjects.role_in_use(name) {
            return Err(AppError::conflict("role_in_use", "subjects still reference this role"));
        }
        self.engine.store().delete_role(name)
    }

    // --- business elements ---

    pub fn list_elements(&self, ctx: &RequestContext) -> Result<Vec<BusinessElement>, AppError> {
        self.require(ctx, ELEMENT_ELEMENTS, Action::Read)?;
        Ok(self.engine.store().list_elements())
    }

    pub fn get_element(&self, ctx: &RequestContext, code: &str) -> Result<BusinessElement, AppError> {
        self.require(ctx, ELEMENT_ELEMENTS, Action::Read)?;
        self.engine
            .store()
            .get_element(code)
            .ok_or_else(|| AppError::not_found("element_not_found", "no such element"))
    }

    pub fn create_element(
        &self,
        ctx: &RequestContext,
        element: BusinessElement,
    ) -> Result<BusinessElement, AppError> {
        self.require(ctx, ELEMENT_ELEMENTS, Action::Create)?;
        if element.code.trim().is_empty() {
            return Err(AppError::validation("code", "element code must not be empty"));
        }
        self.engine.store().create_element(element.clone())?;
        Ok(element)
    }

    pub fn update_element(
        &self,
        ctx: &RequestContext,
        code: &str,
        description: &str,
    ) -> Result<BusinessElement, AppError> {
        self.require(ctx, ELEMENT_ELEMENTS, Action::Update)?;
        self.engine.store().update_element(code, description)
    }

    pub fn delete_element(&self, ctx: &RequestContext, code: &str) -> Result<(), AppError> {
        self.require(ctx, ELEMENT_ELEMENTS, Action::Delete)?;
        self.engine.store().delete_element(code)
    }

    // --- permission rules ---

    pub fn list_rules(&self, ctx: &RequestContext) -> Result<Vec<PermissionRule>, AppError> {
        self.require(ctx, ELEMENT_ACCESS_RULES, Action::Read)?;
        Ok(self.engine.store().list_rules())
    }

    pub fn create_rule(
        &self,
        ctx: &RequestContext,
        rule: PermissionRule,
    ) -> Result<PermissionRule, AppError> {
        self.require(ctx, ELEMENT_ACCESS_RULES, Action::Create)?;
        self.engine.store().create_rule(rule.clone())?;
        Ok(rule)
    }

    pub fn update_rule(
        &self,
        ctx: &RequestContext,
        rule: PermissionRule,
    ) -> Result<PermissionRule, AppError> {
        self.require(ctx, ELEMENT_ACCESS_RULES, Action::Update)?;
        self.engine.store().update_rule(rule.clone())?;
        Ok(rule)
    }

    pub fn delete_rule(
        &self,
        ctx: &RequestContext,
        role: &str,
        element: &str,
    ) -> Result<(), AppError> {
        self.require(ctx, ELEMENT_ACCESS_RULES, Action::Delete)?;
        self.engine.store().delete_rule(role, element)
    }
}
