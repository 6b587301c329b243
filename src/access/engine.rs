//! The access decision engine. Given a resolved caller, a business element,
//! an action, and (optionally) the owner of the concrete resource, it returns
//! an allow/deny decision scoped to own records or all records. Deny is a
//! normal outcome, never an error; identity must already be resolved before
//! asking (resolver → engine ordering is strict within a request).

use std::sync::Arc;

use crate::identity::{Principal, SubjectId};

use super::{AccessScope, AccessStore, Action, Decision};

pub struct AccessEngine {
    access: Arc<dyn AccessStore>,
}

impl AccessEngine {
    pub fn new(access: Arc<dyn AccessStore>) -> Self {
        Self { access }
    }

    pub fn store(&self) -> &Arc<dyn AccessStore> {
        &self.access
    }

    /// Decide whether `principal` may perform `action` on `element`.
    ///
    /// With `resource_owner` supplied, an own-scoped grant allows the action
    /// only when the owner is the caller. With it absent, an own-scoped grant
    /// returns `allowed=true, scope=Own` and the caller must filter or verify
    /// ownership itself before touching any record.
    pub fn decide(
        &self,
        principal: Option<&Principal>,
        element: &str,
        action: Action,
        resource_owner: Option<SubjectId>,
    ) -> Decision {
        // Anonymous callers never reach a rule; registration and login are
        // the only anonymous operations and they bypass this engine.
        let Some(p) = principal else { return Decision::deny() };
        // Default-deny: no rule for the pair means no permission.
        let Some(rule) = self.access.rule_for(&p.role, element) else {
            return Decision::deny();
        };
        match rule.scope_for(action) {
            AccessScope::All => Decision::allow(AccessScope::All),
            AccessScope::Own => match resource_owner {
                Some(owner) if owner == p.subject_id => Decision::allow(AccessScope::Own),
                Some(_) => Decision::deny(),
                None => Decision::allow(AccessScope::Own),
            },
            AccessScope::None => Decision::deny(),
        }
    }
}
