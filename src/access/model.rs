use serde::{Deserialize, Serialize};

/// Role identity is its name; only the description may change after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Role {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A named category of protected resource, e.g. "orders".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BusinessElement {
    pub code: String,
    #[serde(default)]
    pub description: String,
}

/// Seven permission flags for one (role, element) pair. At most one rule may
/// exist per pair; absence of a rule means no permission at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PermissionRule {
    pub role: String,
    pub element: String,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub read_all: bool,
    #[serde(default)]
    pub create: bool,
    #[serde(default)]
    pub update: bool,
    #[serde(default)]
    pub update_all: bool,
    #[serde(default)]
    pub delete: bool,
    #[serde(default)]
    pub delete_all: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
}

/// Breadth of a grant. The derived order `None < Own < All` is what makes an
/// `_all` flag dominate its base counterpart: folding flags into this enum
/// leaves no way to express the inconsistent combinations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AccessScope {
    None,
    Own,
    All,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    /// `Own` means the caller may only touch records it owns. When the
    /// resource owner was not supplied to `decide`, an `allowed=true, Own`
    /// decision obliges the caller to filter or verify ownership itself
    /// before acting; it is not permission on any specific record.
    pub scope: AccessScope,
}

impl Decision {
    pub fn allow(scope: AccessScope) -> Self {
        Self { allowed: true, scope }
    }
    pub fn deny() -> Self {
        Self { allowed: false, scope: AccessScope::None }
    }
}

impl PermissionRule {
    /// Fold the flag pair for `action` into a scope. The `_all` flag is
    /// checked first, so `update_all=true` grants All even when the literal
    /// `update` flag is false. Create has no ownership dimension and maps to
    /// All when granted.
    pub fn scope_for(&self, action: Action) -> AccessScope {
        let (base, all) = match action {
            Action::Read => (self.read, self.read_all),
            Action::Create => (self.create, self.create),
            Action::Update => (self.update, self.update_all),
            Action::Delete => (self.delete, self.delete_all),
        };
        if all {
            AccessScope::All
        } else if base {
            AccessScope::Own
        } else {
            AccessScope::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule() -> PermissionRule {
        PermissionRule { role: "manager".into(), element: "orders".into(), ..Default::default() }
    }

    #[test]
    fn scope_order_encodes_dominance() {
        assert!(AccessScope::None < AccessScope::Own);
        assert!(AccessScope::Own < AccessScope::All);
    }

    #[test]
    fn all_flag_dominates_base_flag() {
        let r = PermissionRule { update_all: true, update: false, ..rule() };
        assert_eq!(r.scope_for(Action::Update), AccessScope::All);
    }

    #[test]
    fn base_flag_alone_scopes_to_own() {
        let r = PermissionRule { delete: true, ..rule() };
        assert_eq!(r.scope_for(Action::Delete), AccessScope::Own);
        assert_eq!(r.scope_for(Action::Read), AccessScope::None);
    }

    #[test]
    fn rule_json_defaults_omitted_flags_to_false() {
        let json = r#"{"role":"guest","element":"orders","read":true}"#;
        let r: PermissionRule = serde_json::from_str(json).unwrap();
        assert!(r.read);
        assert!(!r.read_all && !r.create && !r.update && !r.delete);
        assert_eq!(serde_json::to_value(&r).unwrap()["element"], "orders");
    }

    #[test]
    fn create_is_unscoped() {
        let r = PermissionRule { create: true, ..rule() };
        assert_eq!(r.scope_for(Action::Create), AccessScope::All);
        assert_eq!(rule().scope_for(Action::Create), AccessScope::None);
    }
}
