//! RBAC tests: rule storage, the own/all decision engine, the seeded
//! permission matrix, and engine-gated admin CRUD.

use std::sync::Arc;

use anyhow::Result;
use uuid::Uuid;

use authgate::access::{
    AccessAdmin, AccessEngine, AccessScope, AccessStore, Action, BusinessElement, Decision,
    MemoryAccessStore, PermissionRule, Role,
};
use authgate::error::AppError;
use authgate::identity::{MemorySubjectStore, Principal, RequestContext, Subject, SubjectStore};
use authgate::tools::seed::{ensure_default_admin, seed_access_data};

fn principal(role: &str) -> Principal {
    Principal {
        subject_id: Uuid::new_v4(),
        email: format!("{}@example.com", role),
        role: role.into(),
    }
}

fn ctx_for(p: &Principal) -> RequestContext {
    RequestContext { principal: Some(p.clone()), token: None }
}

fn seeded_engine() -> AccessEngine {
    let _ = tracing_subscriber::fmt().with_env_filter("info").try_init();
    let access: Arc<dyn AccessStore> = Arc::new(MemoryAccessStore::new());
    seed_access_data(access.as_ref()).expect("seed");
    AccessEngine::new(access)
}

// Build an engine over exactly the given rules, creating parents on demand.
fn engine_with(rules: Vec<PermissionRule>) -> AccessEngine {
    let access: Arc<dyn AccessStore> = Arc::new(MemoryAccessStore::new());
    for rule in &rules {
        if access.get_role(&rule.role).is_none() {
            access
                .create_role(Role { name: rule.role.clone(), description: String::new() })
                .expect("role");
        }
        if access.get_element(&rule.element).is_none() {
            access
                .create_element(BusinessElement {
                    code: rule.element.clone(),
                    description: String::new(),
                })
                .expect("element");
        }
    }
    for rule in rules {
        access.create_rule(rule).expect("rule");
    }
    AccessEngine::new(access)
}

#[test]
fn anonymous_callers_are_always_denied() {
    let engine = seeded_engine();
    for action in [Action::Read, Action::Create, Action::Update, Action::Delete] {
        assert_eq!(engine.decide(None, "orders", action, None), Decision::deny());
    }
}

#[test]
fn missing_rule_means_default_deny() {
    let engine = engine_with(vec![PermissionRule {
        role: "guest".into(),
        element: "orders".into(),
        read: true,
        ..Default::default()
    }]);
    let p = principal("guest");
    // No rule for this element at all.
    assert_eq!(engine.decide(Some(&p), "products", Action::Read, None), Decision::deny());
    // Unknown role: same outcome.
    let stranger = principal("stranger");
    assert_eq!(engine.decide(Some(&stranger), "orders", Action::Read, None), Decision::deny());
}

#[test]
fn all_flag_dominates_base_flag() {
    // update_all set while the literal update flag is false.
    let engine = engine_with(vec![PermissionRule {
        role: "auditor".into(),
        element: "orders".into(),
        update_all: true,
        ..Default::default()
    }]);
    let p = principal("auditor");
    let someone_else = Uuid::new_v4();
    let d = engine.decide(Some(&p), "orders", Action::Update, Some(someone_else));
    assert_eq!(d, Decision::allow(AccessScope::All));
}

#[test]
fn base_flag_scopes_to_own_records() {
    let engine = engine_with(vec![PermissionRule {
        role: "user".into(),
        element: "products".into(),
        delete: true,
        ..Default::default()
    }]);
    let p = principal("user");

    // Own record: allowed.
    let own = engine.decide(Some(&p), "products", Action::Delete, Some(p.subject_id));
    assert_eq!(own, Decision::allow(AccessScope::Own));

    // Someone else's record: denied.
    let other = engine.decide(Some(&p), "products", Action::Delete, Some(Uuid::new_v4()));
    assert_eq!(other, Decision::deny());

    // Owner unknown: allowed with Own scope; the caller must verify
    // ownership before acting.
    let unknown = engine.decide(Some(&p), "products", Action::Delete, None);
    assert_eq!(unknown, Decision::allow(AccessScope::Own));
}

#[test]
fn guest_read_on_orders_scenario() {
    let engine = engine_with(vec![PermissionRule {
        role: "guest".into(),
        element: "orders".into(),
        read: true,
        ..Default::default()
    }]);
    let guest = principal("guest");
    let someone_else = Uuid::new_v4();
    // Owner not supplied: allowed, but only own-scoped.
    let d = engine.decide(Some(&guest), "orders", Action::Read, None);
    assert_eq!(d, Decision::allow(AccessScope::Own));
    // With the real owner supplied the engine resolves it directly.
    let d = engine.decide(Some(&guest), "orders", Action::Read, Some(someone_else));
    assert_eq!(d, Decision::deny());
}

#[test]
fn create_ignores_ownership() {
    let engine = engine_with(vec![PermissionRule {
        role: "user".into(),
        element: "products".into(),
        create: true,
        ..Default::default()
    }]);
    let p = principal("user");
    let d = engine.decide(Some(&p), "products", Action::Create, Some(Uuid::new_v4()));
    assert!(d.allowed);
    let d = engine.decide(Some(&p), "products", Action::Update, None);
    assert_eq!(d, Decision::deny());
}

#[test]
fn seeded_matrix_admin_manager_user_guest() {
    let engine = seeded_engine();
    let other = Uuid::new_v4();

    // Admin: everything, everywhere, any owner.
    let admin = principal("admin");
    for element in ["users", "products", "orders", "access_rules", "roles", "elements"] {
        for action in [Action::Read, Action::Update, Action::Delete] {
            let d = engine.decide(Some(&admin), element, action, Some(other));
            assert_eq!(d, Decision::allow(AccessScope::All), "admin on {}", element);
        }
        assert!(engine.decide(Some(&admin), element, Action::Create, None).allowed);
    }

    // Manager: reads everything, writes only own records.
    let manager = principal("manager");
    assert_eq!(
        engine.decide(Some(&manager), "orders", Action::Read, Some(other)),
        Decision::allow(AccessScope::All)
    );
    assert_eq!(
        engine.decide(Some(&manager), "orders", Action::Update, Some(other)),
        Decision::deny()
    );
    assert_eq!(
        engine.decide(Some(&manager), "orders", Action::Update, Some(manager.subject_id)),
        Decision::allow(AccessScope::Own)
    );

    // User: read-own everywhere, full own-write on products only.
    let user = principal("user");
    assert_eq!(engine.decide(Some(&user), "orders", Action::Read, Some(other)), Decision::deny());
    assert!(engine.decide(Some(&user), "products", Action::Create, None).allowed);
    assert_eq!(engine.decide(Some(&user), "orders", Action::Create, None), Decision::deny());

    // Guest: read-own only.
    let guest = principal("guest");
    assert_eq!(
        engine.decide(Some(&guest), "products", Action::Read, Some(guest.subject_id)),
        Decision::allow(AccessScope::Own)
    );
    assert_eq!(engine.decide(Some(&guest), "products", Action::Create, None), Decision::deny());
}

#[test]
fn seed_is_idempotent() -> Result<()> {
    let access: Arc<dyn AccessStore> = Arc::new(MemoryAccessStore::new());
    seed_access_data(access.as_ref())?;
    let roles = access.list_roles().len();
    let elements = access.list_elements().len();
    let rules = access.list_rules().len();
    seed_access_data(access.as_ref())?;
    assert_eq!(access.list_roles().len(), roles);
    assert_eq!(access.list_elements().len(), elements);
    assert_eq!(access.list_rules().len(), rules);
    // Four roles across six elements.
    assert_eq!(rules, 24);
    Ok(())
}

#[test]
fn duplicate_rules_and_missing_parents_are_rejected() {
    let access = MemoryAccessStore::new();
    access.create_role(Role { name: "guest".into(), description: String::new() }).unwrap();
    access
        .create_element(BusinessElement { code: "orders".into(), description: String::new() })
        .unwrap();

    let rule = PermissionRule {
        role: "guest".into(),
        element: "orders".into(),
        read: true,
        ..Default::default()
    };
    access.create_rule(rule.clone()).unwrap();
    assert!(matches!(access.create_rule(rule), Err(AppError::Conflict { .. })));

    let orphan = PermissionRule { role: "ghost".into(), element: "orders".into(), ..Default::default() };
    assert!(matches!(access.create_rule(orphan), Err(AppError::NotFound { .. })));
}

#[test]
fn deleting_parents_cascades_rules() {
    let access: Arc<dyn AccessStore> = Arc::new(MemoryAccessStore::new());
    seed_access_data(access.as_ref()).unwrap();
    assert!(!access.rules_for("guest").is_empty());
    access.delete_role("guest").unwrap();
    assert!(access.rules_for("guest").is_empty());

    let before = access.list_rules().len();
    let orders_rules = access.list_rules().iter().filter(|r| r.element == "orders").count();
    access.delete_element("orders").unwrap();
    assert_eq!(access.list_rules().len(), before - orders_rules);
    assert!(access.rule_for("admin", "orders").is_none());
}

#[test]
fn admin_surface_is_gated_by_the_engine() -> Result<()> {
    let access: Arc<dyn AccessStore> = Arc::new(MemoryAccessStore::new());
    seed_access_data(access.as_ref())?;
    let subjects: Arc<dyn SubjectStore> = Arc::new(MemorySubjectStore::new());
    let engine = Arc::new(AccessEngine::new(access.clone()));
    let admin_api = AccessAdmin::new(engine, subjects.clone());

    let admin = principal("admin");
    let user = principal("user");

    // Anonymous: 401.
    let err = admin_api.list_roles(&RequestContext::anonymous()).unwrap_err();
    assert_eq!(err.http_status(), 401);

    // Authenticated but unauthorized: 403. The seeded "user" grant on the
    // config elements is own-scoped, which never passes the admin gate.
    let err = admin_api.list_roles(&ctx_for(&user)).unwrap_err();
    assert_eq!(err.http_status(), 403);
    let err = admin_api
        .create_role(&ctx_for(&user), Role { name: "intern".into(), description: String::new() })
        .unwrap_err();
    assert_eq!(err.http_status(), 403);

    // Admin: full CRUD.
    let created = admin_api
        .create_role(&ctx_for(&admin), Role { name: "intern".into(), description: "temp".into() })?;
    assert_eq!(created.name, "intern");
    let dup = admin_api
        .create_role(&ctx_for(&admin), Role { name: "intern".into(), description: String::new() })
        .unwrap_err();
    assert!(matches!(dup, AppError::Conflict { .. }));

    let updated = admin_api.update_role(&ctx_for(&admin), "intern", "temporary staff")?;
    assert_eq!(updated.description, "temporary staff");

    admin_api.create_rule(
        &ctx_for(&admin),
        PermissionRule {
            role: "intern".into(),
            element: "orders".into(),
            read: true,
            ..Default::default()
        },
    )?;
    admin_api.delete_rule(&ctx_for(&admin), "intern", "orders")?;
    admin_api.delete_role(&ctx_for(&admin), "intern")?;
    assert!(access.get_role("intern").is_none());
    Ok(())
}

#[test]
fn own_scoped_grants_never_reach_config_records() -> Result<()> {
    let access: Arc<dyn AccessStore> = Arc::new(MemoryAccessStore::new());
    seed_access_data(access.as_ref())?;
    let subjects: Arc<dyn SubjectStore> = Arc::new(MemorySubjectStore::new());
    let engine = Arc::new(AccessEngine::new(access.clone()));
    let admin_api = AccessAdmin::new(engine.clone(), subjects);

    // The seeded manager grant on "access_rules" is own-scoped for update.
    let manager = principal("manager");
    let before = access.rule_for("manager", "access_rules").unwrap();
    assert!(before.update && !before.update_all);

    // A manager granting itself every flag must bounce off the admin gate,
    // since config records have no owner for an own-scoped grant to match.
    let grab = PermissionRule {
        role: "manager".into(),
        element: "access_rules".into(),
        read: true,
        read_all: true,
        create: true,
        update: true,
        update_all: true,
        delete: true,
        delete_all: true,
    };
    let err = admin_api.update_rule(&ctx_for(&manager), grab).unwrap_err();
    assert_eq!(err.http_status(), 403);

    // The stored rule is untouched and broad deletes stay denied.
    assert_eq!(access.rule_for("manager", "access_rules").unwrap(), before);
    assert_eq!(
        engine.decide(Some(&manager), "access_rules", Action::Delete, Some(Uuid::new_v4())),
        Decision::deny()
    );

    // Own-scoped reads don't expose the configuration either, while the
    // manager's all-scoped read passes.
    let guest = principal("guest");
    assert_eq!(admin_api.list_rules(&ctx_for(&guest)).unwrap_err().http_status(), 403);
    assert!(admin_api.list_rules(&ctx_for(&manager)).is_ok());
    Ok(())
}

#[test]
fn role_deletion_respects_referencing_subjects() -> Result<()> {
    let access: Arc<dyn AccessStore> = Arc::new(MemoryAccessStore::new());
    seed_access_data(access.as_ref())?;
    let subjects: Arc<dyn SubjectStore> = Arc::new(MemorySubjectStore::new());
    subjects.insert(Subject {
        id: Uuid::new_v4(),
        first_name: "Greta".into(),
        last_name: "Guest".into(),
        middle_name: String::new(),
        email: "greta@example.com".into(),
        password_hash: "$argon2id$fixture".into(),
        active: true,
        role: "guest".into(),
    })?;
    let engine = Arc::new(AccessEngine::new(access.clone()));
    let admin_api = AccessAdmin::new(engine, subjects.clone());
    let admin = principal("admin");

    let err = admin_api.delete_role(&ctx_for(&admin), "guest").unwrap_err();
    assert!(matches!(err, AppError::Conflict { .. }));
    assert!(access.get_role("guest").is_some());
    Ok(())
}

#[test]
fn default_admin_is_provisioned_once_and_gets_full_access() -> Result<()> {
    let access: Arc<dyn AccessStore> = Arc::new(MemoryAccessStore::new());
    seed_access_data(access.as_ref())?;
    let subjects: Arc<dyn SubjectStore> = Arc::new(MemorySubjectStore::new());

    let first = ensure_default_admin(subjects.as_ref(), "root@example.com", "changeme")?;
    assert_eq!(first.role, "admin");
    assert!(first.password_hash.starts_with("$argon2"));
    // Second call returns the existing subject instead of inserting.
    let second = ensure_default_admin(subjects.as_ref(), "root@example.com", "changeme")?;
    assert_eq!(second.id, first.id);

    let engine = AccessEngine::new(access);
    let admin = Principal { subject_id: first.id, email: first.email, role: first.role };
    let d = engine.decide(Some(&admin), "access_rules", Action::Update, Some(Uuid::new_v4()));
    assert_eq!(d, Decision::allow(AccessScope::All));
    Ok(())
}

#[test]
fn rules_for_returns_the_per_element_map() -> Result<()> {
    let access: Arc<dyn AccessStore> = Arc::new(MemoryAccessStore::new());
    seed_access_data(access.as_ref())?;
    let map = access.rules_for("manager");
    assert_eq!(map.len(), 6);
    let orders = &map["orders"];
    assert!(orders.read_all && orders.create && !orders.update_all);
    Ok(())
}
