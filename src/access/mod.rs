//! Access control: permission rules per (role, business element) and the
//! decision engine that scopes grants to own records or all records.

mod admin;
mod engine;
mod model;
mod store;

pub use admin::AccessAdmin;
pub use engine::AccessEngine;
pub use model::{AccessScope, Action, BusinessElement, Decision, PermissionRule, Role};
pub use store::{AccessStore, MemoryAccessStore};
