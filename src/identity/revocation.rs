//! Token revocation denylist. The core only depends on the capability pair
//! `revoke`/`is_revoked`; deployments can back it with a shared external
//! store while tests use the in-memory set.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

pub trait RevocationStore: Send + Sync {
    /// Idempotent insert: revoking an already-revoked token is a no-op.
    fn revoke(&self, token: &str, expires_at: DateTime<Utc>);
    fn is_revoked(&self, token: &str) -> bool;
    /// Optional storage-bound GC. Entries past their natural expiry can be
    /// dropped because the codec rejects those tokens anyway. Returns the
    /// number of entries removed.
    fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let _ = now;
        0
    }
}

#[derive(Default)]
pub struct MemoryRevocationList {
    revoked: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl MemoryRevocationList {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RevocationStore for MemoryRevocationList {
    fn revoke(&self, token: &str, expires_at: DateTime<Utc>) {
        // Single insert under one write lock: a cancelled logout either fully
        // lands or leaves the token unrevoked.
        let mut m = self.revoked.write();
        m.entry(token.to_string()).or_insert(expires_at);
    }

    fn is_revoked(&self, token: &str) -> bool {
        self.revoked.read().contains_key(token)
    }

    fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let mut m = self.revoked.write();
        let before = m.len();
        m.retain(|_, exp| *exp > now);
        before - m.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn revoke_is_idempotent() {
        let list = MemoryRevocationList::new();
        let exp = Utc::now() + Duration::hours(1);
        assert!(!list.is_revoked("tok"));
        list.revoke("tok", exp);
        assert!(list.is_revoked("tok"));
        // Second revoke: no error, no change.
        list.revoke("tok", exp + Duration::hours(1));
        assert!(list.is_revoked("tok"));
    }

    #[test]
    fn purge_drops_only_expired_entries() {
        let list = MemoryRevocationList::new();
        let now = Utc::now();
        list.revoke("old", now - Duration::minutes(5));
        list.revoke("live", now + Duration::minutes(5));
        assert_eq!(list.purge_expired(now), 1);
        assert!(!list.is_revoked("old"));
        assert!(list.is_revoked("live"));
    }
}
