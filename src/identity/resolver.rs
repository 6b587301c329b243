//! Turns an inbound Authorization header into a resolved caller. Every
//! failure mode (missing header, bad scheme, bad signature, expiry,
//! revocation, unknown or inactive subject) downgrades silently to
//! anonymous, so downstream authorization only ever sees a principal or
//! none, never a credential error.

use std::sync::Arc;

use crate::tprintln;

use super::{Principal, RequestContext, RevocationStore, SubjectStore, TokenCodec};

pub struct IdentityResolver {
    codec: Arc<TokenCodec>,
    revocations: Arc<dyn RevocationStore>,
    subjects: Arc<dyn SubjectStore>,
}

impl IdentityResolver {
    pub fn new(
        codec: Arc<TokenCodec>,
        revocations: Arc<dyn RevocationStore>,
        subjects: Arc<dyn SubjectStore>,
    ) -> Self {
        Self { codec, revocations, subjects }
    }

    pub fn resolve(&self, authorization: Option<&str>) -> RequestContext {
        let Some(header) = authorization else { return RequestContext::anonymous() };
        if header.trim().is_empty() {
            return RequestContext::anonymous();
        }
        // Scheme must be exactly `Bearer <token>`: case-sensitive, one space.
        let Some(token) = header.strip_prefix("Bearer ") else {
            return RequestContext::anonymous();
        };
        if token.is_empty() || token.starts_with(' ') {
            return RequestContext::anonymous();
        }
        let claims = match self.codec.verify(token) {
            Ok(c) => c,
            Err(e) => {
                tprintln!("resolve: credential rejected ({})", e);
                return RequestContext::anonymous();
            }
        };
        if self.revocations.is_revoked(token) {
            tprintln!("resolve: token revoked sub={}", claims.sub);
            return RequestContext::anonymous();
        }
        let Some(subject) = self.subjects.find_by_id(claims.sub) else {
            return RequestContext::anonymous();
        };
        if !subject.active {
            return RequestContext::anonymous();
        }
        RequestContext {
            principal: Some(Principal::of(&subject)),
            token: Some(token.to_string()),
        }
    }
}
