use super::Principal;

/// Per-request caller identity. `principal == None` means anonymous; the raw
/// bearer token is kept alongside so logout can revoke exactly what the
/// caller presented.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub principal: Option<Principal>,
    pub token: Option<String>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_anonymous(&self) -> bool {
        self.principal.is_none()
    }
}
