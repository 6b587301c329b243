//! Identity: credential issue/verify, revocation, and resolution of inbound
//! bearer credentials into a concrete principal or anonymous.
//! Keep the public surface thin and split implementation across sub-modules.

mod codec;
mod principal;
mod provider;
mod request_context;
mod resolver;
mod revocation;
mod subjects;

pub use codec::{TokenClaims, TokenCodec};
pub use principal::{Principal, Subject, SubjectId};
pub use provider::{AuthProvider, LoginRequest, LoginResponse, ProfileUpdate, RegisterRequest};
pub use request_context::RequestContext;
pub use resolver::IdentityResolver;
pub use revocation::{MemoryRevocationList, RevocationStore};
pub use subjects::{MemorySubjectStore, SubjectStore};
