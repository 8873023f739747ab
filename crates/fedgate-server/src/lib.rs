//! Federation Gateway Server
//!
//! The gateway authenticates a caller, resolves whether that caller may
//! assume a stored role mapping's IAM role, and exchanges the mapped
//! federation user's long-lived credential for a short-lived STS credential,
//! auditing every decision.
//!
//! ## Request flow
//!
//! 1. Session cookie fast path ([`session::SessionCache`]) or mechanism
//!    dispatch slow path (`fedgate-auth`), yielding an `Identity`
//! 2. Role-mapping authorization ([`authz::Authorizer`])
//! 3. Credential federation ([`federate::FederationService`]): secret-store
//!    credential load, session-name templating, STS assume-role
//! 4. One audit record per attempt ([`audit::AuditRecorder`]), success or not
//!
//! ## API Endpoints
//!
//! - `GET /health` - Liveness check
//! - `GET /ready` - Readiness check with session-cache stats
//! - `POST /v1/auth` - Establish an identity and a session cookie
//! - `POST /v1/federate/:mapping_id` - Exchange for a temporary credential

pub mod api;
pub mod audit;
pub mod authz;
pub mod config;
pub mod error;
pub mod federate;
pub mod secrets;
pub mod session;
pub mod storage;
pub mod sts;

pub use api::{create_router, AppState};
pub use audit::{AuditRecorder, AuditSink, TracingAuditSink};
pub use authz::{Authorizer, FederationParams};
pub use config::GatewayConfig;
pub use error::GatewayError;
pub use federate::FederationService;
pub use secrets::{MemorySecretStore, SecretStore, VaultSecretStore};
pub use session::{CookieCodec, SessionCache, SessionTicket};
pub use storage::{MappingStore, MemoryMappingStore, RoleMapping};
pub use sts::{AssumeRoleRequest, StsTokenService, TemporaryCredential, TokenService};
