//! Request handlers
//!
//! The inbound boundary: establish an identity from the session cookie (fast
//! path) or the `Authorization` header (slow path, then populate the session
//! cache), and run federation for a role-mapping id. Identity travels as an
//! explicit parameter from authentication to authorization to federation.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::{
        header::{AUTHORIZATION, COOKIE, SET_COOKIE},
        HeaderMap, HeaderValue,
    },
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use fedgate_auth::AuthEngine;
use fedgate_core::Identity;
use serde::Serialize;
use tracing::debug;

use crate::error::{GatewayError, Result};
use crate::federate::FederationService;
use crate::session::{CookieCodec, SessionCache, SessionTicket};

/// Application state shared across handlers
pub struct AppState {
    /// Mechanism dispatch and authentication
    pub engine: AuthEngine,
    /// Process-wide session cache
    pub sessions: Arc<SessionCache>,
    /// Session cookie sealing
    pub cookies: CookieCodec,
    /// Federation pipeline
    pub federation: FederationService,
    /// Sliding idle timeout applied to new sessions
    pub session_active_timeout: Duration,
    /// Hard session lifetime applied to new sessions
    pub session_total_duration: Duration,
}

/// Identity summary returned from authentication
#[derive(Serialize)]
pub struct AuthResponse {
    pub username: String,
    pub domain: String,
    pub display_name: String,
    pub human: bool,
    pub attributes: Vec<String>,
}

impl From<&Identity> for AuthResponse {
    fn from(identity: &Identity) -> Self {
        let mut attributes: Vec<String> = identity.attributes().iter().cloned().collect();
        attributes.sort();
        Self {
            username: identity.username().to_string(),
            domain: identity.domain().to_string(),
            display_name: identity.display_name().to_string(),
            human: identity.human(),
            attributes,
        }
    }
}

/// Temporary credential payload returned from federation
#[derive(Serialize)]
pub struct FederateResponse {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
    pub expiration: DateTime<Utc>,
}

/// Establish the caller's identity.
///
/// Session-cookie fast path first; otherwise the `Authorization` header goes
/// through mechanism dispatch and, on success, a new cache entry and sealed
/// cookie are issued.
async fn establish_identity(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<(Arc<Identity>, Option<String>)> {
    if let Some(cookie_header) = headers.get(COOKIE).and_then(|v| v.to_str().ok()) {
        if let Some(ticket) = state.cookies.open(cookie_header) {
            if let Some(identity) = state.sessions.validate(&ticket.session_id, &ticket.secret) {
                debug!(username = identity.username(), "Session fast path hit");
                return Ok((identity, None));
            }
        }
    }

    let header = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            GatewayError::CredentialInvalid("no valid session and no authorization header".into())
        })?;

    let identity = Arc::new(state.engine.authenticate(header).await?);

    let secret = SessionCache::generate_secret();
    state.sessions.add(
        secret.clone(),
        identity.clone(),
        state.session_active_timeout,
        state.session_total_duration,
    );
    let cookie = state.cookies.seal(&SessionTicket {
        session_id: identity.session_id().to_string(),
        secret,
    })?;
    Ok((identity, Some(cookie)))
}

fn with_session_cookie(mut response: Response, cookie: Option<String>) -> Result<Response> {
    if let Some(cookie) = cookie {
        let value = HeaderValue::from_str(&cookie)
            .map_err(|e| GatewayError::Configuration(format!("session cookie header: {}", e)))?;
        response.headers_mut().insert(SET_COOKIE, value);
    }
    Ok(response)
}

/// Authenticate and open a session
///
/// POST /v1/auth
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response> {
    let (identity, cookie) = establish_identity(&state, &headers).await?;
    let response = Json(AuthResponse::from(identity.as_ref())).into_response();
    with_session_cookie(response, cookie)
}

/// Federate: exchange the caller's authorization for a temporary credential
///
/// POST /v1/federate/:mapping_id
pub async fn federate(
    State(state): State<Arc<AppState>>,
    Path(mapping_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response> {
    let (identity, cookie) = establish_identity(&state, &headers).await?;
    let credential = state.federation.federate(&identity, &mapping_id).await?;
    let response = Json(FederateResponse {
        access_key_id: credential.access_key_id,
        secret_access_key: credential.secret_access_key,
        session_token: credential.session_token,
        expiration: credential.expiration,
    })
    .into_response();
    with_session_cookie(response, cookie)
}
