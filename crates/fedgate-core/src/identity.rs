//! Authenticated principal
//!
//! An `Identity` is created by an authenticator on successful authentication
//! and is read-only thereafter; its authorization attributes never change for
//! the lifetime of its session. The session identifier is unique per
//! authentication event.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// An authenticated principal
#[derive(Debug, Clone, Serialize)]
pub struct Identity {
    username: String,
    domain: String,
    display_name: String,
    human: bool,
    authn_time: DateTime<Utc>,
    session_id: String,
    attributes: HashSet<String>,
}

impl Identity {
    /// Create an identity for a freshly authenticated principal.
    ///
    /// A new session identifier is generated; callers that receive a
    /// mechanism-issued session identifier override it with
    /// [`with_session_id`](Identity::with_session_id).
    pub fn new(username: impl Into<String>, domain: impl Into<String>) -> Self {
        let username = username.into();
        Self {
            display_name: username.clone(),
            username,
            domain: domain.into(),
            human: true,
            authn_time: Utc::now(),
            session_id: Uuid::new_v4().to_string(),
            attributes: HashSet::new(),
        }
    }

    /// Set the display name
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Mark the principal as human or service
    pub fn with_human(mut self, human: bool) -> Self {
        self.human = human;
        self
    }

    /// Use a mechanism-issued session identifier
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }

    /// Set the authorization attributes granted to this principal
    pub fn with_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn human(&self) -> bool {
        self.human
    }

    pub fn authn_time(&self) -> DateTime<Utc> {
        self.authn_time
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn attributes(&self) -> &HashSet<String> {
        &self.attributes
    }

    /// Whether this principal holds the given authorization attribute
    /// (exact-string, case-sensitive)
    pub fn has_attribute(&self, attribute: &str) -> bool {
        self.attributes.contains(attribute)
    }

    /// Render a role session name from a template, substituting
    /// `${username}`, `${displayname}`, `${domain}` and `${human}`
    /// (rendered as `true`/`false`).
    pub fn render_session_name(&self, template: &str) -> String {
        template
            .replace("${username}", &self.username)
            .replace("${displayname}", &self.display_name)
            .replace("${domain}", &self.domain)
            .replace("${human}", if self.human { "true" } else { "false" })
    }
}
