//! Audit outcome records
//!
//! Every authorization and federation attempt produces exactly one
//! `AuditDetail`, serialized to URL-escaped JSON and appended to an audit
//! line handed to the log sink. Details are write-once.

use serde::Serialize;

/// Event type label carried on every audit line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditEvent {
    /// An authorization decision for a role mapping
    Authorization,
    /// A credential federation attempt
    Federation,
}

impl std::fmt::Display for AuditEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditEvent::Authorization => write!(f, "authorization"),
            AuditEvent::Federation => write!(f, "federation"),
        }
    }
}

/// Outcome record for one authorization or federation attempt
#[derive(Debug, Clone, Serialize)]
pub struct AuditDetail {
    /// Whether the attempt succeeded
    pub successful: bool,
    /// Role mapping identifier, or a placeholder when unavailable
    pub role_mapping_id: String,
    /// Target role ARN, or a placeholder when unavailable
    pub role_arn: String,
    /// Computed role session name
    pub session_name: String,
    /// Session duration in seconds, 0 when the service default applies
    pub session_duration: i32,
    /// Federation user whose credential performed the exchange
    pub federation_user_arn: String,
    /// Free-text comment (failure reason or assumed-role id)
    pub comment: String,
}

impl AuditDetail {
    /// Placeholder for fields whose value never became available
    pub const UNKNOWN: &'static str = "-";

    /// A failure detail with placeholders for every unresolved field
    pub fn failure(role_mapping_id: &str, comment: impl Into<String>) -> Self {
        Self {
            successful: false,
            role_mapping_id: role_mapping_id.to_string(),
            role_arn: Self::UNKNOWN.into(),
            session_name: Self::UNKNOWN.into(),
            session_duration: 0,
            federation_user_arn: Self::UNKNOWN.into(),
            comment: comment.into(),
        }
    }

    /// Serialize to a URL-escaped JSON blob for the audit line.
    ///
    /// Serialization of this struct cannot fail; the fallback keeps the
    /// recorder fire-and-forget.
    pub fn to_line(&self) -> String {
        let json = serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"successful":false,"comment":"unserializable"}"#.into());
        urlencoding::encode(&json).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_is_url_escaped_json() {
        let detail = AuditDetail {
            successful: true,
            role_mapping_id: "6bdb8e74-32bb-46cd-9b1c-33eb5eab2ba0".into(),
            role_arn: "arn:aws:iam::123456789012:role/MyRole".into(),
            session_name: "alice:example/alice-true".into(),
            session_duration: 3600,
            federation_user_arn: "arn:aws:iam::123456789012:user/federation".into(),
            comment: "assumed".into(),
        };
        let line = detail.to_line();
        assert!(!line.contains('{'));
        assert!(!line.contains('"'));

        let decoded = urlencoding::decode(&line).unwrap();
        let value: serde_json::Value = serde_json::from_str(&decoded).unwrap();
        assert_eq!(value["successful"], true);
        assert_eq!(value["session_duration"], 3600);
    }

    #[test]
    fn test_failure_uses_placeholders() {
        let detail = AuditDetail::failure("bad-id", "mapping not found");
        assert!(!detail.successful);
        assert_eq!(detail.role_arn, AuditDetail::UNKNOWN);
        assert_eq!(detail.federation_user_arn, AuditDetail::UNKNOWN);
        assert_eq!(detail.comment, "mapping not found");
    }
}
