//! LDAP-Bind Basic mechanism
//!
//! Proves a password by directory rebind: the service account binds and
//! searches for exactly one entry matching the username, then the connection
//! rebinds as that entry's DN with the supplied password. The entry's
//! group-membership attribute values become the identity's authorization
//! attributes.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use fedgate_core::{BasicCredentials, Identity};
use ldap3::{ldap_escape, Ldap, LdapConnAsync, LdapConnSettings, LdapError, Scope, SearchEntry};
use tracing::{debug, warn};

use crate::authenticator::Authenticator;
use crate::config::LdapConfig;
use crate::error::{AuthError, Result};

/// invalidCredentials per RFC 4511
const RC_INVALID_CREDENTIALS: u32 = 49;

/// A directory entry returned by a search
#[derive(Debug, Clone)]
pub struct DirectoryEntry {
    pub dn: String,
    pub attributes: HashMap<String, Vec<String>>,
}

/// Client-side directory boundary.
///
/// `bind` returns `Ok(false)` when the directory rejects the credentials and
/// `Err` only for transport or server trouble.
#[async_trait]
pub trait Directory: Send + Sync {
    async fn bind(&self, dn: &str, password: &str) -> Result<bool>;

    async fn search(
        &self,
        base_dn: &str,
        filter: &str,
        attributes: &[String],
    ) -> Result<Vec<DirectoryEntry>>;
}

/// Directory implementation backed by an LDAP server
pub struct LdapDirectory {
    config: LdapConfig,
}

impl LdapDirectory {
    pub fn new(config: LdapConfig) -> Self {
        Self { config }
    }

    async fn connect(&self) -> Result<Ldap> {
        let settings = LdapConnSettings::new().set_conn_timeout(self.config.timeout);
        let (conn, ldap) = LdapConnAsync::with_settings(settings, &self.config.url).await?;
        tokio::spawn(async move {
            if let Err(err) = conn.drive().await {
                warn!(error = %err, "LDAP connection terminated");
            }
        });
        Ok(ldap)
    }
}

#[async_trait]
impl Directory for LdapDirectory {
    async fn bind(&self, dn: &str, password: &str) -> Result<bool> {
        let mut ldap = self.connect().await?;
        let outcome = match ldap.simple_bind(dn, password).await?.success() {
            Ok(_) => Ok(true),
            Err(LdapError::LdapResult { result }) if result.rc == RC_INVALID_CREDENTIALS => {
                Ok(false)
            }
            Err(err) => Err(err.into()),
        };
        ldap.unbind().await.ok();
        outcome
    }

    async fn search(
        &self,
        base_dn: &str,
        filter: &str,
        attributes: &[String],
    ) -> Result<Vec<DirectoryEntry>> {
        let mut ldap = self.connect().await?;

        // search runs under the service account
        ldap.simple_bind(&self.config.bind_dn, &self.config.bind_password)
            .await?
            .success()
            .map_err(|e| AuthError::Configuration(format!("service account bind failed: {}", e)))?;

        let (entries, _res) = ldap
            .search(base_dn, Scope::Subtree, filter, attributes)
            .await?
            .success()?;
        ldap.unbind().await.ok();

        Ok(entries
            .into_iter()
            .map(|entry| {
                let entry = SearchEntry::construct(entry);
                DirectoryEntry {
                    dn: entry.dn,
                    attributes: entry.attrs,
                }
            })
            .collect())
    }
}

/// The LDAP-bind Basic mechanism variant
pub struct LdapBasicAuthenticator {
    credential: String,
    config: LdapConfig,
    directory: Arc<dyn Directory>,
}

impl LdapBasicAuthenticator {
    pub fn new(credential: String, config: LdapConfig, directory: Arc<dyn Directory>) -> Self {
        Self {
            credential,
            config,
            directory,
        }
    }

    fn filter(&self, username: &str) -> String {
        let username = ldap_escape(username);
        match &self.config.object_class {
            Some(class) => format!(
                "(&(objectClass={})({}={}))",
                ldap_escape(class.as_str()),
                self.config.username_attribute,
                username
            ),
            None => format!("({}={})", self.config.username_attribute, username),
        }
    }
}

#[async_trait]
impl Authenticator for LdapBasicAuthenticator {
    fn mechanism(&self) -> &str {
        "LDAP basic"
    }

    async fn authenticate(&self) -> Result<Identity> {
        let creds = BasicCredentials::parse(&self.credential)?;

        let mut attributes = vec![self.config.membership_attribute.clone()];
        if let Some(display) = &self.config.display_name_attribute {
            attributes.push(display.clone());
        }

        let filter = self.filter(&creds.username);
        let entries = self
            .directory
            .search(&self.config.base_dn, &filter, &attributes)
            .await?;

        if entries.len() != 1 {
            return Err(AuthError::CredentialInvalid(format!(
                "expected exactly one directory entry for {}, found {}",
                creds.username,
                entries.len()
            )));
        }
        let entry = &entries[0];

        debug!(dn = %entry.dn, username = %creds.username, "Rebinding as user entry");
        if !self.directory.bind(&entry.dn, &creds.password).await? {
            return Err(AuthError::CredentialInvalid(format!(
                "directory rejected password for {}",
                creds.username
            )));
        }

        let groups = entry
            .attributes
            .get(&self.config.membership_attribute)
            .cloned()
            .unwrap_or_default();

        let mut identity = Identity::new(creds.username, creds.domain).with_attributes(groups);
        if let Some(display_attr) = &self.config.display_name_attribute {
            if let Some(display) = entry.attributes.get(display_attr).and_then(|v| v.first()) {
                identity = identity.with_display_name(display.clone());
            }
        }
        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::STANDARD, Engine};
    use std::time::Duration;

    /// In-memory directory with one user entry
    struct FakeDirectory {
        entries: Vec<DirectoryEntry>,
        password: String,
    }

    #[async_trait]
    impl Directory for FakeDirectory {
        async fn bind(&self, dn: &str, password: &str) -> Result<bool> {
            Ok(self.entries.iter().any(|e| e.dn == dn) && password == self.password)
        }

        async fn search(
            &self,
            _base_dn: &str,
            filter: &str,
            _attributes: &[String],
        ) -> Result<Vec<DirectoryEntry>> {
            Ok(self
                .entries
                .iter()
                .filter(|e| {
                    e.attributes
                        .get("uid")
                        .map(|values| values.iter().any(|v| filter.contains(v.as_str())))
                        .unwrap_or(false)
                })
                .cloned()
                .collect())
        }
    }

    fn config() -> LdapConfig {
        LdapConfig {
            url: "ldap://unused".into(),
            bind_dn: "cn=service,dc=example,dc=org".into(),
            bind_password: "service-secret".into(),
            base_dn: "ou=people,dc=example,dc=org".into(),
            username_attribute: "uid".into(),
            object_class: Some("person".into()),
            membership_attribute: "memberOf".into(),
            display_name_attribute: Some("displayName".into()),
            timeout: Duration::from_secs(5),
        }
    }

    fn alice_entry() -> DirectoryEntry {
        let mut attributes = HashMap::new();
        attributes.insert("uid".into(), vec!["alice".into()]);
        attributes.insert(
            "memberOf".into(),
            vec!["admins".into(), "developers".into()],
        );
        attributes.insert("displayName".into(), vec!["Alice Example".into()]);
        DirectoryEntry {
            dn: "uid=alice,ou=people,dc=example,dc=org".into(),
            attributes,
        }
    }

    fn authenticator(raw_credential: &str, directory: FakeDirectory) -> LdapBasicAuthenticator {
        LdapBasicAuthenticator::new(
            STANDARD.encode(raw_credential),
            config(),
            Arc::new(directory),
        )
    }

    #[tokio::test]
    async fn test_successful_bind_grants_membership_attributes() {
        let directory = FakeDirectory {
            entries: vec![alice_entry()],
            password: "correct horse".into(),
        };
        let identity = authenticator("EXAMPLE\\alice:correct horse", directory)
            .authenticate()
            .await
            .unwrap();

        assert_eq!(identity.username(), "alice");
        assert_eq!(identity.domain(), "EXAMPLE");
        assert_eq!(identity.display_name(), "Alice Example");
        assert!(identity.has_attribute("admins"));
        assert!(identity.has_attribute("developers"));
    }

    #[tokio::test]
    async fn test_wrong_password_fails() {
        let directory = FakeDirectory {
            entries: vec![alice_entry()],
            password: "correct horse".into(),
        };
        let result = authenticator("alice:battery staple", directory).authenticate().await;
        assert!(matches!(result, Err(AuthError::CredentialInvalid(_))));
    }

    #[tokio::test]
    async fn test_no_matching_entry_fails() {
        let directory = FakeDirectory {
            entries: vec![],
            password: "irrelevant".into(),
        };
        let result = authenticator("mallory:whatever", directory).authenticate().await;
        assert!(matches!(result, Err(AuthError::CredentialInvalid(_))));
    }

    #[tokio::test]
    async fn test_multiple_matching_entries_fail() {
        let mut twin = alice_entry();
        twin.dn = "uid=alice,ou=contractors,dc=example,dc=org".into();
        let directory = FakeDirectory {
            entries: vec![alice_entry(), twin],
            password: "correct horse".into(),
        };
        let result = authenticator("alice:correct horse", directory).authenticate().await;
        assert!(matches!(result, Err(AuthError::CredentialInvalid(_))));
    }

    #[test]
    fn test_filter_includes_object_class_scope() {
        let authenticator = LdapBasicAuthenticator::new(
            String::new(),
            config(),
            Arc::new(FakeDirectory {
                entries: vec![],
                password: String::new(),
            }),
        );
        assert_eq!(authenticator.filter("alice"), "(&(objectClass=person)(uid=alice))");
    }
}
