//! Session cache with dual expiry watermarks
//!
//! Entries are keyed by a high-entropy session secret and hold the cached
//! identity plus an absolute `expires` watermark (hard session lifetime) and
//! a sliding `timeout` watermark (idle timeout, renewed on each successful
//! validation). An entry is usable only while both watermarks are in the
//! future; validation re-checks them itself, so correctness never depends on
//! reaper timing.
//!
//! The map is guarded by one reader/writer lock held only for the in-memory
//! operation, never across I/O.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, Weak};
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use fedgate_core::Identity;
use rand::distributions::Alphanumeric;
use rand::Rng;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Length of generated session secrets
const SECRET_LEN: usize = 64;

struct SessionEntry {
    identity: Arc<Identity>,
    /// Hard lifetime; never renewed
    expires: DateTime<Utc>,
    /// Idle timeout; slides forward on each successful validation
    timeout: DateTime<Utc>,
    active_timeout: Duration,
}

impl SessionEntry {
    fn usable(&self, now: DateTime<Utc>) -> bool {
        now < self.expires && now < self.timeout
    }
}

/// Process-wide session cache
///
/// Constructed once at process start; the reaper task is started explicitly
/// and sweeps at the active-timeout interval.
pub struct SessionCache {
    entries: RwLock<HashMap<String, SessionEntry>>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Generate a high-entropy session secret
    pub fn generate_secret() -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SECRET_LEN)
            .map(char::from)
            .collect()
    }

    /// Store an entry: `timeout = now + active_timeout`,
    /// `expires = now + total_duration`.
    pub fn add(
        &self,
        secret: String,
        identity: Arc<Identity>,
        active_timeout: StdDuration,
        total_duration: StdDuration,
    ) {
        let now = Utc::now();
        let active = Duration::from_std(active_timeout).unwrap_or_else(|_| Duration::zero());
        let total = Duration::from_std(total_duration).unwrap_or_else(|_| Duration::zero());
        let entry = SessionEntry {
            identity,
            expires: now + total,
            timeout: now + active,
            active_timeout: active,
        };
        let mut entries = self.entries.write().unwrap();
        entries.insert(secret, entry);
    }

    /// Validate a session-id/secret pair.
    ///
    /// Fails if the secret is absent, either watermark has passed, or the
    /// session id does not equal the cached identity's session id (cookie
    /// substitution defense). Success slides the idle timeout forward.
    /// Renewal mutates the entry, so validation takes the write lock.
    pub fn validate(&self, session_id: &str, secret: &str) -> Option<Arc<Identity>> {
        let now = Utc::now();
        let mut entries = self.entries.write().unwrap();
        let entry = entries.get_mut(secret)?;
        if !entry.usable(now) {
            return None;
        }
        if entry.identity.session_id() != session_id {
            return None;
        }
        entry.timeout = now + entry.active_timeout;
        Some(entry.identity.clone())
    }

    /// Delete every entry whose `expires` or `timeout` has passed.
    /// Returns the number removed.
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut entries = self.entries.write().unwrap();
        let before = entries.len();
        entries.retain(|_, entry| entry.usable(now));
        before - entries.len()
    }

    /// Number of live entries (expired-but-unswept entries included)
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Start the background reaper, sweeping at `interval`.
    ///
    /// The task holds only a weak reference and exits when the cache is
    /// dropped; aborting the returned handle stops it earlier.
    pub fn start_reaper(self: &Arc<Self>, interval: StdDuration) -> JoinHandle<()> {
        let cache: Weak<SessionCache> = Arc::downgrade(self);
        info!(interval_secs = interval.as_secs(), "Starting session reaper");
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // the first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(cache) = cache.upgrade() else { break };
                let removed = cache.purge_expired();
                if removed > 0 {
                    debug!(removed, remaining = cache.len(), "Swept expired sessions");
                }
            }
        })
    }
}

impl Default for SessionCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Arc<Identity> {
        Arc::new(Identity::new("alice", "EXAMPLE.ORG").with_attributes(["admins"]))
    }

    #[test]
    fn test_validate_immediately_after_add() {
        let cache = SessionCache::new();
        let identity = identity();
        cache.add(
            "secret-1".into(),
            identity.clone(),
            StdDuration::from_secs(60),
            StdDuration::from_secs(3600),
        );

        let found = cache.validate(identity.session_id(), "secret-1").unwrap();
        assert_eq!(found.username(), "alice");
    }

    #[test]
    fn test_unknown_secret_fails() {
        let cache = SessionCache::new();
        let identity = identity();
        cache.add(
            "secret-1".into(),
            identity.clone(),
            StdDuration::from_secs(60),
            StdDuration::from_secs(3600),
        );
        assert!(cache.validate(identity.session_id(), "secret-2").is_none());
    }

    #[test]
    fn test_session_id_mismatch_fails() {
        // a stolen cookie with a different session id must not validate
        let cache = SessionCache::new();
        cache.add(
            "secret-1".into(),
            identity(),
            StdDuration::from_secs(60),
            StdDuration::from_secs(3600),
        );
        assert!(cache.validate("some-other-session-id", "secret-1").is_none());
    }

    #[test]
    fn test_idle_timeout_expires_before_total() {
        let cache = SessionCache::new();
        let identity = identity();
        // zero active timeout puts the idle watermark in the past at once,
        // while the total duration is still far off
        cache.add(
            "secret-1".into(),
            identity.clone(),
            StdDuration::from_secs(0),
            StdDuration::from_secs(3600),
        );
        assert!(cache.validate(identity.session_id(), "secret-1").is_none());
    }

    #[test]
    fn test_total_expiry_wins_over_sliding_timeout() {
        let cache = SessionCache::new();
        let identity = identity();
        cache.add(
            "secret-1".into(),
            identity.clone(),
            StdDuration::from_secs(3600),
            StdDuration::from_secs(0),
        );
        assert!(cache.validate(identity.session_id(), "secret-1").is_none());
    }

    #[tokio::test]
    async fn test_successful_validate_slides_timeout() {
        let cache = SessionCache::new();
        let identity = identity();
        cache.add(
            "secret-1".into(),
            identity.clone(),
            StdDuration::from_millis(120),
            StdDuration::from_secs(3600),
        );

        // keep validating inside the idle window; each success renews it
        for _ in 0..4 {
            tokio::time::sleep(StdDuration::from_millis(60)).await;
            assert!(cache.validate(identity.session_id(), "secret-1").is_some());
        }

        // after going idle past the window, validation fails
        tokio::time::sleep(StdDuration::from_millis(200)).await;
        assert!(cache.validate(identity.session_id(), "secret-1").is_none());
    }

    #[test]
    fn test_purge_removes_only_expired() {
        let cache = SessionCache::new();
        let live = identity();
        cache.add(
            "live".into(),
            live.clone(),
            StdDuration::from_secs(60),
            StdDuration::from_secs(3600),
        );
        cache.add(
            "dead".into(),
            identity(),
            StdDuration::from_secs(0),
            StdDuration::from_secs(3600),
        );

        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.validate(live.session_id(), "live").is_some());
    }

    #[tokio::test]
    async fn test_reaper_sweeps_in_background() {
        let cache = Arc::new(SessionCache::new());
        cache.add(
            "dead".into(),
            identity(),
            StdDuration::from_secs(0),
            StdDuration::from_secs(3600),
        );
        let handle = cache.start_reaper(StdDuration::from_millis(20));

        tokio::time::sleep(StdDuration::from_millis(80)).await;
        assert!(cache.is_empty());
        handle.abort();
    }

    #[test]
    fn test_generated_secrets_are_long_and_unique() {
        let a = SessionCache::generate_secret();
        let b = SessionCache::generate_secret();
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
    }
}
