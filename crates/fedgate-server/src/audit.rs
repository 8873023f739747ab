//! Audit recording
//!
//! Every authorization and federation attempt produces exactly one audit
//! line: actor, event label, UTC timestamp, and the URL-escaped JSON blob of
//! the outcome detail. Recording is fire-and-forget; a slow or unavailable
//! sink never blocks or fails the primary operation.

use std::sync::Arc;

use chrono::Utc;
use fedgate_core::{AuditDetail, AuditEvent, Identity};
use tracing::info;

/// Destination for rendered audit lines
pub trait AuditSink: Send + Sync {
    fn emit(&self, line: &str);
}

/// Sink emitting on the dedicated `audit` tracing target, for the external
/// log sink to subscribe to
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn emit(&self, line: &str) {
        info!(target: "audit", "{}", line);
    }
}

/// Formats and emits audit lines
#[derive(Clone)]
pub struct AuditRecorder {
    sink: Arc<dyn AuditSink>,
}

impl AuditRecorder {
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self { sink }
    }

    /// Recorder wired to the `audit` tracing target
    pub fn tracing() -> Self {
        Self::new(Arc::new(TracingAuditSink))
    }

    /// Record one attempt's outcome
    pub fn record(&self, identity: &Identity, event: AuditEvent, detail: &AuditDetail) {
        let line = format!(
            "time={} actor={}@{} event={} detail={}",
            Utc::now().to_rfc3339(),
            identity.username(),
            identity.domain(),
            event,
            detail.to_line(),
        );
        self.sink.emit(&line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct RecordingSink {
        lines: Mutex<Vec<String>>,
    }

    impl AuditSink for RecordingSink {
        fn emit(&self, line: &str) {
            self.lines.lock().unwrap().push(line.to_string());
        }
    }

    #[test]
    fn test_line_carries_actor_event_and_detail() {
        let sink = Arc::new(RecordingSink { lines: Mutex::new(Vec::new()) });
        let recorder = AuditRecorder::new(sink.clone());
        let identity = Identity::new("alice", "EXAMPLE.ORG");
        let detail = AuditDetail::failure("some-id", "no matching attribute");

        recorder.record(&identity, AuditEvent::Federation, &detail);

        let lines = sink.lines.lock().unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("actor=alice@EXAMPLE.ORG"));
        assert!(lines[0].contains("event=federation"));
        assert!(lines[0].contains("detail="));
    }
}
