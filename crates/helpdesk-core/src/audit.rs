//! Immutable, trace-correlated audit log.
//!
//! Every pipeline step and every human action appends exactly one entry.
//! Entries belonging to one triage run share a single trace id — the
//! correlation key an auditor uses to reconstruct the causal chain for one
//! decision. Entries are never mutated or reordered after the fact; a
//! partial chain left by a failed run is kept as a diagnostic signal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::store::Store;
use crate::types::Actor;

// ---------------------------------------------------------------------------
// AuditLogEntry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub trace_id: Uuid,
    pub actor: Actor,
    pub action: String,
    pub meta: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl AuditLogEntry {
    pub fn new(
        ticket_id: Uuid,
        trace_id: Uuid,
        actor: Actor,
        action: impl Into<String>,
        meta: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            ticket_id,
            trace_id,
            actor,
            action: action.into(),
            meta,
            timestamp: Utc::now(),
        }
    }

    /// Full trail for a ticket, newest first. Spans all traces that ever
    /// touched the ticket.
    pub fn trail(store: &Store, ticket_id: Uuid) -> Result<Vec<AuditLogEntry>> {
        store.audit_for(ticket_id)
    }
}

// ---------------------------------------------------------------------------
// TraceContext
// ---------------------------------------------------------------------------

/// Ephemeral per-run correlation context. One is created at the start of
/// each triage run (and for each standalone human action) and threads its
/// trace id through every audit write of that run. Never persisted as its
/// own entity.
#[derive(Debug, Clone, Copy)]
pub struct TraceContext {
    pub trace_id: Uuid,
}

impl TraceContext {
    pub fn new() -> Self {
        Self {
            trace_id: Uuid::new_v4(),
        }
    }

    /// Append one entry under this trace. Pure append, no read-modify-write;
    /// callers must not assume it is transactional with the state change it
    /// documents.
    pub fn record(
        &self,
        store: &Store,
        ticket_id: Uuid,
        actor: Actor,
        action: &str,
        meta: serde_json::Value,
    ) -> Result<()> {
        store.append_audit(&AuditLogEntry::new(
            ticket_id,
            self.trace_id,
            actor,
            action,
            meta,
        ))
    }
}

impl Default for TraceContext {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn record_shares_one_trace_id() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(&dir.path().join("test.db")).unwrap();
        let ticket_id = Uuid::new_v4();
        let trace = TraceContext::new();

        trace
            .record(&store, ticket_id, Actor::System, "triage_start", serde_json::json!({}))
            .unwrap();
        trace
            .record(
                &store,
                ticket_id,
                Actor::System,
                "classified",
                serde_json::json!({"category": "billing"}),
            )
            .unwrap();

        let trail = AuditLogEntry::trail(&store, ticket_id).unwrap();
        assert_eq!(trail.len(), 2);
        assert!(trail.iter().all(|e| e.trace_id == trace.trace_id));
    }

    #[test]
    fn distinct_traces_have_distinct_ids() {
        let a = TraceContext::new();
        let b = TraceContext::new();
        assert_ne!(a.trace_id, b.trace_id);
    }
}
