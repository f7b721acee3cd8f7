//! Triage pipeline orchestration.
//!
//! One run walks a fixed sequence — classify, retrieve, draft, decide —
//! for a single ticket, writing one audit entry per step under a single
//! trace id. Steps are strictly sequential: each consumes the previous
//! step's output and the audit log must record a total order. There is no
//! retry and no cancellation; a failed step aborts the remainder and
//! leaves the partial trail in place.
//!
//! A fully successful run produces exactly this action sequence:
//! `triage_start, classified, retrieved_kb, drafted_reply,
//! suggestion_created, (auto_closed | waiting_human), triage_end`.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::audit::TraceContext;
use crate::classifier::{Classifier, KeywordClassifier};
use crate::decision;
use crate::drafter;
use crate::error::Result;
use crate::policy::TriagePolicyConfig;
use crate::retriever;
use crate::store::Store;
use crate::suggestion::AgentSuggestion;
use crate::ticket::Ticket;
use crate::types::Actor;

// ---------------------------------------------------------------------------
// TriagePipeline
// ---------------------------------------------------------------------------

pub struct TriagePipeline {
    store: Arc<Store>,
    /// Policy file location. Loaded fresh at the start of every run so
    /// concurrent runs never share mutable config state.
    root: PathBuf,
    classifier: Box<dyn Classifier>,
}

impl TriagePipeline {
    /// Pipeline with the default keyword classifier.
    pub fn new(store: Arc<Store>, root: impl Into<PathBuf>) -> Self {
        Self::with_classifier(store, root, Box::new(KeywordClassifier::default()))
    }

    /// Pipeline with a caller-supplied classifier. The decision policy is
    /// untouched by the choice of backend.
    pub fn with_classifier(
        store: Arc<Store>,
        root: impl Into<PathBuf>,
        classifier: Box<dyn Classifier>,
    ) -> Self {
        Self {
            store,
            root: root.into(),
            classifier,
        }
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    /// Triage one ticket. Fails with `TicketNotFound` if the id does not
    /// resolve; any later failure aborts the run after a best-effort
    /// `triage_failed` audit entry.
    pub fn run(&self, ticket_id: Uuid) -> Result<AgentSuggestion> {
        let trace = TraceContext::new();
        match self.run_inner(ticket_id, &trace) {
            Ok(suggestion) => {
                info!(
                    ticket = %ticket_id,
                    trace = %trace.trace_id,
                    auto_closed = suggestion.auto_closed,
                    "triage run complete"
                );
                Ok(suggestion)
            }
            Err(e) => {
                // Best effort — the original failure is what propagates,
                // even if this write fails too.
                let logged = trace.record(
                    &self.store,
                    ticket_id,
                    Actor::System,
                    "triage_failed",
                    serde_json::json!({ "error": e.to_string() }),
                );
                if let Err(audit_err) = logged {
                    warn!(ticket = %ticket_id, error = %audit_err, "failure audit entry not written");
                }
                Err(e)
            }
        }
    }

    fn run_inner(&self, ticket_id: Uuid, trace: &TraceContext) -> Result<AgentSuggestion> {
        let mut ticket = Ticket::load(&self.store, ticket_id)?;
        let policy = TriagePolicyConfig::load(&self.root)?;

        trace.record(
            &self.store,
            ticket.id,
            Actor::System,
            "triage_start",
            serde_json::json!({}),
        )?;

        let classification = self.classifier.classify(&ticket.description);
        trace.record(
            &self.store,
            ticket.id,
            Actor::System,
            "classified",
            serde_json::json!({
                "category": classification.category,
                "confidence": classification.confidence,
            }),
        )?;

        let articles = retriever::retrieve(&self.store, &ticket)?;
        trace.record(
            &self.store,
            ticket.id,
            Actor::System,
            "retrieved_kb",
            serde_json::json!({ "article_ids": retriever::article_ids(&articles) }),
        )?;

        let draft = drafter::draft_reply(&ticket, &articles);
        trace.record(
            &self.store,
            ticket.id,
            Actor::System,
            "drafted_reply",
            serde_json::json!({}),
        )?;

        let suggestion = decision::decide(
            &self.store,
            &mut ticket,
            classification,
            &articles,
            &draft,
            &policy,
            trace,
        )?;

        trace.record(
            &self.store,
            ticket.id,
            Actor::System,
            "triage_end",
            serde_json::json!({}),
        )?;

        Ok(suggestion)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
