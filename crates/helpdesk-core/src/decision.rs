//! Auto-resolution decision.
//!
//! The one place that turns a classification into persisted state: it
//! creates the run's AgentSuggestion, then transitions the ticket and
//! writes the decision's audit entries. Suggestion insert and ticket
//! update are two separate writes — a ticket-update failure after the
//! suggestion persisted leaves the suggestion in place. That window is an
//! accepted property of the design, surfaced as a storage error rather
//! than repaired.

use chrono::Utc;
use uuid::Uuid;

use crate::article::KnowledgeArticle;
use crate::audit::TraceContext;
use crate::classifier::Classification;
use crate::error::Result;
use crate::policy::TriagePolicyConfig;
use crate::store::Store;
use crate::suggestion::{AgentSuggestion, ModelInfo};
use crate::ticket::Ticket;
use crate::types::{Actor, TicketStatus};

/// Apply the triage policy to one classified, drafted ticket.
///
/// Exactly one suggestion is created per call. `auto` holds iff the policy
/// enables auto-close and the classification meets the threshold; the
/// ticket ends `resolved` on auto-close, `waiting_human` on hand-off, and
/// links the new suggestion either way.
pub fn decide(
    store: &Store,
    ticket: &mut Ticket,
    classification: Classification,
    articles: &[KnowledgeArticle],
    draft: &str,
    policy: &TriagePolicyConfig,
    trace: &TraceContext,
) -> Result<AgentSuggestion> {
    let auto =
        policy.auto_close_enabled && classification.confidence >= policy.confidence_threshold;

    let suggestion = AgentSuggestion {
        id: Uuid::new_v4(),
        ticket_id: ticket.id,
        predicted_category: classification.category,
        article_ids: crate::retriever::article_ids(articles),
        draft_reply: draft.to_string(),
        confidence: classification.confidence,
        auto_closed: auto,
        model_info: ModelInfo::stub(),
        created_at: Utc::now(),
    };
    store.insert_suggestion(&suggestion)?;
    trace.record(
        store,
        ticket.id,
        Actor::System,
        "suggestion_created",
        serde_json::json!({ "suggestion_id": suggestion.id }),
    )?;

    if auto {
        ticket.apply_triage_outcome(TicketStatus::Resolved, suggestion.id)?;
        ticket.save(store)?;
        trace.record(
            store,
            ticket.id,
            Actor::System,
            "auto_closed",
            serde_json::json!({ "confidence": classification.confidence }),
        )?;
    } else {
        ticket.apply_triage_outcome(TicketStatus::WaitingHuman, suggestion.id)?;
        ticket.save(store)?;
        trace.record(
            store,
            ticket.id,
            Actor::System,
            "waiting_human",
            serde_json::json!({}),
        )?;
    }

    Ok(suggestion)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;
    use tempfile::TempDir;

    fn open_tmp() -> (TempDir, Store) {
        let dir = TempDir::new().unwrap();
        let store = Store::open(&dir.path().join("test.db")).unwrap();
        (dir, store)
    }

    fn billing(confidence: f64) -> Classification {
        Classification {
            category: Category::Billing,
            confidence,
        }
    }

    fn policy(enabled: bool, threshold: f64) -> TriagePolicyConfig {
        TriagePolicyConfig {
            auto_close_enabled: enabled,
            confidence_threshold: threshold,
            sla_hours: 24,
        }
    }

    fn run_decide(
        store: &Store,
        ticket: &mut Ticket,
        classification: Classification,
        policy: &TriagePolicyConfig,
    ) -> AgentSuggestion {
        let trace = TraceContext::new();
        decide(store, ticket, classification, &[], "draft", policy, &trace).unwrap()
    }

    #[test]
    fn auto_close_requires_flag_and_threshold() {
        let (_dir, store) = open_tmp();

        let cases = [
            (true, 0.8, 0.90, true),   // enabled, above threshold
            (true, 0.8, 0.80, true),   // enabled, exactly at threshold
            (true, 0.8, 0.60, false),  // enabled, below threshold
            (false, 0.8, 0.95, false), // disabled beats any confidence
        ];
        for (enabled, threshold, confidence, expect_auto) in cases {
            let mut ticket = Ticket::create(&store, "t", "d", "a@x.com", None).unwrap();
            let suggestion = run_decide(
                &store,
                &mut ticket,
                billing(confidence),
                &policy(enabled, threshold),
            );
            assert_eq!(
                suggestion.auto_closed, expect_auto,
                "enabled={enabled} threshold={threshold} confidence={confidence}"
            );
        }
    }

    #[test]
    fn auto_close_resolves_and_links_ticket() {
        let (_dir, store) = open_tmp();
        let mut ticket = Ticket::create(&store, "t", "d", "a@x.com", None).unwrap();
        let suggestion = run_decide(&store, &mut ticket, billing(0.9), &policy(true, 0.8));

        let loaded = Ticket::load(&store, ticket.id).unwrap();
        assert_eq!(loaded.status, TicketStatus::Resolved);
        assert_eq!(loaded.suggestion_id, Some(suggestion.id));
    }

    #[test]
    fn hand_off_sets_waiting_human() {
        let (_dir, store) = open_tmp();
        let mut ticket = Ticket::create(&store, "t", "d", "a@x.com", None).unwrap();
        let suggestion = run_decide(&store, &mut ticket, billing(0.6), &policy(true, 0.8));

        assert!(!suggestion.auto_closed);
        let loaded = Ticket::load(&store, ticket.id).unwrap();
        assert_eq!(loaded.status, TicketStatus::WaitingHuman);
        assert_eq!(loaded.suggestion_id, Some(suggestion.id));
    }

    #[test]
    fn decision_audit_entries_in_order() {
        let (_dir, store) = open_tmp();
        let mut ticket = Ticket::create(&store, "t", "d", "a@x.com", None).unwrap();
        let trace = TraceContext::new();
        decide(
            &store,
            &mut ticket,
            billing(0.9),
            &[],
            "draft",
            &policy(true, 0.8),
            &trace,
        )
        .unwrap();

        let trail: Vec<_> = store
            .audit_for(ticket.id)
            .unwrap()
            .into_iter()
            .filter(|e| e.trace_id == trace.trace_id)
            .collect();
        // Newest first
        assert_eq!(trail[0].action, "auto_closed");
        assert_eq!(trail[1].action, "suggestion_created");
        assert_eq!(
            trail[0].meta,
            serde_json::json!({ "confidence": 0.9 })
        );
    }

    #[test]
    fn suggestion_records_model_provenance() {
        let (_dir, store) = open_tmp();
        let mut ticket = Ticket::create(&store, "t", "d", "a@x.com", None).unwrap();
        let suggestion = run_decide(&store, &mut ticket, billing(0.9), &policy(false, 0.7));
        assert_eq!(suggestion.model_info.provider, "stub");
        assert_eq!(suggestion.model_info.model, "heuristic:v1");
    }
}
