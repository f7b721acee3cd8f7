use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{HelpdeskError, Result};
use crate::store::Store;
use crate::types::Category;

// ---------------------------------------------------------------------------
// ModelInfo
// ---------------------------------------------------------------------------

/// Provenance of the model that produced a suggestion. The current
/// classifier is a deterministic stand-in, so these are fixed constants;
/// a real model backend fills them from its own metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub provider: String,
    pub model: String,
    pub prompt_version: String,
    pub latency_ms: u64,
}

impl ModelInfo {
    pub fn stub() -> Self {
        Self {
            provider: "stub".to_string(),
            model: "heuristic:v1".to_string(),
            prompt_version: "v1".to_string(),
            latency_ms: 5,
        }
    }
}

// ---------------------------------------------------------------------------
// AgentSuggestion
// ---------------------------------------------------------------------------

/// The outcome of one triage run. Created exactly once per run by the
/// decision engine and immutable thereafter. The ticket links to its
/// current suggestion; older ones stay in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSuggestion {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub predicted_category: Category,
    /// Cited articles, most-relevant first, at most three.
    pub article_ids: Vec<Uuid>,
    pub draft_reply: String,
    /// 0.0–1.0, fixed per classifier rule.
    pub confidence: f64,
    pub auto_closed: bool,
    pub model_info: ModelInfo,
    pub created_at: DateTime<Utc>,
}

impl AgentSuggestion {
    /// All suggestions for a ticket, oldest first. Repeated triage
    /// accumulates records.
    pub fn history(store: &Store, ticket_id: Uuid) -> Result<Vec<Self>> {
        store.suggestions_for(ticket_id)
    }

    /// Read accessor for collaborators: the ticket's current suggestion —
    /// the one the ticket links, not merely the newest record — with
    /// citation titles resolved.
    pub fn view(store: &Store, ticket_id: Uuid) -> Result<SuggestionView> {
        let ticket = store.ticket(ticket_id)?;
        let current = ticket
            .suggestion_id
            .ok_or(HelpdeskError::SuggestionNotFound(ticket_id))?;
        let suggestion = store
            .suggestions_for(ticket_id)?
            .into_iter()
            .find(|s| s.id == current)
            .ok_or(HelpdeskError::SuggestionNotFound(ticket_id))?;
        let mut citations = Vec::with_capacity(suggestion.article_ids.len());
        for id in &suggestion.article_ids {
            let article = store.article(*id)?;
            citations.push(Citation {
                id: *id,
                title: article.title,
            });
        }
        Ok(SuggestionView {
            ticket_id,
            predicted_category: suggestion.predicted_category,
            citations,
            draft: suggestion.draft_reply,
            confidence: suggestion.confidence,
            status: if suggestion.auto_closed {
                SuggestionStatus::AutoClosed
            } else {
                SuggestionStatus::WaitingHuman
            },
        })
    }
}

// ---------------------------------------------------------------------------
// SuggestionView
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    pub id: Uuid,
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionStatus {
    AutoClosed,
    WaitingHuman,
}

impl SuggestionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SuggestionStatus::AutoClosed => "auto_closed",
            SuggestionStatus::WaitingHuman => "waiting_human",
        }
    }
}

impl std::fmt::Display for SuggestionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionView {
    pub ticket_id: Uuid,
    pub predicted_category: Category,
    pub citations: Vec<Citation>,
    pub draft: String,
    pub confidence: f64,
    pub status: SuggestionStatus,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
