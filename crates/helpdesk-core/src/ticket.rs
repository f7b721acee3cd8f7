//! Ticket record and its status lifecycle.
//!
//! Transitions: `open → {waiting_human, resolved} → resolved`. A human reply
//! forces `resolved` whatever the current status — a deliberate override
//! that cuts short any SLA-clock semantics. `closed` is terminal and only
//! ever set by an explicit close action, never by the pipeline. Nothing
//! removes history: conversation entries and suggestion links accumulate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::audit::TraceContext;
use crate::error::{HelpdeskError, Result};
use crate::store::Store;
use crate::types::{Actor, Category, TicketStatus};

// ---------------------------------------------------------------------------
// ConversationEntry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub author: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Ticket
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub status: TicketStatus,
    /// Requester's email. User accounts live in the auth collaborator.
    pub requester: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    /// The current suggestion. Historical suggestions stay in the store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion_id: Option<Uuid>,
    #[serde(default)]
    pub conversation: Vec<ConversationEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ticket {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        requester: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            category: Category::Other,
            status: TicketStatus::Open,
            requester: requester.into(),
            assignee: None,
            suggestion_id: None,
            conversation: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    /// Persist a new ticket and write its `ticket_created` audit entry.
    /// The requester may pre-categorize the ticket; `None` leaves it at
    /// `other` until triage. Triage itself is a separate, non-blocking
    /// step owned by the caller.
    pub fn create(
        store: &Store,
        title: impl Into<String>,
        description: impl Into<String>,
        requester: impl Into<String>,
        category: Option<Category>,
    ) -> Result<Self> {
        let mut ticket = Self::new(title, description, requester);
        if let Some(category) = category {
            ticket.category = category;
        }
        store.put_ticket(&ticket)?;
        TraceContext::new().record(
            store,
            ticket.id,
            Actor::User,
            "ticket_created",
            serde_json::json!({ "title": ticket.title }),
        )?;
        Ok(ticket)
    }

    pub fn load(store: &Store, id: Uuid) -> Result<Self> {
        store.ticket(id)
    }

    pub fn save(&self, store: &Store) -> Result<()> {
        store.put_ticket(self)
    }

    /// List tickets, oldest first, optionally filtered by status.
    pub fn list(store: &Store, status: Option<TicketStatus>) -> Result<Vec<Self>> {
        let mut tickets = store.tickets()?;
        if let Some(status) = status {
            tickets.retain(|t| t.status == status);
        }
        Ok(tickets)
    }

    // ---------------------------------------------------------------------------
    // Status transitions
    // ---------------------------------------------------------------------------

    fn guard_not_closed(&self, to: TicketStatus, reason: &str) -> Result<()> {
        if self.status.is_terminal() {
            return Err(HelpdeskError::InvalidTransition {
                from: self.status.to_string(),
                to: to.to_string(),
                reason: reason.to_string(),
            });
        }
        Ok(())
    }

    /// Apply a triage decision: set the outcome status, link the suggestion,
    /// keep earlier links retrievable through the suggestion history.
    /// Re-triage of an already-triaged ticket is allowed; closed tickets
    /// are not touched.
    pub fn apply_triage_outcome(&mut self, status: TicketStatus, suggestion_id: Uuid) -> Result<()> {
        debug_assert!(matches!(
            status,
            TicketStatus::WaitingHuman | TicketStatus::Resolved
        ));
        self.guard_not_closed(status, "closed tickets are not triaged")?;
        self.status = status;
        self.suggestion_id = Some(suggestion_id);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Record a human agent reply. Appends to the conversation and forces
    /// `resolved` regardless of the current (non-closed) status.
    pub fn reply(
        &mut self,
        store: &Store,
        author: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<()> {
        self.guard_not_closed(TicketStatus::Resolved, "closed tickets accept no replies")?;
        let message = message.into();
        self.conversation.push(ConversationEntry {
            author: author.into(),
            message: message.clone(),
            timestamp: Utc::now(),
        });
        self.status = TicketStatus::Resolved;
        self.updated_at = Utc::now();
        self.save(store)?;
        TraceContext::new().record(
            store,
            self.id,
            Actor::Agent,
            "agent_reply",
            serde_json::json!({ "message": message, "status": self.status }),
        )
    }

    /// Assign the ticket to a human agent. Does not change status.
    pub fn assign(&mut self, store: &Store, assignee: impl Into<String>) -> Result<()> {
        let assignee = assignee.into();
        self.assignee = Some(assignee.clone());
        self.updated_at = Utc::now();
        self.save(store)?;
        TraceContext::new().record(
            store,
            self.id,
            Actor::Agent,
            "assigned",
            serde_json::json!({ "assignee": assignee }),
        )
    }

    /// Close the ticket. Terminal — no later transition reopens it.
    pub fn close(&mut self, store: &Store) -> Result<()> {
        self.guard_not_closed(TicketStatus::Closed, "ticket is already closed")?;
        self.status = TicketStatus::Closed;
        self.updated_at = Utc::now();
        self.save(store)?;
        TraceContext::new().record(
            store,
            self.id,
            Actor::Agent,
            "closed",
            serde_json::json!({}),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
