//! Persistent storage for helpdesk entities using redb.
//!
//! # Table design
//!
//! - `TICKETS` and `ARTICLES` are keyed by the entity's 16-byte UUID and hold
//!   JSON-encoded records. Tickets are mutable (status, suggestion link,
//!   conversation); articles are mutable only through publication.
//! - `SUGGESTIONS` uses a 24-byte composite key:
//!   ```text
//!   [ created_at_ms: u64 big-endian (8 bytes) | uuid: 16 bytes ]
//!   ```
//!   Because the timestamp occupies the high bytes in big-endian encoding,
//!   byte ordering equals creation ordering, so a reverse scan yields the
//!   newest suggestion for a ticket without sorting. Suggestions are never
//!   updated or removed.
//! - `AUDIT` is keyed by a monotonically increasing `u64` sequence assigned
//!   at append time. Pipeline steps write their entries strictly in order,
//!   so key order is step order within a trace. Entries are never updated
//!   or removed.

use std::path::Path;

use redb::{Database, ReadableTable, TableDefinition};
use uuid::Uuid;

use crate::article::KnowledgeArticle;
use crate::audit::AuditLogEntry;
use crate::error::{HelpdeskError, Result};
use crate::suggestion::AgentSuggestion;
use crate::ticket::Ticket;

// ---------------------------------------------------------------------------
// Table definitions
// ---------------------------------------------------------------------------

/// Key: 16-byte UUID. Value: JSON-encoded Ticket.
const TICKETS: TableDefinition<&[u8], &[u8]> = TableDefinition::new("tickets");

/// Key: 16-byte UUID. Value: JSON-encoded KnowledgeArticle.
const ARTICLES: TableDefinition<&[u8], &[u8]> = TableDefinition::new("articles");

/// Key: 24-byte composite (created_at_ms big-endian ++ uuid bytes).
/// Value: JSON-encoded AgentSuggestion.
const SUGGESTIONS: TableDefinition<&[u8], &[u8]> = TableDefinition::new("suggestions");

/// Key: append sequence. Value: JSON-encoded AuditLogEntry.
const AUDIT: TableDefinition<u64, &[u8]> = TableDefinition::new("audit");

// ---------------------------------------------------------------------------
// Key helpers
// ---------------------------------------------------------------------------

fn suggestion_key(suggestion: &AgentSuggestion) -> [u8; 24] {
    let mut key = [0u8; 24];
    let ms = suggestion.created_at.timestamp_millis().max(0) as u64;
    key[..8].copy_from_slice(&ms.to_be_bytes());
    key[8..].copy_from_slice(suggestion.id.as_bytes());
    key
}

fn storage(e: impl std::fmt::Display) -> HelpdeskError {
    HelpdeskError::Storage(e.to_string())
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Single-file embedded store shared by all pipeline components.
pub struct Store {
    db: Database,
}

impl Store {
    /// Open or create the redb database at `path`.
    ///
    /// Creates all tables if they don't already exist.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            crate::io::ensure_dir(parent)?;
        }
        let db = Database::create(path).map_err(storage)?;
        let wt = db.begin_write().map_err(storage)?;
        wt.open_table(TICKETS).map_err(storage)?;
        wt.open_table(ARTICLES).map_err(storage)?;
        wt.open_table(SUGGESTIONS).map_err(storage)?;
        wt.open_table(AUDIT).map_err(storage)?;
        wt.commit().map_err(storage)?;
        Ok(Self { db })
    }

    // ---------------------------------------------------------------------------
    // Tickets
    // ---------------------------------------------------------------------------

    /// Insert or replace a ticket record.
    pub fn put_ticket(&self, ticket: &Ticket) -> Result<()> {
        let value = serde_json::to_vec(ticket)?;
        let wt = self.db.begin_write().map_err(storage)?;
        {
            let mut table = wt.open_table(TICKETS).map_err(storage)?;
            table
                .insert(ticket.id.as_bytes().as_slice(), value.as_slice())
                .map_err(storage)?;
        }
        wt.commit().map_err(storage)?;
        Ok(())
    }

    pub fn ticket(&self, id: Uuid) -> Result<Ticket> {
        let rt = self.db.begin_read().map_err(storage)?;
        let table = rt.open_table(TICKETS).map_err(storage)?;
        let Some(value) = table.get(id.as_bytes().as_slice()).map_err(storage)? else {
            return Err(HelpdeskError::TicketNotFound(id));
        };
        let ticket: Ticket = serde_json::from_slice(value.value())?;
        Ok(ticket)
    }

    /// List all tickets, oldest first.
    pub fn tickets(&self) -> Result<Vec<Ticket>> {
        let rt = self.db.begin_read().map_err(storage)?;
        let table = rt.open_table(TICKETS).map_err(storage)?;
        let mut result = Vec::new();
        for entry in table.iter().map_err(storage)? {
            let (_, v) = entry.map_err(storage)?;
            let ticket: Ticket = serde_json::from_slice(v.value())?;
            result.push(ticket);
        }
        result.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(result)
    }

    // ---------------------------------------------------------------------------
    // Articles
    // ---------------------------------------------------------------------------

    /// Insert or replace an article record.
    pub fn put_article(&self, article: &KnowledgeArticle) -> Result<()> {
        let value = serde_json::to_vec(article)?;
        let wt = self.db.begin_write().map_err(storage)?;
        {
            let mut table = wt.open_table(ARTICLES).map_err(storage)?;
            table
                .insert(article.id.as_bytes().as_slice(), value.as_slice())
                .map_err(storage)?;
        }
        wt.commit().map_err(storage)?;
        Ok(())
    }

    pub fn article(&self, id: Uuid) -> Result<KnowledgeArticle> {
        let rt = self.db.begin_read().map_err(storage)?;
        let table = rt.open_table(ARTICLES).map_err(storage)?;
        let Some(value) = table.get(id.as_bytes().as_slice()).map_err(storage)? else {
            return Err(HelpdeskError::ArticleNotFound(id));
        };
        let article: KnowledgeArticle = serde_json::from_slice(value.value())?;
        Ok(article)
    }

    /// All articles in store-default (key) order.
    pub fn articles(&self) -> Result<Vec<KnowledgeArticle>> {
        let rt = self.db.begin_read().map_err(storage)?;
        let table = rt.open_table(ARTICLES).map_err(storage)?;
        let mut result = Vec::new();
        for entry in table.iter().map_err(storage)? {
            let (_, v) = entry.map_err(storage)?;
            let article: KnowledgeArticle = serde_json::from_slice(v.value())?;
            result.push(article);
        }
        Ok(result)
    }

    // ---------------------------------------------------------------------------
    // Suggestions
    // ---------------------------------------------------------------------------

    /// Insert a new suggestion. Suggestions are immutable once written;
    /// repeated triage of a ticket accumulates records, it never replaces
    /// earlier ones.
    pub fn insert_suggestion(&self, suggestion: &AgentSuggestion) -> Result<()> {
        let key = suggestion_key(suggestion);
        let value = serde_json::to_vec(suggestion)?;
        let wt = self.db.begin_write().map_err(storage)?;
        {
            let mut table = wt.open_table(SUGGESTIONS).map_err(storage)?;
            table
                .insert(key.as_slice(), value.as_slice())
                .map_err(storage)?;
        }
        wt.commit().map_err(storage)?;
        Ok(())
    }

    /// All suggestions ever produced for `ticket_id`, oldest first.
    pub fn suggestions_for(&self, ticket_id: Uuid) -> Result<Vec<AgentSuggestion>> {
        let rt = self.db.begin_read().map_err(storage)?;
        let table = rt.open_table(SUGGESTIONS).map_err(storage)?;
        let mut result = Vec::new();
        for entry in table.iter().map_err(storage)? {
            let (_, v) = entry.map_err(storage)?;
            let suggestion: AgentSuggestion = serde_json::from_slice(v.value())?;
            if suggestion.ticket_id == ticket_id {
                result.push(suggestion);
            }
        }
        Ok(result)
    }

    /// The most recent suggestion for `ticket_id`.
    ///
    /// Reverse key scan — composite key ordering makes the first match the
    /// newest record.
    pub fn latest_suggestion_for(&self, ticket_id: Uuid) -> Result<AgentSuggestion> {
        let rt = self.db.begin_read().map_err(storage)?;
        let table = rt.open_table(SUGGESTIONS).map_err(storage)?;
        for entry in table.iter().map_err(storage)?.rev() {
            let (_, v) = entry.map_err(storage)?;
            let suggestion: AgentSuggestion = serde_json::from_slice(v.value())?;
            if suggestion.ticket_id == ticket_id {
                return Ok(suggestion);
            }
        }
        Err(HelpdeskError::SuggestionNotFound(ticket_id))
    }

    // ---------------------------------------------------------------------------
    // Audit log
    // ---------------------------------------------------------------------------

    /// Append one audit entry. Pure append: the next sequence number is
    /// assigned inside the write transaction and prior entries are never
    /// touched.
    pub fn append_audit(&self, entry: &AuditLogEntry) -> Result<()> {
        let value = serde_json::to_vec(entry)?;
        let wt = self.db.begin_write().map_err(storage)?;
        {
            let mut table = wt.open_table(AUDIT).map_err(storage)?;
            let next = match table.last().map_err(storage)? {
                Some((k, _)) => k.value() + 1,
                None => 0,
            };
            table.insert(next, value.as_slice()).map_err(storage)?;
        }
        wt.commit().map_err(storage)?;
        Ok(())
    }

    /// Audit entries for `ticket_id`, newest first.
    pub fn audit_for(&self, ticket_id: Uuid) -> Result<Vec<AuditLogEntry>> {
        let rt = self.db.begin_read().map_err(storage)?;
        let table = rt.open_table(AUDIT).map_err(storage)?;
        let mut result = Vec::new();
        for entry in table.iter().map_err(storage)?.rev() {
            let (_, v) = entry.map_err(storage)?;
            let record: AuditLogEntry = serde_json::from_slice(v.value())?;
            if record.ticket_id == ticket_id {
                result.push(record);
            }
        }
        Ok(result)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::TraceContext;
    use crate::types::Actor;
    use tempfile::TempDir;

    fn open_tmp() -> (TempDir, Store) {
        let dir = TempDir::new().unwrap();
        let store = Store::open(&dir.path().join("test.db")).unwrap();
        (dir, store)
    }

    #[test]
    fn ticket_missing_is_not_found() {
        let (_dir, store) = open_tmp();
        let id = Uuid::new_v4();
        assert!(matches!(
            store.ticket(id),
            Err(HelpdeskError::TicketNotFound(found)) if found == id
        ));
    }

    #[test]
    fn audit_entries_keep_append_order() {
        let (_dir, store) = open_tmp();
        let ticket_id = Uuid::new_v4();
        let trace = TraceContext::new();
        for action in ["triage_start", "classified", "triage_end"] {
            trace
                .record(&store, ticket_id, Actor::System, action, serde_json::json!({}))
                .unwrap();
        }

        let trail = store.audit_for(ticket_id).unwrap();
        let actions: Vec<&str> = trail.iter().map(|e| e.action.as_str()).collect();
        // Newest first
        assert_eq!(actions, vec!["triage_end", "classified", "triage_start"]);
    }

    #[test]
    fn audit_is_filtered_by_ticket() {
        let (_dir, store) = open_tmp();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let trace = TraceContext::new();
        trace
            .record(&store, a, Actor::System, "triage_start", serde_json::json!({}))
            .unwrap();
        trace
            .record(&store, b, Actor::System, "triage_start", serde_json::json!({}))
            .unwrap();

        assert_eq!(store.audit_for(a).unwrap().len(), 1);
        assert_eq!(store.audit_for(b).unwrap().len(), 1);
    }

    #[test]
    fn latest_suggestion_missing_is_not_found() {
        let (_dir, store) = open_tmp();
        let id = Uuid::new_v4();
        assert!(matches!(
            store.latest_suggestion_for(id),
            Err(HelpdeskError::SuggestionNotFound(found)) if found == id
        ));
    }
}
