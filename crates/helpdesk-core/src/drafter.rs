//! Draft reply composition.
//!
//! Pure text assembly: a greeting citing the ticket title, then one
//! enumerated citation line per retrieved article. No model call happens
//! here; the draft is what a human agent reviews (or what ships as-is on
//! auto-close).

use crate::article::KnowledgeArticle;
use crate::ticket::Ticket;

/// Compose the draft reply. An empty article list omits the citation block
/// entirely rather than emitting an empty one.
pub fn draft_reply(ticket: &Ticket, articles: &[KnowledgeArticle]) -> String {
    let greeting = format!(
        "Hello, regarding \"{}\", here are some steps to help you.",
        ticket.title
    );
    if articles.is_empty() {
        return greeting;
    }

    let refs = articles
        .iter()
        .enumerate()
        .map(|(i, a)| format!("[{}] {}", i + 1, a.title))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{greeting}\n{refs}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ArticleStatus;

    fn article(title: &str) -> KnowledgeArticle {
        KnowledgeArticle::new(title, "body", vec![], ArticleStatus::Published)
    }

    #[test]
    fn greeting_cites_ticket_title() {
        let ticket = Ticket::new("Broken login", "description", "a@x.com");
        let draft = draft_reply(&ticket, &[]);
        assert_eq!(
            draft,
            "Hello, regarding \"Broken login\", here are some steps to help you."
        );
    }

    #[test]
    fn citations_are_enumerated_in_order() {
        let ticket = Ticket::new("Broken login", "description", "a@x.com");
        let articles = vec![article("Reset your password"), article("Clear the cache")];
        let draft = draft_reply(&ticket, &articles);
        assert!(draft.ends_with("[1] Reset your password\n[2] Clear the cache"));
    }

    #[test]
    fn empty_articles_emit_no_citation_block() {
        let ticket = Ticket::new("t", "d", "a@x.com");
        let draft = draft_reply(&ticket, &[]);
        assert!(!draft.contains('\n'));
        assert!(!draft.contains('['));
    }
}
