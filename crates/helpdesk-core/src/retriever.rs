//! Knowledge-base retrieval for a ticket.
//!
//! Keyword match, not relevance ranking: the first five distinct tokens of
//! the ticket description become one case-insensitive alternation, and any
//! published article whose title, body or tags match is a candidate, capped
//! at three in store-default order.

use regex::RegexBuilder;
use uuid::Uuid;

use crate::article::KnowledgeArticle;
use crate::error::Result;
use crate::store::Store;
use crate::ticket::Ticket;

/// Maximum number of cited articles per suggestion.
pub const MAX_ARTICLES: usize = 3;

/// Number of description tokens used to build the match expression.
const MAX_TERMS: usize = 5;

// ---------------------------------------------------------------------------
// Tokenization
// ---------------------------------------------------------------------------

/// Split on non-word boundaries, drop empties, keep the first
/// `MAX_TERMS` distinct tokens in original order.
fn search_terms(description: &str) -> Vec<String> {
    let splitter = regex::Regex::new(r"\W+").expect("static pattern");
    let mut terms: Vec<String> = Vec::new();
    for token in splitter.split(&description.to_lowercase()) {
        if token.is_empty() || terms.iter().any(|t| t == token) {
            continue;
        }
        terms.push(token.to_string());
        if terms.len() == MAX_TERMS {
            break;
        }
    }
    terms
}

// ---------------------------------------------------------------------------
// Retrieval
// ---------------------------------------------------------------------------

/// Up to [`MAX_ARTICLES`] published articles matching the ticket
/// description, most-relevant first (store order — no ranking beyond the
/// cap). An unmatchable or empty description yields an empty vec, never an
/// error.
pub fn retrieve(store: &Store, ticket: &Ticket) -> Result<Vec<KnowledgeArticle>> {
    let terms = search_terms(&ticket.description);
    if terms.is_empty() {
        return Ok(Vec::new());
    }

    let pattern = terms
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");
    let matcher = RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| crate::error::HelpdeskError::Search(e.to_string()))?;

    let mut matches = Vec::new();
    for article in store.articles()? {
        if !article.is_published() {
            continue;
        }
        let hit = matcher.is_match(&article.title)
            || matcher.is_match(&article.body)
            || article.tags.iter().any(|tag| matcher.is_match(tag));
        if hit {
            matches.push(article);
            if matches.len() == MAX_ARTICLES {
                break;
            }
        }
    }
    Ok(matches)
}

/// Convenience for audit metadata.
pub fn article_ids(articles: &[KnowledgeArticle]) -> Vec<Uuid> {
    articles.iter().map(|a| a.id).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
