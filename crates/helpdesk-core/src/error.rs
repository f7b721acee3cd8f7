use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum HelpdeskError {
    #[error("ticket not found: {0}")]
    TicketNotFound(Uuid),

    #[error("no suggestion recorded for ticket: {0}")]
    SuggestionNotFound(Uuid),

    #[error("article not found: {0}")]
    ArticleNotFound(Uuid),

    #[error("invalid transition from {from} to {to}: {reason}")]
    InvalidTransition {
        from: String,
        to: String,
        reason: String,
    },

    #[error("invalid ticket status: {0}")]
    InvalidStatus(String),

    #[error("invalid category: {0}")]
    InvalidCategory(String),

    #[error("invalid actor: {0}")]
    InvalidActor(String),

    #[error("search error: {0}")]
    Search(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HelpdeskError>;
