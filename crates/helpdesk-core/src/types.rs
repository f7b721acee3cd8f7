use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// TicketStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    WaitingHuman,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub fn all() -> &'static [TicketStatus] {
        &[
            TicketStatus::Open,
            TicketStatus::WaitingHuman,
            TicketStatus::Resolved,
            TicketStatus::Closed,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::WaitingHuman => "waiting_human",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
        }
    }

    /// Terminal state — no transition leaves it.
    pub fn is_terminal(self) -> bool {
        matches!(self, TicketStatus::Closed)
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TicketStatus {
    type Err = crate::error::HelpdeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(TicketStatus::Open),
            "waiting_human" => Ok(TicketStatus::WaitingHuman),
            "resolved" => Ok(TicketStatus::Resolved),
            "closed" => Ok(TicketStatus::Closed),
            _ => Err(crate::error::HelpdeskError::InvalidStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Billing,
    Tech,
    Shipping,
    Other,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Billing => "billing",
            Category::Tech => "tech",
            Category::Shipping => "shipping",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = crate::error::HelpdeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "billing" => Ok(Category::Billing),
            "tech" => Ok(Category::Tech),
            "shipping" => Ok(Category::Shipping),
            "other" => Ok(Category::Other),
            _ => Err(crate::error::HelpdeskError::InvalidCategory(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// ArticleStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticleStatus {
    Draft,
    Published,
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ArticleStatus::Draft => "draft",
            ArticleStatus::Published => "published",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

/// Who performed an audited action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    System,
    Agent,
    User,
}

impl Actor {
    pub fn as_str(self) -> &'static str {
        match self {
            Actor::System => "system",
            Actor::Agent => "agent",
            Actor::User => "user",
        }
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Actor {
    type Err = crate::error::HelpdeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system" => Ok(Actor::System),
            "agent" => Ok(Actor::Agent),
            "user" => Ok(Actor::User),
            _ => Err(crate::error::HelpdeskError::InvalidActor(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn ticket_status_roundtrip() {
        for status in TicketStatus::all() {
            let s = status.as_str();
            let parsed = TicketStatus::from_str(s).unwrap();
            assert_eq!(*status, parsed);
        }
    }

    #[test]
    fn ticket_status_rejects_unknown() {
        assert!(TicketStatus::from_str("triaged").is_err());
        assert!(TicketStatus::from_str("").is_err());
    }

    #[test]
    fn closed_is_the_only_terminal_status() {
        assert!(TicketStatus::Closed.is_terminal());
        assert!(!TicketStatus::Open.is_terminal());
        assert!(!TicketStatus::WaitingHuman.is_terminal());
        assert!(!TicketStatus::Resolved.is_terminal());
    }

    #[test]
    fn category_roundtrip() {
        let pairs = [
            ("billing", Category::Billing),
            ("tech", Category::Tech),
            ("shipping", Category::Shipping),
            ("other", Category::Other),
        ];
        for (s, expected) in pairs {
            assert_eq!(Category::from_str(s).unwrap(), expected);
        }
        assert!(Category::from_str("sales").is_err());
    }

    #[test]
    fn actor_serializes_snake_case() {
        let json = serde_json::to_string(&Actor::System).unwrap();
        assert_eq!(json, "\"system\"");
        assert_eq!(Actor::from_str("agent").unwrap(), Actor::Agent);
    }
}
