use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::store::Store;
use crate::types::ArticleStatus;

// ---------------------------------------------------------------------------
// KnowledgeArticle
// ---------------------------------------------------------------------------

/// A knowledge-base entry. Read-only to the triage pipeline — only
/// published articles are ever cited in a draft reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeArticle {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: ArticleStatus,
    pub updated_at: DateTime<Utc>,
}

impl KnowledgeArticle {
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        tags: Vec<String>,
        status: ArticleStatus,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            body: body.into(),
            tags,
            status,
            updated_at: Utc::now(),
        }
    }

    pub fn create(
        store: &Store,
        title: impl Into<String>,
        body: impl Into<String>,
        tags: Vec<String>,
        status: ArticleStatus,
    ) -> Result<Self> {
        let article = Self::new(title, body, tags, status);
        store.put_article(&article)?;
        Ok(article)
    }

    pub fn load(store: &Store, id: Uuid) -> Result<Self> {
        store.article(id)
    }

    pub fn list(store: &Store) -> Result<Vec<Self>> {
        store.articles()
    }

    pub fn is_published(&self) -> bool {
        self.status == ArticleStatus::Published
    }

    /// Move a draft to published. Idempotent.
    pub fn publish(&mut self, store: &Store) -> Result<()> {
        self.status = ArticleStatus::Published;
        self.updated_at = Utc::now();
        store.put_article(self)
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
    fn create_and_publish() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(&dir.path().join("test.db")).unwrap();

        let mut article = KnowledgeArticle::create(
            &store,
            "Refund policy",
            "Refunds are processed within 5 business days.",
            vec!["billing".to_string(), "refund".to_string()],
            ArticleStatus::Draft,
        )
        .unwrap();
        assert!(!article.is_published());

        article.publish(&store).unwrap();
        let loaded = KnowledgeArticle::load(&store, article.id).unwrap();
        assert!(loaded.is_published());
        assert_eq!(loaded.title, "Refund policy");
    }

    #[test]
    fn list_returns_all_statuses() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(&dir.path().join("test.db")).unwrap();

        KnowledgeArticle::create(&store, "A", "body", vec![], ArticleStatus::Draft).unwrap();
        KnowledgeArticle::create(&store, "B", "body", vec![], ArticleStatus::Published).unwrap();

        assert_eq!(KnowledgeArticle::list(&store).unwrap().len(), 2);
    }
}
