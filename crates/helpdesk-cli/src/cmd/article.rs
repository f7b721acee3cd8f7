use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use helpdesk_core::article::KnowledgeArticle;
use helpdesk_core::types::ArticleStatus;
use std::path::Path;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ArticleSubcommand {
    /// Add a knowledge-base article
    Add {
        title: String,
        #[arg(long)]
        body: String,
        /// Comma-separated tags
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
        /// Publish immediately instead of starting as a draft
        #[arg(long)]
        publish: bool,
    },

    /// List articles
    List,

    /// Publish a draft article
    Publish { id: String },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, subcmd: ArticleSubcommand, json: bool) -> anyhow::Result<()> {
    let store = super::open_store(root)?;
    match subcmd {
        ArticleSubcommand::Add {
            title,
            body,
            tags,
            publish,
        } => {
            let status = if publish {
                ArticleStatus::Published
            } else {
                ArticleStatus::Draft
            };
            let article = KnowledgeArticle::create(&store, title, body, tags, status)?;
            if json {
                print_json(&article)?;
            } else {
                println!("{}", article.id);
            }
            Ok(())
        }
        ArticleSubcommand::List => {
            let articles = KnowledgeArticle::list(&store)?;
            if json {
                print_json(&articles)?;
                return Ok(());
            }
            let rows = articles
                .iter()
                .map(|a| {
                    vec![
                        a.id.to_string(),
                        a.title.clone(),
                        a.status.to_string(),
                        a.tags.join(","),
                    ]
                })
                .collect();
            print_table(&["ID", "TITLE", "STATUS", "TAGS"], rows);
            Ok(())
        }
        ArticleSubcommand::Publish { id } => {
            let id = Uuid::parse_str(&id).with_context(|| format!("invalid article id: {id}"))?;
            let mut article = KnowledgeArticle::load(&store, id)?;
            article.publish(&store)?;
            println!("article {} published", article.id);
            Ok(())
        }
    }
}
