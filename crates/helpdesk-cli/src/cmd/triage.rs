use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use helpdesk_core::audit::AuditLogEntry;
use helpdesk_core::pipeline::TriagePipeline;
use helpdesk_core::suggestion::AgentSuggestion;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum TriageSubcommand {
    /// Run the triage pipeline for a ticket (accumulates on re-run)
    Run { ticket_id: String },

    /// Show the latest suggestion for a ticket
    Suggestion { ticket_id: String },

    /// Show the audit trail for a ticket, newest first
    Audit { ticket_id: String },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, subcmd: TriageSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        TriageSubcommand::Run { ticket_id } => triage(root, &ticket_id, json),
        TriageSubcommand::Suggestion { ticket_id } => suggestion(root, &ticket_id, json),
        TriageSubcommand::Audit { ticket_id } => audit(root, &ticket_id, json),
    }
}

fn parse_id(id: &str) -> anyhow::Result<Uuid> {
    Uuid::parse_str(id).with_context(|| format!("invalid ticket id: {id}"))
}

// ---------------------------------------------------------------------------
// run / suggestion
// ---------------------------------------------------------------------------

fn triage(root: &Path, ticket_id: &str, json: bool) -> anyhow::Result<()> {
    let store = Arc::new(super::open_store(root)?);
    let pipeline = TriagePipeline::new(store.clone(), root);
    let result = pipeline.run(parse_id(ticket_id)?)?;

    if json {
        print_json(&result)?;
    } else {
        println!(
            "suggestion {} ({}, confidence {:.2}, {})",
            result.id,
            result.predicted_category,
            result.confidence,
            if result.auto_closed {
                "auto_closed"
            } else {
                "waiting_human"
            }
        );
    }
    Ok(())
}

fn suggestion(root: &Path, ticket_id: &str, json: bool) -> anyhow::Result<()> {
    let store = super::open_store(root)?;
    let view = AgentSuggestion::view(&store, parse_id(ticket_id)?)?;

    if json {
        print_json(&view)?;
        return Ok(());
    }

    println!("category:   {}", view.predicted_category);
    println!("confidence: {:.2}", view.confidence);
    println!("status:     {}", view.status);
    for citation in &view.citations {
        println!("cites:      {} ({})", citation.title, citation.id);
    }
    println!("---\n{}", view.draft);
    Ok(())
}

// ---------------------------------------------------------------------------
// audit
// ---------------------------------------------------------------------------

fn audit(root: &Path, ticket_id: &str, json: bool) -> anyhow::Result<()> {
    let store = super::open_store(root)?;
    let trail = AuditLogEntry::trail(&store, parse_id(ticket_id)?)?;

    if json {
        print_json(&trail)?;
        return Ok(());
    }

    let rows = trail
        .iter()
        .map(|e| {
            vec![
                e.timestamp.to_rfc3339(),
                e.trace_id.to_string(),
                e.actor.to_string(),
                e.action.clone(),
                e.meta.to_string(),
            ]
        })
        .collect();
    print_table(&["TIMESTAMP", "TRACE", "ACTOR", "ACTION", "META"], rows);
    Ok(())
}
