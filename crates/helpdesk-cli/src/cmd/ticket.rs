use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use helpdesk_core::pipeline::TriagePipeline;
use helpdesk_core::ticket::Ticket;
use helpdesk_core::types::{Category, TicketStatus};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum TicketSubcommand {
    /// Create a ticket and triage it immediately
    Create {
        /// Short summary shown in listings and the draft reply
        title: String,
        /// Free-text problem description (classifier and KB input)
        #[arg(long)]
        description: String,
        /// Requester email
        #[arg(long)]
        requester: String,
        /// Initial category: billing, tech, shipping, other (defaults to other)
        #[arg(long)]
        category: Option<String>,
        /// Skip the automatic triage run
        #[arg(long)]
        no_triage: bool,
    },

    /// List tickets
    List {
        /// Filter by status: open, waiting_human, resolved, closed
        #[arg(long)]
        status: Option<String>,
    },

    /// Show one ticket
    Show { id: String },

    /// Record a human agent reply (forces status to resolved)
    Reply {
        id: String,
        #[arg(long)]
        author: String,
        #[arg(long)]
        message: String,
    },

    /// Assign the ticket to an agent
    Assign {
        id: String,
        #[arg(long)]
        assignee: String,
    },

    /// Close the ticket (terminal)
    Close { id: String },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, subcmd: TicketSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        TicketSubcommand::Create {
            title,
            description,
            requester,
            category,
            no_triage,
        } => create(
            root,
            &title,
            &description,
            &requester,
            category.as_deref(),
            no_triage,
            json,
        ),
        TicketSubcommand::List { status } => list(root, status.as_deref(), json),
        TicketSubcommand::Show { id } => show(root, &id, json),
        TicketSubcommand::Reply {
            id,
            author,
            message,
        } => reply(root, &id, &author, &message),
        TicketSubcommand::Assign { id, assignee } => assign(root, &id, &assignee),
        TicketSubcommand::Close { id } => close(root, &id),
    }
}

fn parse_id(id: &str) -> anyhow::Result<Uuid> {
    Uuid::parse_str(id).with_context(|| format!("invalid ticket id: {id}"))
}

// ---------------------------------------------------------------------------
// create
// ---------------------------------------------------------------------------

fn create(
    root: &Path,
    title: &str,
    description: &str,
    requester: &str,
    category: Option<&str>,
    no_triage: bool,
    json: bool,
) -> anyhow::Result<()> {
    let category = category.map(Category::from_str).transpose()?;
    let store = Arc::new(super::open_store(root)?);
    let ticket = Ticket::create(&store, title, description, requester, category)?;

    // Triage is non-blocking: a failure here is reported but never fails
    // the creation itself.
    if !no_triage {
        let pipeline = TriagePipeline::new(store.clone(), root);
        if let Err(e) = pipeline.run(ticket.id) {
            tracing::warn!(ticket = %ticket.id, error = %e, "triage failed");
            eprintln!("warning: triage failed for ticket {}: {e}", ticket.id);
        }
    }

    if json {
        let ticket = Ticket::load(&store, ticket.id)?;
        print_json(&ticket)?;
    } else {
        println!("{}", ticket.id);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// list / show
// ---------------------------------------------------------------------------

fn list(root: &Path, status: Option<&str>, json: bool) -> anyhow::Result<()> {
    let store = super::open_store(root)?;
    let filter = status.map(TicketStatus::from_str).transpose()?;
    let tickets = Ticket::list(&store, filter)?;

    if json {
        print_json(&tickets)?;
        return Ok(());
    }

    let rows = tickets
        .iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                t.title.clone(),
                t.status.to_string(),
                t.requester.clone(),
                t.assignee.clone().unwrap_or_default(),
            ]
        })
        .collect();
    print_table(&["ID", "TITLE", "STATUS", "REQUESTER", "ASSIGNEE"], rows);
    Ok(())
}

fn show(root: &Path, id: &str, json: bool) -> anyhow::Result<()> {
    let store = super::open_store(root)?;
    let ticket = Ticket::load(&store, parse_id(id)?)?;

    if json {
        print_json(&ticket)?;
        return Ok(());
    }

    println!("{}  {}", ticket.id, ticket.title);
    println!("status:    {}", ticket.status);
    println!("category:  {}", ticket.category);
    println!("requester: {}", ticket.requester);
    if let Some(assignee) = &ticket.assignee {
        println!("assignee:  {assignee}");
    }
    if let Some(suggestion_id) = &ticket.suggestion_id {
        println!("suggestion: {suggestion_id}");
    }
    for entry in &ticket.conversation {
        println!("[{}] {}: {}", entry.timestamp, entry.author, entry.message);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// reply / assign / close
// ---------------------------------------------------------------------------

fn reply(root: &Path, id: &str, author: &str, message: &str) -> anyhow::Result<()> {
    let store = super::open_store(root)?;
    let mut ticket = Ticket::load(&store, parse_id(id)?)?;
    ticket.reply(&store, author, message)?;
    println!("ticket {} resolved", ticket.id);
    Ok(())
}

fn assign(root: &Path, id: &str, assignee: &str) -> anyhow::Result<()> {
    let store = super::open_store(root)?;
    let mut ticket = Ticket::load(&store, parse_id(id)?)?;
    ticket.assign(&store, assignee)?;
    println!("ticket {} assigned to {assignee}", ticket.id);
    Ok(())
}

fn close(root: &Path, id: &str) -> anyhow::Result<()> {
    let store = super::open_store(root)?;
    let mut ticket = Ticket::load(&store, parse_id(id)?)?;
    ticket.close(&store)?;
    println!("ticket {} closed", ticket.id);
    Ok(())
}
