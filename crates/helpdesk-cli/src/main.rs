mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    article::ArticleSubcommand, config::ConfigSubcommand, ticket::TicketSubcommand,
    triage::TriageSubcommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "helpdesk",
    about = "Helpdesk backend — tickets, knowledge base, automated triage and audit trail",
    version,
    propagate_version = true
)]
struct Cli {
    /// Data root (default: auto-detect from .helpdesk/)
    #[arg(long, global = true, env = "HELPDESK_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the helpdesk data directory
    Init,

    /// Manage tickets
    Ticket {
        #[command(subcommand)]
        subcommand: TicketSubcommand,
    },

    /// Manage knowledge-base articles
    Article {
        #[command(subcommand)]
        subcommand: ArticleSubcommand,
    },

    /// Run triage and inspect its outputs
    Triage {
        #[command(subcommand)]
        subcommand: TriageSubcommand,
    },

    /// Inspect and update the triage policy
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Ticket { subcommand } => cmd::ticket::run(&root, subcommand, cli.json),
        Commands::Article { subcommand } => cmd::article::run(&root, subcommand, cli.json),
        Commands::Triage { subcommand } => cmd::triage::run(&root, subcommand, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
