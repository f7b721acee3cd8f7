use crate::output::print_json;
use clap::Subcommand;
use helpdesk_core::policy::TriagePolicyConfig;
use std::path::Path;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show the effective triage policy (defaults apply if never set)
    Show,

    /// Update triage policy fields
    Set {
        /// Allow the pipeline to auto-resolve confident classifications
        #[arg(long)]
        auto_close: Option<bool>,
        /// Minimum confidence for auto-close (0.0–1.0)
        #[arg(long)]
        threshold: Option<f64>,
        /// SLA budget in hours
        #[arg(long)]
        sla_hours: Option<u32>,
    },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => {
            let config = TriagePolicyConfig::load(root)?;
            if json {
                print_json(&config)?;
            } else {
                println!("auto_close_enabled:   {}", config.auto_close_enabled);
                println!("confidence_threshold: {}", config.confidence_threshold);
                println!("sla_hours:            {}", config.sla_hours);
            }
            Ok(())
        }
        ConfigSubcommand::Set {
            auto_close,
            threshold,
            sla_hours,
        } => {
            let mut config = TriagePolicyConfig::load(root)?;
            if let Some(v) = auto_close {
                config.auto_close_enabled = v;
            }
            if let Some(v) = threshold {
                anyhow::ensure!(
                    (0.0..=1.0).contains(&v),
                    "threshold must be between 0.0 and 1.0"
                );
                config.confidence_threshold = v;
            }
            if let Some(v) = sla_hours {
                config.sla_hours = v;
            }
            config.save(root)?;
            if json {
                print_json(&config)?;
            }
            Ok(())
        }
    }
}
