use anyhow::Context;
use helpdesk_core::{io, paths, policy::TriagePolicyConfig};
use std::path::Path;

/// Create the data directory, the store and a default policy file.
/// Idempotent: an existing policy file is left untouched.
pub fn run(root: &Path) -> anyhow::Result<()> {
    io::ensure_dir(&paths::data_dir(root)).context("failed to create data directory")?;
    super::open_store(root)?;

    let policy_path = paths::policy_path(root);
    if !policy_path.exists() {
        TriagePolicyConfig::default()
            .save(root)
            .context("failed to write default policy")?;
    }

    println!("Initialized helpdesk in {}", paths::data_dir(root).display());
    Ok(())
}
