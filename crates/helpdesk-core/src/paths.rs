use std::path::{Path, PathBuf};

/// All helpdesk data lives under this directory inside the chosen root.
pub const DATA_DIR: &str = ".helpdesk";

pub fn data_dir(root: &Path) -> PathBuf {
    root.join(DATA_DIR)
}

/// The redb database holding tickets, articles, suggestions and audit log.
pub fn db_path(root: &Path) -> PathBuf {
    data_dir(root).join("helpdesk.db")
}

/// The triage policy config file.
pub fn policy_path(root: &Path) -> PathBuf {
    data_dir(root).join("policy.yaml")
}
