pub mod article;
pub mod config;
pub mod init;
pub mod ticket;
pub mod triage;

use anyhow::Context;
use helpdesk_core::store::Store;
use std::path::Path;

pub fn open_store(root: &Path) -> anyhow::Result<Store> {
    Store::open(&helpdesk_core::paths::db_path(root)).context("failed to open helpdesk store")
}
