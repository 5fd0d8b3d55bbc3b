//! Command implementations for the doctour CLI

pub mod collection;
pub mod run;

pub use collection::{run_list, run_ping, run_reset};
pub use run::run_walkthrough;

use anyhow::{Context, Result};
use doctour_core::{MongoStore, StoreConfig};

use crate::ui;

/// Resolve the connection string behind a spinner.
///
/// The server is first contacted by the ping that follows.
async fn connect(store: &StoreConfig) -> Result<MongoStore> {
    ui::with_spinner_async(
        format!("Resolving {}", store.redacted_uri()),
        "Connection string resolved",
        MongoStore::connect(store),
    )
    .await
    .context("connection error")
}
