//! The full CRUD walkthrough

use anyhow::{Context, Result};
use clap::Parser;
use doctour_core::{DemoConfig, DocumentStore, MemoryStore, Walkthrough};
use tracing::info;

use super::connect;

#[derive(Parser, Debug, Clone, Default)]
pub struct RunArgs {
    /// Use an in-process collection instead of a MongoDB server
    #[arg(long)]
    pub memory: bool,
}

pub async fn run_walkthrough(args: RunArgs, config: DemoConfig) -> Result<()> {
    let store: Box<dyn DocumentStore> = if args.memory {
        info!("running against in-memory store");
        Box::new(MemoryStore::new())
    } else {
        Box::new(connect(&config.store).await?)
    };

    let mut stdout = std::io::stdout();
    let report = Walkthrough::new(store.as_ref(), config.scenario)
        .run_with_cleanup(&mut stdout)
        .await
        .context("walkthrough aborted")?;

    info!(
        backend = store.backend(),
        documents = report.all_documents.len() + report.batch_ids.len(),
        deleted = report.deleted,
        "done"
    );
    Ok(())
}
