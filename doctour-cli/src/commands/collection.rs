//! One-off collection commands: ping, list, reset
//!
//! Each connects, runs a single operation, and always disconnects.

use std::future::Future;

use anyhow::{Context, Result};
use doctour_core::{DocumentStore, Filter, MongoStore, StoreConfig};
use tracing::{info, warn};

use super::connect;

async fn with_store<T, F, Fut>(store: &StoreConfig, op: F) -> Result<T>
where
    F: FnOnce(MongoStore) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let client = connect(store).await?;
    let result = op(client.clone()).await;

    if let Err(err) = client.shutdown().await {
        warn!(error = %err, "mongodb disconnect error");
        if result.is_ok() {
            return Err(err).context("mongodb disconnect error");
        }
    }
    result
}

pub async fn run_ping(store: StoreConfig) -> Result<()> {
    with_store(&store, |client| async move {
        client.ping().await.context("ping mongodb error")?;
        println!("ping success");
        Ok::<_, anyhow::Error>(())
    })
    .await
}

pub async fn run_list(store: StoreConfig) -> Result<()> {
    with_store(&store, |client| async move {
        let docs = client
            .find(&Filter::All)
            .await
            .context("find collection err")?;
        for doc in &docs {
            println!("{}", doc);
        }
        info!(count = docs.len(), namespace = %client.namespace(), "listed documents");
        Ok::<_, anyhow::Error>(())
    })
    .await
}

pub async fn run_reset(store: StoreConfig) -> Result<()> {
    with_store(&store, |client| async move {
        client
            .drop_collection()
            .await
            .context("drop collection error")?;
        info!(namespace = %client.namespace(), "collection dropped");
        Ok::<_, anyhow::Error>(())
    })
    .await
}
