//! MongoDB-backed store
//!
//! Thin wrapper over one `mongodb::Collection<Document>`.

use std::time::Duration;

use async_trait::async_trait;
use bson::{doc, Bson, Document};
use futures::TryStreamExt;
use mongodb::options::{ClientOptions, ReadPreference, SelectionCriteria};
use mongodb::{Client, Collection};
use tokio::time::Instant;
use tracing::{debug, info};

use super::{DocumentStore, UpdateOutcome};
use crate::config::StoreConfig;
use crate::error::{DocTourError, Result};
use crate::filter::{Filter, Update};

const APP_NAME: &str = "doctour";

/// Cloning shares the underlying client, its connection pool and the
/// connect deadline.
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    collection: Collection<Document>,
    timeout: Duration,
    deadline: Instant,
}

impl MongoStore {
    /// Build a client for the configured collection.
    ///
    /// The driver connects lazily, so this only resolves the connection
    /// string. `ping` is the first call that touches the server. Both share
    /// one deadline, `connect_timeout` from now.
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let timeout = config.connect_timeout();
        let deadline = Instant::now() + timeout;

        let mut options = tokio::time::timeout_at(deadline, async {
            ClientOptions::parse(config.uri.as_str()).await
        })
        .await
        .map_err(|_| DocTourError::timeout("resolving connection string", timeout))??;

        options.connect_timeout = Some(timeout);
        options.server_selection_timeout = Some(timeout);
        options.app_name = Some(APP_NAME.to_string());

        let client = Client::with_options(options)?;
        let collection = client
            .database(&config.database)
            .collection::<Document>(&config.collection);

        info!(
            uri = %config.redacted_uri(),
            database = %config.database,
            collection = %config.collection,
            "mongodb client ready"
        );

        Ok(Self {
            client,
            collection,
            timeout,
            deadline,
        })
    }

    pub fn namespace(&self) -> String {
        self.collection.namespace().to_string()
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    fn backend(&self) -> &'static str {
        "mongodb"
    }

    /// Bounded by the connect deadline; a ping after it has passed fails.
    async fn ping(&self) -> Result<()> {
        let admin = self.client.database("admin");
        let command = admin
            .run_command(doc! { "ping": 1 })
            .selection_criteria(SelectionCriteria::ReadPreference(ReadPreference::Primary));

        tokio::time::timeout_at(self.deadline, async { command.await })
            .await
            .map_err(|_| DocTourError::timeout("pinging primary", self.timeout))??;
        Ok(())
    }

    async fn drop_collection(&self) -> Result<()> {
        self.collection.drop().await?;
        debug!(namespace = %self.namespace(), "collection dropped");
        Ok(())
    }

    async fn insert_one(&self, doc: Document) -> Result<Bson> {
        let result = self.collection.insert_one(doc).await?;
        Ok(result.inserted_id)
    }

    async fn insert_many(&self, docs: Vec<Document>) -> Result<Vec<Bson>> {
        // The driver rejects an empty batch
        if docs.is_empty() {
            return Ok(Vec::new());
        }

        let result = self.collection.insert_many(docs).await?;
        let mut ids: Vec<(usize, Bson)> = result.inserted_ids.into_iter().collect();
        ids.sort_by_key(|(index, _)| *index);
        Ok(ids.into_iter().map(|(_, id)| id).collect())
    }

    async fn find(&self, filter: &Filter) -> Result<Vec<Document>> {
        let cursor = self.collection.find(filter.to_document()).await?;
        let docs: Vec<Document> = cursor.try_collect().await?;
        Ok(docs)
    }

    async fn update_many(&self, filter: &Filter, update: &Update) -> Result<UpdateOutcome> {
        let result = self
            .collection
            .update_many(filter.to_document(), update.to_document())
            .await?;
        Ok(UpdateOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn delete_many(&self, filter: &Filter) -> Result<u64> {
        let result = self.collection.delete_many(filter.to_document()).await?;
        Ok(result.deleted_count)
    }

    async fn shutdown(&self) -> Result<()> {
        self.client.clone().shutdown().await;
        debug!("mongodb client shut down");
        Ok(())
    }
}
