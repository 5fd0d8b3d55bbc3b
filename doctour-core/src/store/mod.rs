//! Document store seam
//!
//! `MongoStore` talks to a real server; `MemoryStore` keeps documents in
//! process for tests and offline dry runs.

mod memory;
mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

use async_trait::async_trait;
use bson::{Bson, Document};

use crate::error::Result;
use crate::filter::{Filter, Update};

/// Counts reported by an update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

/// One collection's worth of CRUD operations
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short label for logs ("mongodb", "memory")
    fn backend(&self) -> &'static str;

    /// Liveness check against the primary
    async fn ping(&self) -> Result<()>;

    /// Drop the collection. Dropping a missing collection succeeds.
    async fn drop_collection(&self) -> Result<()>;

    /// Insert one document, returning its `_id`
    async fn insert_one(&self, doc: Document) -> Result<Bson>;

    /// Insert documents in order, returning their `_id`s in the same order
    async fn insert_many(&self, docs: Vec<Document>) -> Result<Vec<Bson>>;

    async fn find(&self, filter: &Filter) -> Result<Vec<Document>>;

    async fn update_many(&self, filter: &Filter, update: &Update) -> Result<UpdateOutcome>;

    /// Delete matching documents, returning how many were removed
    async fn delete_many(&self, filter: &Filter) -> Result<u64>;

    /// Release the connection
    async fn shutdown(&self) -> Result<()>;
}
