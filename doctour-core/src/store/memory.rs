//! In-process document store

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{Bson, Document};
use tokio::sync::Mutex;
use tracing::debug;

use super::{DocumentStore, UpdateOutcome};
use crate::error::Result;
use crate::filter::{Filter, Update};

/// Ordered collection held in memory.
///
/// Documents keep insertion order, which is what `find` returns.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: Mutex<Vec<Document>>,
    shut_down: Mutex<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with existing documents (ids are assigned if missing)
    pub fn with_documents(docs: Vec<Document>) -> Self {
        let docs = docs
            .into_iter()
            .map(|mut doc| {
                ensure_id(&mut doc);
                doc
            })
            .collect();
        Self {
            docs: Mutex::new(docs),
            shut_down: Mutex::new(false),
        }
    }

    pub async fn len(&self) -> usize {
        self.docs.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.docs.lock().await.is_empty()
    }

    pub async fn is_shut_down(&self) -> bool {
        *self.shut_down.lock().await
    }
}

fn ensure_id(doc: &mut Document) -> Bson {
    match doc.get("_id") {
        Some(id) => id.clone(),
        None => {
            let id = Bson::ObjectId(ObjectId::new());
            // _id goes first, like the server stores it
            let mut with_id = Document::new();
            with_id.insert("_id", id.clone());
            for (key, value) in std::mem::take(doc) {
                with_id.insert(key, value);
            }
            *doc = with_id;
            id
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn drop_collection(&self) -> Result<()> {
        let mut docs = self.docs.lock().await;
        debug!(dropped = docs.len(), "memory collection dropped");
        docs.clear();
        Ok(())
    }

    async fn insert_one(&self, mut doc: Document) -> Result<Bson> {
        let id = ensure_id(&mut doc);
        self.docs.lock().await.push(doc);
        Ok(id)
    }

    async fn insert_many(&self, docs: Vec<Document>) -> Result<Vec<Bson>> {
        let mut stored = self.docs.lock().await;
        let mut ids = Vec::with_capacity(docs.len());
        for mut doc in docs {
            ids.push(ensure_id(&mut doc));
            stored.push(doc);
        }
        Ok(ids)
    }

    async fn find(&self, filter: &Filter) -> Result<Vec<Document>> {
        let docs = self.docs.lock().await;
        Ok(docs.iter().filter(|doc| filter.matches(doc)).cloned().collect())
    }

    async fn update_many(&self, filter: &Filter, update: &Update) -> Result<UpdateOutcome> {
        let mut docs = self.docs.lock().await;
        let mut outcome = UpdateOutcome::default();
        for doc in docs.iter_mut().filter(|doc| filter.matches(doc)) {
            outcome.matched += 1;
            if update.apply(doc) {
                outcome.modified += 1;
            }
        }
        Ok(outcome)
    }

    async fn delete_many(&self, filter: &Filter) -> Result<u64> {
        let mut docs = self.docs.lock().await;
        let before = docs.len();
        docs.retain(|doc| !filter.matches(doc));
        Ok((before - docs.len()) as u64)
    }

    async fn shutdown(&self) -> Result<()> {
        *self.shut_down.lock().await = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[tokio::test]
    async fn insert_assigns_ids_in_order() {
        let store = MemoryStore::new();
        let first = store.insert_one(doc! { "name": "a" }).await.unwrap();
        let rest = store
            .insert_many(vec![doc! { "name": "b" }, doc! { "name": "c" }])
            .await
            .unwrap();

        assert!(matches!(first, Bson::ObjectId(_)));
        assert_eq!(rest.len(), 2);
        assert_ne!(rest[0], rest[1]);

        let all = store.find(&Filter::All).await.unwrap();
        let names: Vec<_> = all.iter().map(|d| d.get_str("name").unwrap()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(all[0].keys().next().map(String::as_str), Some("_id"));
        assert_eq!(all[1].get("_id"), Some(&rest[0]));
    }

    #[tokio::test]
    async fn existing_id_is_kept() {
        let store = MemoryStore::new();
        let id = store.insert_one(doc! { "_id": 7, "name": "x" }).await.unwrap();
        assert_eq!(id, Bson::Int32(7));
    }

    #[tokio::test]
    async fn update_and_delete_counts() {
        let store = MemoryStore::with_documents(vec![
            doc! { "name": "michael", "bank_money": 1000_i64 },
            doc! { "name": "michael", "bank_money": 2000_i64 },
            doc! { "name": "Jack", "bank_money": 800_i64 },
        ]);

        let outcome = store
            .update_many(
                &Filter::eq("name", "michael"),
                &Update::set("bank_money", 2000_i64),
            )
            .await
            .unwrap();
        assert_eq!(outcome, UpdateOutcome { matched: 2, modified: 1 });

        let deleted = store
            .delete_many(&Filter::lt("bank_money", 1000_i64))
            .await
            .unwrap();
        assert_eq!(deleted, 1);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn drop_clears_and_shutdown_flags() {
        let store = MemoryStore::with_documents(vec![doc! { "n": 1 }]);
        store.drop_collection().await.unwrap();
        assert!(store.is_empty().await);
        // Dropping again is fine
        store.drop_collection().await.unwrap();

        assert!(!store.is_shut_down().await);
        store.shutdown().await.unwrap();
        assert!(store.is_shut_down().await);
    }
}
