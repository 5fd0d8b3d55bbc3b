//! The account document written by the walkthrough

use bson::oid::ObjectId;
use bson::Document;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DocTourError, Result};

pub const FIELD_NAME: &str = "name";
pub const FIELD_CONTENT: &str = "content";
pub const FIELD_BANK_MONEY: &str = "bank_money";
pub const FIELD_CREATE_AT: &str = "create_at";

/// One account record.
///
/// `id` is `None` until the store assigns one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub content: String,
    pub bank_money: i64,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub create_at: DateTime<Utc>,
}

impl Account {
    pub fn new(
        name: impl Into<String>,
        content: impl Into<String>,
        bank_money: i64,
        create_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            content: content.into(),
            bank_money,
            create_at,
        }
    }

    pub fn to_document(&self) -> Result<Document> {
        bson::to_document(self).map_err(|e| DocTourError::bson(format!("account {}", self.name), e))
    }

    pub fn from_document(doc: Document) -> Result<Self> {
        bson::from_document(doc).map_err(|e| DocTourError::bson("account document", e))
    }

    /// The record inserted on its own at the start of the walkthrough
    pub fn seed_single(now: DateTime<Utc>) -> Self {
        Self::new("michael", "test content", 1000, now)
    }

    /// The records inserted as a batch, in insertion order
    pub fn seed_batch(now: DateTime<Utc>) -> Vec<Self> {
        vec![
            Self::new("Andy", "new test content", 1500, now + Duration::hours(36)),
            Self::new("Jack", "jack content", 800, now + Duration::hours(12)),
        ]
    }
}
