//! The CRUD walkthrough
//!
//! Runs a fixed sequence against any [`DocumentStore`]: ping, drop, insert
//! one, find all, insert many, filtered find, update, re-query, delete.
//! Human-readable results go to the caller's writer; progress goes to
//! `tracing`. The first failing step aborts the run.

use std::future::Future;
use std::io::Write;

use bson::{Bson, Document};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn, Instrument};

use crate::error::{DocTourError, Result};
use crate::filter::{Filter, Update};
use crate::record::{Account, FIELD_BANK_MONEY, FIELD_NAME};
use crate::store::{DocumentStore, UpdateOutcome};

/// Thresholds and values the walkthrough filters and updates with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioPlan {
    /// Filtered query keeps `bank_money > rich_threshold`
    pub rich_threshold: i64,
    /// Update targets records with this name
    pub update_name: String,
    /// New `bank_money` for the updated records
    pub update_amount: i64,
    /// Delete removes `bank_money < delete_below`
    pub delete_below: i64,
}

impl Default for ScenarioPlan {
    fn default() -> Self {
        Self {
            rich_threshold: 900,
            update_name: "michael".to_string(),
            update_amount: 2000,
            delete_below: 1000,
        }
    }
}

impl ScenarioPlan {
    pub fn rich_filter(&self) -> Filter {
        Filter::gt(FIELD_BANK_MONEY, self.rich_threshold)
    }

    pub fn update_filter(&self) -> Filter {
        Filter::eq(FIELD_NAME, self.update_name.as_str())
    }

    pub fn update(&self) -> Update {
        Update::set(FIELD_BANK_MONEY, self.update_amount)
    }

    pub fn delete_filter(&self) -> Filter {
        Filter::lt(FIELD_BANK_MONEY, self.delete_below)
    }
}

/// Everything the walkthrough observed, in step order
#[derive(Debug, Clone, PartialEq)]
pub struct WalkthroughReport {
    pub inserted_id: Bson,
    pub all_documents: Vec<Document>,
    pub batch_ids: Vec<Bson>,
    pub rich_documents: Vec<Document>,
    pub update: UpdateOutcome,
    pub updated_documents: Vec<Document>,
    pub deleted: u64,
}

pub struct Walkthrough<'a, S: ?Sized> {
    store: &'a S,
    plan: ScenarioPlan,
    now: DateTime<Utc>,
}

impl<'a, S> Walkthrough<'a, S>
where
    S: DocumentStore + ?Sized,
{
    pub fn new(store: &'a S, plan: ScenarioPlan) -> Self {
        Self {
            store,
            plan,
            now: Utc::now(),
        }
    }

    /// Pin the creation timestamp the seed records are based on
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub async fn run<W>(&self, out: &mut W) -> Result<WalkthroughReport>
    where
        W: Write + ?Sized,
    {
        let store = self.store;
        let plan = &self.plan;
        info!(backend = store.backend(), "starting walkthrough");

        step("ping", store.ping()).await?;
        writeln!(out, "ping success")?;

        step("drop collection", store.drop_collection()).await?;

        let inserted_id = step("insert one", async {
            let doc = Account::seed_single(self.now).to_document()?;
            store.insert_one(doc).await
        })
        .await?;
        writeln!(out, "======= inserted id ================")?;
        info!("inserted ID is : {}", inserted_id);

        writeln!(out, "== query all data ==")?;
        let all_documents = step("query all", store.find(&Filter::All)).await?;
        print_documents(out, &all_documents)?;

        writeln!(out, "=========== inserted many data ===============")?;
        let batch_ids = step("insert many", async {
            let docs = Account::seed_batch(self.now)
                .iter()
                .map(Account::to_document)
                .collect::<Result<Vec<_>>>()?;
            store.insert_many(docs).await
        })
        .await?;
        for id in &batch_ids {
            writeln!(out, "{}", id)?;
        }

        writeln!(out, "=========== query specific data =====================")?;
        let rich_documents = step("filtered query", store.find(&plan.rich_filter())).await?;
        print_documents(out, &rich_documents)?;

        let update = step(
            "update many",
            store.update_many(&plan.update_filter(), &plan.update()),
        )
        .await?;
        info!(matched = update.matched, modified = update.modified, "update applied");
        writeln!(out, "========= updated modified count ===========")?;
        writeln!(out, "{}", update.modified)?;

        let updated_documents = step("check update", store.find(&plan.update_filter())).await?;
        writeln!(out, "=========== checked updated result ==============")?;
        print_documents(out, &updated_documents)?;
        writeln!(out, "===============================")?;

        let deleted = step("delete many", store.delete_many(&plan.delete_filter())).await?;
        writeln!(out, "===== delete many data modified count =====")?;
        writeln!(out, "{}", deleted)?;

        info!(deleted, "walkthrough complete");

        Ok(WalkthroughReport {
            inserted_id,
            all_documents,
            batch_ids,
            rich_documents,
            update,
            updated_documents,
            deleted,
        })
    }

    /// Run the walkthrough, then always release the store.
    ///
    /// A step error takes precedence over a shutdown error.
    pub async fn run_with_cleanup<W>(&self, out: &mut W) -> Result<WalkthroughReport>
    where
        W: Write + ?Sized,
    {
        let result = self.run(out).await;
        let shutdown = step("disconnect", self.store.shutdown()).await;

        match (result, shutdown) {
            (Ok(report), Ok(())) => Ok(report),
            (Ok(_), Err(err)) => Err(err),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(shutdown_err)) => {
                warn!(error = %shutdown_err, "disconnect also failed");
                Err(err)
            }
        }
    }
}

async fn step<T, F>(name: &'static str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    fut.instrument(info_span!("step", name))
        .await
        .map_err(|err| DocTourError::in_step(name, err))
}

fn print_documents<W>(out: &mut W, docs: &[Document]) -> Result<()>
where
    W: Write + ?Sized,
{
    for doc in docs {
        writeln!(out, "{}", doc)?;
    }
    Ok(())
}
