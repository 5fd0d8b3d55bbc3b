pub mod config;
pub mod error;
pub mod filter;
pub mod record;
pub mod scenario;
pub mod store;

pub use config::{DemoConfig, StoreConfig};
pub use error::{DocTourError, Result};
pub use filter::{Filter, Update};
pub use record::Account;
pub use scenario::{ScenarioPlan, Walkthrough, WalkthroughReport};
pub use store::{DocumentStore, MemoryStore, MongoStore, UpdateOutcome};
