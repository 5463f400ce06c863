//! Database module: the static catalog and the code that provisions it.
//!
//! Layout:
//! - `schema.rs`: collection names and index specs for `portfolio_db`
//! - `models.rs`: catalog snapshots and run reports
//! - `mongo.rs`: connection and the idempotent initializer

pub mod models;
pub mod mongo;
pub mod schema;

pub use models::{BootstrapReport, CatalogSnapshot, CollectionState};
pub use mongo::{PortfolioCatalog, connect};
pub use schema::{COLLECTIONS, CollectionSpec, DATABASE_NAME, Direction, IndexSpec};
