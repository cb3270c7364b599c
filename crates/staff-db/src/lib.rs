//! # staff-db
//!
//! Storage layer for Staffing RS.
//!
//! - Connection pool management and embedded migrations
//! - Store traits per aggregate, combined into [`StaffingStore`]
//! - [`PgStore`]: PostgreSQL implementation using SQLx
//! - [`MemoryStore`]: in-process implementation for tests and database-less runs
//!
//! ## Example
//!
//! ```ignore
//! use staff_db::{Database, DatabaseConfig, PgStore, ResourceStore};
//!
//! let db = Database::connect(&DatabaseConfig::with_url(url)).await?;
//! db.migrate().await?;
//!
//! let store = PgStore::new(db.pool().clone());
//! let resource = store.find_resource(1).await?;
//! ```

pub mod memory;
pub mod pool;
pub mod postgres;
pub mod repository;
pub mod store;

pub use memory::MemoryStore;
pub use pool::{Database, DatabaseConfig, PoolStats};
pub use postgres::PgStore;
pub use repository::{RepositoryError, RepositoryResult};
pub use store::{
    OccupationListing, OccupationStore, PoleStore, ProjectStore, ResourceSnapshot, ResourceStore,
    StaffingStore, UserStore,
};
