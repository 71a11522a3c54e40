//! Document store client for posbridge.
//!
//! This crate provides:
//!
//! - **DocumentStore trait**: keyed put/get/delete, secondary-index queries and
//!   attribute scans over JSON documents
//! - **Collection descriptors**: primary-key attribute and named indexes
//! - **Backends**: an in-process store and a PostgreSQL store (feature `postgres`)

pub mod collection;
pub mod error;
pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod store;

pub use collection::{Collection, Document};
pub use error::DocumentStoreError;
pub use memory::MemoryDocumentStore;
#[cfg(feature = "postgres")]
pub use postgres::PgDocumentStore;
pub use store::DocumentStore;
