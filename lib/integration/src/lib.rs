//! Integration record store for posbridge.
//!
//! This crate provides:
//!
//! - **Records**: integrations and their configuration entries
//! - **Repository trait**: CRUD over both collections with referential
//!   consistency (parent existence checks, cascading deletes) enforced here
//! - **Document store implementation**: the repository over any
//!   [`posbridge_docstore::DocumentStore`]
//! - **Configuration**: collection names and database settings from the environment

mod codec;
pub mod config;
pub mod error;
pub mod model;
pub mod repository;
pub mod store;

pub use config::{DatabaseConfig, StoreConfig, TableConfig};
pub use error::{CodecError, Entity, ErrorKind, IntegrationStoreError};
pub use model::{Integration, IntegrationConfig};
pub use repository::IntegrationRepository;
pub use store::DocumentIntegrationStore;
