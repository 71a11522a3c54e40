//! Core types shared by the posbridge crates.
//!
//! Provides the string identifiers of integration records.

pub mod id;

pub use id::{IntegrationConfigId, IntegrationId, PosId};
