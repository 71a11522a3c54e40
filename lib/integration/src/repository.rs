//! The integration repository trait.

use crate::error::IntegrationStoreError;
use crate::model::{Integration, IntegrationConfig};
use async_trait::async_trait;
use posbridge_core::{IntegrationId, PosId};
use rootcause::prelude::Report;

/// Persistence for integrations and their configs.
///
/// Referential consistency between the two collections is enforced here, not
/// by the backing store: configs require an existing parent, and deleting an
/// integration deletes its configs first. Existence checks are not atomic
/// with the writes that follow them.
#[async_trait]
pub trait IntegrationRepository: Send + Sync {
    /// Saves (overwrites) an integration, filling unset timestamps.
    ///
    /// Returns the record as persisted, without configs.
    ///
    /// # Errors
    ///
    /// `Validation` if the ID is empty, `Persistence` if the write fails.
    async fn save_integration(
        &self,
        integration: Integration,
    ) -> Result<Integration, Report<IntegrationStoreError>>;

    /// Fetches an integration with its configs attached.
    ///
    /// # Errors
    ///
    /// `NotFound` if absent, `Persistence` if either the fetch or the config
    /// lookup fails.
    async fn get_integration_by_id(
        &self,
        id: &IntegrationId,
    ) -> Result<Integration, Report<IntegrationStoreError>>;

    /// Fetches every integration of a point of sale, each with its configs.
    ///
    /// No matches is an empty result, not an error.
    async fn get_integrations_by_pos_id(
        &self,
        pos_id: &PosId,
    ) -> Result<Vec<Integration>, Report<IntegrationStoreError>>;

    /// Overwrites an existing integration and stamps `last_sync`.
    ///
    /// # Errors
    ///
    /// `NotFound` if the integration does not exist.
    async fn update_integration(
        &self,
        integration: Integration,
    ) -> Result<Integration, Report<IntegrationStoreError>>;

    /// Deletes an integration after deleting all of its configs.
    ///
    /// Deleting an absent integration succeeds. If a config deletion fails
    /// the integration is left in place.
    async fn delete_integration(&self, id: &IntegrationId)
    -> Result<(), Report<IntegrationStoreError>>;

    /// Saves (overwrites) a config whose parent integration exists.
    ///
    /// # Errors
    ///
    /// `Validation` if either ID is empty, `NotFound` if the parent is absent.
    async fn save_integration_config(
        &self,
        config: IntegrationConfig,
    ) -> Result<IntegrationConfig, Report<IntegrationStoreError>>;

    /// Fetches every config of an integration via the secondary index.
    async fn get_integration_configs(
        &self,
        integration_id: &IntegrationId,
    ) -> Result<Vec<IntegrationConfig>, Report<IntegrationStoreError>>;

    /// Deletes every config of an integration, one by one.
    ///
    /// Stops at the first failure; configs already deleted stay deleted.
    async fn delete_integration_configs(
        &self,
        integration_id: &IntegrationId,
    ) -> Result<(), Report<IntegrationStoreError>>;
}
