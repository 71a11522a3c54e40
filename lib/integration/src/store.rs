//! Document-store-backed integration repository.

use crate::codec::{decode, encode};
use crate::config::TableConfig;
use crate::error::{CodecError, Entity, IntegrationStoreError};
use crate::model::{Integration, IntegrationConfig, fields, is_unset};
use crate::repository::IntegrationRepository;
use async_trait::async_trait;
use chrono::Utc;
use posbridge_core::{IntegrationId, PosId};
use posbridge_docstore::{Collection, DocumentStore};
use rootcause::prelude::Report;
use tracing::{debug, instrument, warn};

#[cfg(feature = "postgres")]
use crate::config::StoreConfig;
#[cfg(feature = "postgres")]
use posbridge_docstore::PgDocumentStore;

/// Integration repository over a [`DocumentStore`].
///
/// Holds only the shared client handle and collection descriptors; every
/// operation is a sequence of single-document round-trips.
#[derive(Debug, Clone)]
pub struct DocumentIntegrationStore<S> {
    client: S,
    integrations: Collection,
    configs: Collection,
    config_index: String,
    pos_id_index: Option<String>,
}

impl<S: DocumentStore> DocumentIntegrationStore<S> {
    /// Creates a store using the configured collection and index names.
    #[must_use]
    pub fn new(client: S, tables: &TableConfig) -> Self {
        let mut integrations = Collection::new(&tables.integrations, fields::INTEGRATION_ID);
        if let Some(index) = &tables.pos_id_index {
            integrations = integrations.with_index(index, fields::POS_ID);
        }
        let configs = Collection::new(&tables.configs, fields::INTEGRATION_CONFIG_ID)
            .with_index(&tables.config_index, fields::INTEGRATION_ID);

        Self {
            client,
            integrations,
            configs,
            config_index: tables.config_index.clone(),
            pos_id_index: tables.pos_id_index.clone(),
        }
    }

    /// Returns the document store client.
    #[must_use]
    pub fn client(&self) -> &S {
        &self.client
    }

    /// Returns the integrations collection descriptor.
    #[must_use]
    pub fn integrations_collection(&self) -> &Collection {
        &self.integrations
    }

    /// Returns the configs collection descriptor.
    #[must_use]
    pub fn configs_collection(&self) -> &Collection {
        &self.configs
    }

    async fn write_integration(
        &self,
        operation: &'static str,
        mut integration: Integration,
    ) -> Result<Integration, Report<IntegrationStoreError>> {
        if integration.integration_id.is_empty() {
            return Err(IntegrationStoreError::Validation {
                operation,
                field: fields::INTEGRATION_ID,
            }
            .into());
        }
        if let Some(field) = integration.reserved_attribute() {
            return Err(reserved(operation, field));
        }

        let now = Utc::now();
        if is_unset(integration.created_at) {
            integration.created_at = Some(now);
        }
        if is_unset(integration.last_sync) {
            integration.last_sync = Some(now);
        }
        integration.clear_configs();

        let id = integration.integration_id.as_str();
        let document = encode(Entity::Integration, &integration)
            .map_err(|e| codec_failure(e, operation, id))?;
        self.client
            .put(&self.integrations, document)
            .await
            .map_err(|report| report.context(persistence(operation, id)))?;

        debug!(integration_id = %id, "integration written");
        Ok(integration)
    }
}

#[cfg(feature = "postgres")]
impl DocumentIntegrationStore<PgDocumentStore> {
    /// Connects to PostgreSQL and builds a store from configuration.
    ///
    /// # Errors
    ///
    /// `Persistence` if the connection or the schema migration fails.
    pub async fn connect(config: &StoreConfig) -> Result<Self, Report<IntegrationStoreError>> {
        const OPERATION: &str = "connect";

        let client =
            PgDocumentStore::connect(&config.database.url, config.database.max_connections)
                .await
                .map_err(|report| report.context(persistence(OPERATION, "")))?;

        if config.database.run_migrations {
            client
                .migrate()
                .await
                .map_err(|report| report.context(persistence(OPERATION, "")))?;
        }

        Ok(Self::new(client, &config.tables))
    }
}

fn persistence(operation: &'static str, id: &str) -> IntegrationStoreError {
    IntegrationStoreError::Persistence {
        operation,
        id: id.to_string(),
    }
}

fn reserved(operation: &'static str, field: &'static str) -> Report<IntegrationStoreError> {
    IntegrationStoreError::ReservedAttribute { operation, field }.into()
}

fn codec_failure(
    error: CodecError,
    operation: &'static str,
    id: &str,
) -> Report<IntegrationStoreError> {
    Report::<CodecError>::from(error).context(persistence(operation, id))
}

#[async_trait]
impl<S: DocumentStore> IntegrationRepository for DocumentIntegrationStore<S> {
    #[instrument(skip(self, integration), fields(integration_id = %integration.integration_id))]
    async fn save_integration(
        &self,
        integration: Integration,
    ) -> Result<Integration, Report<IntegrationStoreError>> {
        self.write_integration("save_integration", integration)
            .await
    }

    #[instrument(skip(self), fields(integration_id = %id))]
    async fn get_integration_by_id(
        &self,
        id: &IntegrationId,
    ) -> Result<Integration, Report<IntegrationStoreError>> {
        const OPERATION: &str = "get_integration_by_id";

        let document = self
            .client
            .get(&self.integrations, id.as_str())
            .await
            .map_err(|report| report.context(persistence(OPERATION, id.as_str())))?;

        let Some(document) = document else {
            return Err(IntegrationStoreError::NotFound {
                operation: OPERATION,
                entity: Entity::Integration,
                id: id.to_string(),
            }
            .into());
        };

        let integration: Integration = decode(Entity::Integration, document)
            .map_err(|e| codec_failure(e, OPERATION, id.as_str()))?;
        let configs = self
            .get_integration_configs(id)
            .await
            .map_err(|report| IntegrationStoreError::within(report, OPERATION, id.as_str()))?;

        Ok(integration.with_configs(configs))
    }

    #[instrument(skip(self), fields(pos_id = %pos_id))]
    async fn get_integrations_by_pos_id(
        &self,
        pos_id: &PosId,
    ) -> Result<Vec<Integration>, Report<IntegrationStoreError>> {
        const OPERATION: &str = "get_integrations_by_pos_id";

        let documents = match &self.pos_id_index {
            Some(index) => {
                self.client
                    .query(&self.integrations, index, pos_id.as_str())
                    .await
            }
            None => {
                self.client
                    .scan(&self.integrations, fields::POS_ID, pos_id.as_str())
                    .await
            }
        }
        .map_err(|report| report.context(persistence(OPERATION, pos_id.as_str())))?;

        let mut integrations = Vec::with_capacity(documents.len());
        for document in documents {
            let integration: Integration = decode(Entity::Integration, document)
                .map_err(|e| codec_failure(e, OPERATION, pos_id.as_str()))?;
            let configs = self
                .get_integration_configs(&integration.integration_id)
                .await
                .map_err(|report| {
                    IntegrationStoreError::within(
                        report,
                        OPERATION,
                        integration.integration_id.as_str(),
                    )
                })?;
            integrations.push(integration.with_configs(configs));
        }

        debug!(count = integrations.len(), "integrations found for pos");
        Ok(integrations)
    }

    #[instrument(skip(self, integration), fields(integration_id = %integration.integration_id))]
    async fn update_integration(
        &self,
        mut integration: Integration,
    ) -> Result<Integration, Report<IntegrationStoreError>> {
        const OPERATION: &str = "update_integration";

        if integration.integration_id.is_empty() {
            return Err(IntegrationStoreError::Validation {
                operation: OPERATION,
                field: fields::INTEGRATION_ID,
            }
            .into());
        }

        self.get_integration_by_id(&integration.integration_id)
            .await
            .map_err(|report| {
                IntegrationStoreError::within(
                    report,
                    OPERATION,
                    integration.integration_id.as_str(),
                )
            })?;

        integration.last_sync = Some(Utc::now());
        self.write_integration(OPERATION, integration).await
    }

    #[instrument(skip(self), fields(integration_id = %id))]
    async fn delete_integration(
        &self,
        id: &IntegrationId,
    ) -> Result<(), Report<IntegrationStoreError>> {
        const OPERATION: &str = "delete_integration";

        self.delete_integration_configs(id).await.map_err(|report| {
            warn!("config cascade failed; integration left in place");
            IntegrationStoreError::within(report, OPERATION, id.as_str())
        })?;

        self.client
            .delete(&self.integrations, id.as_str())
            .await
            .map_err(|report| report.context(persistence(OPERATION, id.as_str())))?;

        debug!("integration deleted");
        Ok(())
    }

    #[instrument(
        skip(self, config),
        fields(
            integration_config_id = %config.integration_config_id,
            integration_id = %config.integration_id,
        )
    )]
    async fn save_integration_config(
        &self,
        config: IntegrationConfig,
    ) -> Result<IntegrationConfig, Report<IntegrationStoreError>> {
        const OPERATION: &str = "save_integration_config";

        if config.integration_config_id.is_empty() {
            return Err(IntegrationStoreError::Validation {
                operation: OPERATION,
                field: fields::INTEGRATION_CONFIG_ID,
            }
            .into());
        }
        if config.integration_id.is_empty() {
            return Err(IntegrationStoreError::Validation {
                operation: OPERATION,
                field: fields::INTEGRATION_ID,
            }
            .into());
        }
        if let Some(field) = config.reserved_attribute() {
            return Err(reserved(OPERATION, field));
        }

        self.get_integration_by_id(&config.integration_id)
            .await
            .map_err(|report| {
                IntegrationStoreError::within(report, OPERATION, config.integration_id.as_str())
            })?;

        let id = config.integration_config_id.as_str();
        let document = encode(Entity::IntegrationConfig, &config)
            .map_err(|e| codec_failure(e, OPERATION, id))?;
        self.client
            .put(&self.configs, document)
            .await
            .map_err(|report| report.context(persistence(OPERATION, id)))?;

        debug!("integration config written");
        Ok(config)
    }

    #[instrument(skip(self), fields(integration_id = %integration_id))]
    async fn get_integration_configs(
        &self,
        integration_id: &IntegrationId,
    ) -> Result<Vec<IntegrationConfig>, Report<IntegrationStoreError>> {
        const OPERATION: &str = "get_integration_configs";

        let documents = self
            .client
            .query(&self.configs, &self.config_index, integration_id.as_str())
            .await
            .map_err(|report| report.context(persistence(OPERATION, integration_id.as_str())))?;

        let configs = documents
            .into_iter()
            .map(|document| {
                decode(Entity::IntegrationConfig, document)
                    .map_err(|e| codec_failure(e, OPERATION, integration_id.as_str()))
            })
            .collect::<Result<Vec<IntegrationConfig>, _>>()?;

        debug!(count = configs.len(), "integration configs found");
        Ok(configs)
    }

    #[instrument(skip(self), fields(integration_id = %integration_id))]
    async fn delete_integration_configs(
        &self,
        integration_id: &IntegrationId,
    ) -> Result<(), Report<IntegrationStoreError>> {
        const OPERATION: &str = "delete_integration_configs";

        let configs = self
            .get_integration_configs(integration_id)
            .await
            .map_err(|report| {
                IntegrationStoreError::within(report, OPERATION, integration_id.as_str())
            })?;

        let total = configs.len();
        for (deleted, config) in configs.iter().enumerate() {
            let config_id = config.integration_config_id.as_str();
            self.client
                .delete(&self.configs, config_id)
                .await
                .map_err(|report| {
                    warn!(
                        integration_config_id = %config_id,
                        deleted,
                        remaining = total - deleted,
                        "config deletion stopped partway"
                    );
                    report.context(persistence(OPERATION, config_id))
                })?;
        }

        debug!(count = total, "integration configs deleted");
        Ok(())
    }
}
