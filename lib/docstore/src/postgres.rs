//! PostgreSQL document store.
//!
//! All collections share one `documents` table keyed by `(collection, key)`.
//! Index queries and scans both use JSONB containment, which the GIN index on
//! `body` serves.

use crate::collection::{Collection, Document};
use crate::error::DocumentStoreError;
use crate::store::DocumentStore;
use async_trait::async_trait;
use rootcause::prelude::Report;
use serde_json::{Map, Value as JsonValue};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::{debug, info, instrument};

/// Document store backed by a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Creates a store over an existing pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects a new pool to `database_url`.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionFailed` if the pool cannot be established.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
    ) -> Result<Self, Report<DocumentStoreError>> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| DocumentStoreError::ConnectionFailed {
                details: e.to_string(),
            })?;

        Ok(Self { pool })
    }

    /// Applies the embedded schema migrations.
    ///
    /// # Errors
    ///
    /// Returns `RequestFailed` if a migration fails.
    pub async fn migrate(&self) -> Result<(), Report<DocumentStoreError>> {
        info!("running document store migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DocumentStoreError::RequestFailed {
                details: e.to_string(),
            })?;
        Ok(())
    }

    async fn fetch_matching(
        &self,
        collection: &Collection,
        attribute: &str,
        value: &str,
    ) -> Result<Vec<Document>, Report<DocumentStoreError>> {
        let rows: Vec<(JsonValue,)> = sqlx::query_as(
            r#"
            SELECT body
            FROM documents
            WHERE collection = $1 AND body @> $2
            ORDER BY key ASC
            "#,
        )
        .bind(collection.name())
        .bind(containment_filter(attribute, value))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DocumentStoreError::RequestFailed {
            details: e.to_string(),
        })?;

        rows.into_iter()
            .map(|(body,)| into_document(collection, body))
            .collect()
    }
}

/// Builds the `{"attribute": "value"}` object used with `@>`.
fn containment_filter(attribute: &str, value: &str) -> JsonValue {
    let mut filter = Map::new();
    filter.insert(attribute.to_string(), JsonValue::String(value.to_string()));
    JsonValue::Object(filter)
}

fn into_document(
    collection: &Collection,
    body: JsonValue,
) -> Result<Document, Report<DocumentStoreError>> {
    match body {
        JsonValue::Object(document) => Ok(document),
        other => Err(DocumentStoreError::InvalidDocument {
            collection: collection.name().to_string(),
            details: format!("expected a JSON object, found {other}"),
        }
        .into()),
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    #[instrument(skip(self, collection, document), fields(collection = %collection.name()))]
    async fn put(
        &self,
        collection: &Collection,
        document: Document,
    ) -> Result<(), Report<DocumentStoreError>> {
        let key = collection.key_of(&document)?.to_string();

        sqlx::query(
            r#"
            INSERT INTO documents (collection, key, body, updated_at)
            VALUES ($1, $2, $3, now())
            ON CONFLICT (collection, key)
            DO UPDATE SET body = EXCLUDED.body, updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(collection.name())
        .bind(&key)
        .bind(JsonValue::Object(document))
        .execute(&self.pool)
        .await
        .map_err(|e| DocumentStoreError::RequestFailed {
            details: e.to_string(),
        })?;

        debug!(key = %key, "document stored");
        Ok(())
    }

    #[instrument(skip(self, collection), fields(collection = %collection.name()))]
    async fn get(
        &self,
        collection: &Collection,
        key: &str,
    ) -> Result<Option<Document>, Report<DocumentStoreError>> {
        let row: Option<(JsonValue,)> = sqlx::query_as(
            r#"
            SELECT body
            FROM documents
            WHERE collection = $1 AND key = $2
            "#,
        )
        .bind(collection.name())
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DocumentStoreError::RequestFailed {
            details: e.to_string(),
        })?;

        match row {
            Some((body,)) => Ok(Some(into_document(collection, body)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self, collection), fields(collection = %collection.name()))]
    async fn query(
        &self,
        collection: &Collection,
        index: &str,
        value: &str,
    ) -> Result<Vec<Document>, Report<DocumentStoreError>> {
        let attribute = collection.index_attribute(index)?;
        let documents = self.fetch_matching(collection, attribute, value).await?;

        debug!(count = documents.len(), "index query result");
        Ok(documents)
    }

    #[instrument(skip(self, collection), fields(collection = %collection.name()))]
    async fn scan(
        &self,
        collection: &Collection,
        attribute: &str,
        value: &str,
    ) -> Result<Vec<Document>, Report<DocumentStoreError>> {
        let documents = self.fetch_matching(collection, attribute, value).await?;

        debug!(count = documents.len(), "scan result");
        Ok(documents)
    }

    #[instrument(skip(self, collection), fields(collection = %collection.name()))]
    async fn delete(
        &self,
        collection: &Collection,
        key: &str,
    ) -> Result<(), Report<DocumentStoreError>> {
        let result = sqlx::query(
            r#"
            DELETE FROM documents
            WHERE collection = $1 AND key = $2
            "#,
        )
        .bind(collection.name())
        .bind(key)
        .execute(&self.pool)
        .await
        .map_err(|e| DocumentStoreError::RequestFailed {
            details: e.to_string(),
        })?;

        debug!(removed = result.rows_affected(), "document deleted");
        Ok(())
    }
}
