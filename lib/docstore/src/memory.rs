//! In-process document store.
//!
//! Keeps each collection in an ordered map so results come back sorted by
//! primary key, matching the PostgreSQL backend.

use crate::collection::{Collection, Document, attribute_matches};
use crate::error::DocumentStoreError;
use crate::store::DocumentStore;
use async_trait::async_trait;
use rootcause::prelude::Report;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

type CollectionData = BTreeMap<String, Document>;

/// Document store backed by process memory.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, CollectionData>>,
}

impl MemoryDocumentStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of documents held in a collection.
    pub async fn len(&self, collection: &Collection) -> usize {
        self.collections
            .read()
            .await
            .get(collection.name())
            .map_or(0, BTreeMap::len)
    }

    /// Returns true if the collection holds no documents.
    pub async fn is_empty(&self, collection: &Collection) -> bool {
        self.len(collection).await == 0
    }

    async fn filter(&self, collection: &Collection, attribute: &str, value: &str) -> Vec<Document> {
        self.collections
            .read()
            .await
            .get(collection.name())
            .map(|data| {
                data.values()
                    .filter(|document| attribute_matches(document, attribute, value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    #[instrument(skip(self, collection, document), fields(collection = %collection.name()))]
    async fn put(
        &self,
        collection: &Collection,
        document: Document,
    ) -> Result<(), Report<DocumentStoreError>> {
        let key = collection.key_of(&document)?.to_string();
        self.collections
            .write()
            .await
            .entry(collection.name().to_string())
            .or_default()
            .insert(key, document);

        debug!("document stored");
        Ok(())
    }

    #[instrument(skip(self, collection), fields(collection = %collection.name()))]
    async fn get(
        &self,
        collection: &Collection,
        key: &str,
    ) -> Result<Option<Document>, Report<DocumentStoreError>> {
        Ok(self
            .collections
            .read()
            .await
            .get(collection.name())
            .and_then(|data| data.get(key))
            .cloned())
    }

    #[instrument(skip(self, collection), fields(collection = %collection.name()))]
    async fn query(
        &self,
        collection: &Collection,
        index: &str,
        value: &str,
    ) -> Result<Vec<Document>, Report<DocumentStoreError>> {
        let attribute = collection.index_attribute(index)?;
        let documents = self.filter(collection, attribute, value).await;

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
        let documents = self.filter(collection, attribute, value).await;

        debug!(count = documents.len(), "scan result");
        Ok(documents)
    }

    #[instrument(skip(self, collection), fields(collection = %collection.name()))]
    async fn delete(
        &self,
        collection: &Collection,
        key: &str,
    ) -> Result<(), Report<DocumentStoreError>> {
        let removed = self
            .collections
            .write()
            .await
            .get_mut(collection.name())
            .and_then(|data| data.remove(key))
            .is_some();

        debug!(removed, "document deleted");
        Ok(())
    }
}
