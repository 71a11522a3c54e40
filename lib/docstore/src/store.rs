//! The document store trait.

use crate::collection::{Collection, Document};
use crate::error::DocumentStoreError;
use async_trait::async_trait;
use rootcause::prelude::Report;
use std::sync::Arc;

/// Trait for keyed document storage.
///
/// Implementations must serialize single-key operations; no multi-key
/// atomicity is expected. Handles are shared across concurrent callers.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Upserts a document by the collection's primary key.
    ///
    /// # Errors
    ///
    /// Returns an error if the document has no key or the write fails.
    async fn put(
        &self,
        collection: &Collection,
        document: Document,
    ) -> Result<(), Report<DocumentStoreError>>;

    /// Fetches a document by primary key. Absent keys yield `Ok(None)`.
    async fn get(
        &self,
        collection: &Collection,
        key: &str,
    ) -> Result<Option<Document>, Report<DocumentStoreError>>;

    /// Fetches every document whose indexed attribute equals `value`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownIndex` if the collection does not declare `index`.
    async fn query(
        &self,
        collection: &Collection,
        index: &str,
        value: &str,
    ) -> Result<Vec<Document>, Report<DocumentStoreError>>;

    /// Scans the whole collection for documents whose `attribute` equals `value`.
    async fn scan(
        &self,
        collection: &Collection,
        attribute: &str,
        value: &str,
    ) -> Result<Vec<Document>, Report<DocumentStoreError>>;

    /// Deletes a document by primary key. Deleting an absent key succeeds.
    async fn delete(&self, collection: &Collection, key: &str)
    -> Result<(), Report<DocumentStoreError>>;
}

#[async_trait]
impl<T: DocumentStore + ?Sized> DocumentStore for Arc<T> {
    async fn put(
        &self,
        collection: &Collection,
        document: Document,
    ) -> Result<(), Report<DocumentStoreError>> {
        (**self).put(collection, document).await
    }

    async fn get(
        &self,
        collection: &Collection,
        key: &str,
    ) -> Result<Option<Document>, Report<DocumentStoreError>> {
        (**self).get(collection, key).await
    }

    async fn query(
        &self,
        collection: &Collection,
        index: &str,
        value: &str,
    ) -> Result<Vec<Document>, Report<DocumentStoreError>> {
        (**self).query(collection, index, value).await
    }

    async fn scan(
        &self,
        collection: &Collection,
        attribute: &str,
        value: &str,
    ) -> Result<Vec<Document>, Report<DocumentStoreError>> {
        (**self).scan(collection, attribute, value).await
    }

    async fn delete(
        &self,
        collection: &Collection,
        key: &str,
    ) -> Result<(), Report<DocumentStoreError>> {
        (**self).delete(collection, key).await
    }
}
