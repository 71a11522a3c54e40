//! Collection descriptors.
//!
//! A [`Collection`] tells a backend which attribute is the primary key and
//! which attributes are reachable through named secondary indexes. Backends
//! stay schema-agnostic beyond that.

use crate::error::DocumentStoreError;
use serde_json::{Map, Value as JsonValue};

/// A stored document: a JSON object keyed by wire attribute names.
pub type Document = Map<String, JsonValue>;

/// A named secondary index over one attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Index {
    name: String,
    attribute: String,
}

/// Describes a logical collection of documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    name: String,
    key_attribute: String,
    indexes: Vec<Index>,
}

impl Collection {
    /// Creates a collection keyed by `key_attribute`.
    #[must_use]
    pub fn new(name: impl Into<String>, key_attribute: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key_attribute: key_attribute.into(),
            indexes: Vec::new(),
        }
    }

    /// Declares a secondary index over `attribute`.
    #[must_use]
    pub fn with_index(mut self, name: impl Into<String>, attribute: impl Into<String>) -> Self {
        self.indexes.push(Index {
            name: name.into(),
            attribute: attribute.into(),
        });
        self
    }

    /// Returns the collection name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the primary-key attribute.
    #[must_use]
    pub fn key_attribute(&self) -> &str {
        &self.key_attribute
    }

    /// Returns true if the collection declares the named index.
    #[must_use]
    pub fn has_index(&self, index: &str) -> bool {
        self.indexes.iter().any(|i| i.name == index)
    }

    /// Resolves an index name to the attribute it covers.
    ///
    /// # Errors
    ///
    /// Returns `UnknownIndex` if the collection does not declare the index.
    pub fn index_attribute(&self, index: &str) -> Result<&str, DocumentStoreError> {
        self.indexes
            .iter()
            .find(|i| i.name == index)
            .map(|i| i.attribute.as_str())
            .ok_or_else(|| DocumentStoreError::UnknownIndex {
                collection: self.name.clone(),
                index: index.to_string(),
            })
    }

    /// Extracts the primary key of a document.
    ///
    /// # Errors
    ///
    /// Returns `MissingKey` unless the key attribute is a non-empty string.
    pub fn key_of<'a>(&self, document: &'a Document) -> Result<&'a str, DocumentStoreError> {
        match document.get(&self.key_attribute) {
            Some(JsonValue::String(key)) if !key.is_empty() => Ok(key.as_str()),
            _ => Err(DocumentStoreError::MissingKey {
                collection: self.name.clone(),
                attribute: self.key_attribute.clone(),
            }),
        }
    }
}

/// Returns true if the document's attribute is the string `value`.
pub(crate) fn attribute_matches(document: &Document, attribute: &str, value: &str) -> bool {
    matches!(document.get(attribute), Some(JsonValue::String(v)) if v == value)
}
