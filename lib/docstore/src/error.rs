//! Document store error types.

use std::fmt;

/// Errors from document store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentStoreError {
    /// Failed to connect to the backing store.
    ConnectionFailed {
        /// Error details.
        details: String,
    },
    /// A request to the backing store failed.
    RequestFailed {
        /// Error details.
        details: String,
    },
    /// The collection does not declare the requested index.
    UnknownIndex {
        /// The collection that was queried.
        collection: String,
        /// The index that was requested.
        index: String,
    },
    /// A document lacks its primary-key attribute.
    MissingKey {
        /// The collection the document was written to.
        collection: String,
        /// The primary-key attribute.
        attribute: String,
    },
    /// A stored document could not be read back as a JSON object.
    InvalidDocument {
        /// The collection the document belongs to.
        collection: String,
        /// Error details.
        details: String,
    },
}

impl fmt::Display for DocumentStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectionFailed { details } => {
                write!(f, "failed to connect to document store: {details}")
            }
            Self::RequestFailed { details } => {
                write!(f, "document store request failed: {details}")
            }
            Self::UnknownIndex { collection, index } => {
                write!(f, "collection '{collection}' has no index '{index}'")
            }
            Self::MissingKey {
                collection,
                attribute,
            } => {
                write!(
                    f,
                    "document for collection '{collection}' has no string '{attribute}' key"
                )
            }
            Self::InvalidDocument {
                collection,
                details,
            } => {
                write!(f, "invalid document in collection '{collection}': {details}")
            }
        }
    }
}

impl std::error::Error for DocumentStoreError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_index_display() {
        let err = DocumentStoreError::UnknownIndex {
            collection: "IntegrationConfig".to_string(),
            index: "posId-index".to_string(),
        };
        assert!(err.to_string().contains("IntegrationConfig"));
        assert!(err.to_string().contains("posId-index"));
    }

    #[test]
    fn missing_key_display() {
        let err = DocumentStoreError::MissingKey {
            collection: "Integrations".to_string(),
            attribute: "integrationId".to_string(),
        };
        assert!(err.to_string().contains("integrationId"));
    }
}
