//! Error types for the integration store.
//!
//! Every store operation returns `Report<IntegrationStoreError>`:
//! - `Validation`: a required field was empty, or an attribute shadows a
//!   typed field; the caller's fault
//! - `NotFound`: a referenced integration does not exist
//! - `Persistence`: the document store or record (de)serialization failed;
//!   the root cause is the report's child (`DocumentStoreError` or `CodecError`)
//!
//! When one operation fails inside another, the nested report is wrapped with
//! the outer operation's context and keeps its kind.

use rootcause::prelude::Report;
use std::fmt;

/// Coarse classification of store failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing required field or reserved attribute. Never retried.
    Validation,
    /// Referenced entity absent. Never retried automatically.
    NotFound,
    /// Store communication or (de)serialization failure. Caller may retry.
    Persistence,
}

/// The kind of record an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    /// An integration record.
    Integration,
    /// An integration config record.
    IntegrationConfig,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integration => write!(f, "integration"),
            Self::IntegrationConfig => write!(f, "integration config"),
        }
    }
}

/// Integration store errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrationStoreError {
    /// A required field was empty.
    Validation {
        /// The operation that rejected the input.
        operation: &'static str,
        /// Wire name of the offending field.
        field: &'static str,
    },
    /// An attribute map used the wire name of a typed field.
    ReservedAttribute {
        /// The operation that rejected the input.
        operation: &'static str,
        /// The shadowed wire name.
        field: &'static str,
    },
    /// A referenced record does not exist.
    NotFound {
        /// The operation that looked the record up.
        operation: &'static str,
        /// What was looked up.
        entity: Entity,
        /// The missing ID.
        id: String,
    },
    /// The backing store or record codec failed.
    Persistence {
        /// The operation that failed.
        operation: &'static str,
        /// The ID the operation was acting on.
        id: String,
    },
}

impl IntegrationStoreError {
    /// Returns the error classification.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } | Self::ReservedAttribute { .. } => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Persistence { .. } => ErrorKind::Persistence,
        }
    }

    /// Returns the operation this error was raised in.
    #[must_use]
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Validation { operation, .. }
            | Self::ReservedAttribute { operation, .. }
            | Self::NotFound { operation, .. }
            | Self::Persistence { operation, .. } => *operation,
        }
    }

    /// Wraps a report from a nested operation with `operation`'s context.
    ///
    /// The wrapper keeps the nested error's kind. Persistence wrappers carry
    /// `id`; not-found wrappers keep the missing ID.
    #[must_use]
    pub fn within(report: Report<Self>, operation: &'static str, id: &str) -> Report<Self> {
        let outer = match report.current_context() {
            Self::Validation { field, .. } => Self::Validation {
                operation,
                field: *field,
            },
            Self::ReservedAttribute { field, .. } => Self::ReservedAttribute {
                operation,
                field: *field,
            },
            Self::NotFound { entity, id, .. } => Self::NotFound {
                operation,
                entity: *entity,
                id: id.clone(),
            },
            Self::Persistence { .. } => Self::Persistence {
                operation,
                id: id.to_string(),
            },
        };
        report.context(outer)
    }
}

impl fmt::Display for IntegrationStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation { operation, field } => {
                write!(f, "{operation}: '{field}' must not be empty")
            }
            Self::ReservedAttribute { operation, field } => {
                write!(f, "{operation}: attribute '{field}' is reserved")
            }
            Self::NotFound {
                operation,
                entity,
                id,
            } => {
                write!(f, "{operation}: {entity} '{id}' not found")
            }
            Self::Persistence { operation, id } if id.is_empty() => {
                write!(f, "{operation}: persistence failure")
            }
            Self::Persistence { operation, id } => {
                write!(f, "{operation}: persistence failure for '{id}'")
            }
        }
    }
}

impl std::error::Error for IntegrationStoreError {}

/// A record could not be converted to or from its stored document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecError {
    /// The record type being converted.
    pub entity: Entity,
    /// Error details.
    pub details: String,
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} document codec failed: {}", self.entity, self.details)
    }
}

impl std::error::Error for CodecError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_display_names_field_and_operation() {
        let err = IntegrationStoreError::Validation {
            operation: "save_integration",
            field: "integrationId",
        };
        assert!(err.to_string().contains("save_integration"));
        assert!(err.to_string().contains("integrationId"));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn reserved_attribute_is_validation() {
        let inner: Report<IntegrationStoreError> = IntegrationStoreError::ReservedAttribute {
            operation: "save_integration",
            field: "createdAt",
        }
        .into();
        assert_eq!(
            inner.current_context().to_string(),
            "save_integration: attribute 'createdAt' is reserved"
        );

        let outer = IntegrationStoreError::within(inner, "update_integration", "int-1");
        assert_eq!(
            outer.current_context(),
            &IntegrationStoreError::ReservedAttribute {
                operation: "update_integration",
                field: "createdAt",
            }
        );
        assert_eq!(outer.current_context().kind(), ErrorKind::Validation);
    }

    #[test]
    fn not_found_display() {
        let err = IntegrationStoreError::NotFound {
            operation: "get_integration_by_id",
            entity: Entity::Integration,
            id: "int-404".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "get_integration_by_id: integration 'int-404' not found"
        );
    }

    #[test]
    fn persistence_display_without_id() {
        let err = IntegrationStoreError::Persistence {
            operation: "connect",
            id: String::new(),
        };
        assert_eq!(err.to_string(), "connect: persistence failure");
    }

    #[test]
    fn within_preserves_not_found() {
        let inner: Report<IntegrationStoreError> = IntegrationStoreError::NotFound {
            operation: "get_integration_by_id",
            entity: Entity::Integration,
            id: "int-404".to_string(),
        }
        .into();

        let outer = IntegrationStoreError::within(inner, "update_integration", "int-404");
        let context = outer.current_context();
        assert_eq!(context.kind(), ErrorKind::NotFound);
        assert_eq!(context.operation(), "update_integration");
    }

    #[test]
    fn within_preserves_persistence_and_rebinds_id() {
        let inner: Report<IntegrationStoreError> = IntegrationStoreError::Persistence {
            operation: "get_integration_configs",
            id: "int-1".to_string(),
        }
        .into();

        let outer = IntegrationStoreError::within(inner, "delete_integration", "int-1");
        assert_eq!(
            outer.current_context(),
            &IntegrationStoreError::Persistence {
                operation: "delete_integration",
                id: "int-1".to_string(),
            }
        );
    }

    #[test]
    fn codec_error_display() {
        let err = CodecError {
            entity: Entity::IntegrationConfig,
            details: "missing field".to_string(),
        };
        assert!(err.to_string().contains("integration config"));
        assert!(err.to_string().contains("missing field"));
    }
}
