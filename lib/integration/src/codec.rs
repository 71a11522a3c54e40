//! Conversion between records and stored documents.

use crate::error::{CodecError, Entity};
use crate::model::fields;
use posbridge_docstore::Document;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

/// Serializes a record into a document.
///
/// Integration documents never carry the transient `configs` key. Config
/// payloads are opaque and kept whole.
pub(crate) fn encode<T: Serialize>(entity: Entity, record: &T) -> Result<Document, CodecError> {
    let value = serde_json::to_value(record).map_err(|e| CodecError {
        entity,
        details: e.to_string(),
    })?;

    match value {
        JsonValue::Object(mut document) => {
            if entity == Entity::Integration {
                document.remove(fields::CONFIGS);
            }
            Ok(document)
        }
        other => Err(CodecError {
            entity,
            details: format!("expected an object, found {other}"),
        }),
    }
}

/// Deserializes a stored document into a record.
pub(crate) fn decode<T: DeserializeOwned>(
    entity: Entity,
    document: Document,
) -> Result<T, CodecError> {
    serde_json::from_value(JsonValue::Object(document)).map_err(|e| CodecError {
        entity,
        details: e.to_string(),
    })
}
