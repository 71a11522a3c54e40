//! Integration and integration config records.
//!
//! Both records serialize to camelCase documents. Any attributes beyond the
//! known fields are kept in `attributes` so records written by other
//! producers survive a read-modify-write.

use chrono::{DateTime, Utc};
use posbridge_core::{IntegrationConfigId, IntegrationId, PosId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Wire attribute names.
pub mod fields {
    /// Primary key of an integration; foreign key on configs.
    pub const INTEGRATION_ID: &str = "integrationId";
    /// Point-of-sale tenant of an integration.
    pub const POS_ID: &str = "posId";
    /// Creation timestamp of an integration.
    pub const CREATED_AT: &str = "createdAt";
    /// Last sync timestamp of an integration.
    pub const LAST_SYNC: &str = "lastSync";
    /// Primary key of a config.
    pub const INTEGRATION_CONFIG_ID: &str = "integrationConfigId";
    /// Read-side join of configs onto an integration. Never persisted.
    pub const CONFIGS: &str = "configs";

    /// Names an integration's `attributes` may not use.
    pub const INTEGRATION_RESERVED: &[&str] = &[INTEGRATION_ID, POS_ID, CREATED_AT, LAST_SYNC];
    /// Names a config's payload may not use.
    pub const CONFIG_RESERVED: &[&str] = &[INTEGRATION_CONFIG_ID, INTEGRATION_ID];
}

/// Unix seconds of `0001-01-01T00:00:00Z`, the zero time other producers
/// write for an unset timestamp.
const ZERO_TIME_SECS: i64 = -62_135_596_800;

/// Returns true if a timestamp is absent or the year-one zero time.
pub(crate) fn is_unset(timestamp: Option<DateTime<Utc>>) -> bool {
    timestamp.is_none_or(|t| t.timestamp() == ZERO_TIME_SECS && t.timestamp_subsec_nanos() == 0)
}

fn first_reserved(
    attributes: &Map<String, JsonValue>,
    reserved: &[&'static str],
) -> Option<&'static str> {
    reserved
        .iter()
        .copied()
        .find(|name| attributes.contains_key(*name))
}

/// A configured connection between a point-of-sale tenant and the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Integration {
    /// Unique, immutable ID.
    pub integration_id: IntegrationId,
    /// The point-of-sale tenant. Not unique.
    #[serde(default)]
    pub pos_id: PosId,
    /// Set by the store on first save when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Set by the store on save when unset, and on every update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<DateTime<Utc>>,
    /// Additional attributes, stored as-is.
    #[serde(flatten)]
    pub attributes: Map<String, JsonValue>,
    #[serde(skip)]
    configs: Vec<IntegrationConfig>,
}

impl Integration {
    /// Creates an integration with unset timestamps.
    #[must_use]
    pub fn new(integration_id: impl Into<IntegrationId>, pos_id: impl Into<PosId>) -> Self {
        Self {
            integration_id: integration_id.into(),
            pos_id: pos_id.into(),
            created_at: None,
            last_sync: None,
            attributes: Map::new(),
            configs: Vec::new(),
        }
    }

    /// Pre-seeds the creation time, e.g. to preserve it across an upsert.
    #[must_use]
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Pre-seeds the last sync time.
    #[must_use]
    pub fn with_last_sync(mut self, last_sync: DateTime<Utc>) -> Self {
        self.last_sync = Some(last_sync);
        self
    }

    /// Adds an attribute.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: JsonValue) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Configs attached by the read that produced this record.
    ///
    /// Empty on records that did not come from a read.
    #[must_use]
    pub fn configs(&self) -> &[IntegrationConfig] {
        &self.configs
    }

    /// Returns the first attribute that shadows a typed field.
    #[must_use]
    pub fn reserved_attribute(&self) -> Option<&'static str> {
        first_reserved(&self.attributes, fields::INTEGRATION_RESERVED)
    }

    pub(crate) fn with_configs(mut self, configs: Vec<IntegrationConfig>) -> Self {
        self.configs = configs;
        self
    }

    pub(crate) fn clear_configs(&mut self) {
        self.configs.clear();
    }
}

/// A configuration entry scoped to one integration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationConfig {
    /// Unique ID.
    pub integration_config_id: IntegrationConfigId,
    /// The owning integration. Must exist when the config is saved.
    pub integration_id: IntegrationId,
    /// The configuration payload, opaque to the store.
    #[serde(flatten)]
    pub attributes: Map<String, JsonValue>,
}

impl IntegrationConfig {
    /// Creates a config with a generated ID.
    #[must_use]
    pub fn new(integration_id: impl Into<IntegrationId>) -> Self {
        Self::with_id(IntegrationConfigId::generate(), integration_id)
    }

    /// Creates a config with an explicit ID.
    #[must_use]
    pub fn with_id(
        integration_config_id: impl Into<IntegrationConfigId>,
        integration_id: impl Into<IntegrationId>,
    ) -> Self {
        Self {
            integration_config_id: integration_config_id.into(),
            integration_id: integration_id.into(),
            attributes: Map::new(),
        }
    }

    /// Adds a payload attribute.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: JsonValue) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Returns a payload attribute.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&JsonValue> {
        self.attributes.get(key)
    }

    /// Returns the first payload attribute that shadows a typed field.
    #[must_use]
    pub fn reserved_attribute(&self) -> Option<&'static str> {
        first_reserved(&self.attributes, fields::CONFIG_RESERVED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integration_serializes_wire_names() {
        let created = "2024-05-01T12:00:00Z".parse::<DateTime<Utc>>().expect("time");
        let integration = Integration::new("int-1", "pos-9")
            .with_created_at(created)
            .with_last_sync(created)
            .with_attribute("provider", json!("square"));

        let value = serde_json::to_value(&integration).expect("serialize");
        assert_eq!(
            value,
            json!({
                "integrationId": "int-1",
                "posId": "pos-9",
                "createdAt": "2024-05-01T12:00:00Z",
                "lastSync": "2024-05-01T12:00:00Z",
                "provider": "square",
            })
        );
    }

    #[test]
    fn unset_timestamps_are_omitted() {
        let value = serde_json::to_value(Integration::new("int-1", "pos-9")).expect("serialize");
        assert!(value.get(fields::CREATED_AT).is_none());
        assert!(value.get(fields::LAST_SYNC).is_none());
    }

    #[test]
    fn configs_are_never_serialized() {
        let integration = Integration::new("int-1", "pos-9")
            .with_configs(vec![IntegrationConfig::with_id("cfg-1", "int-1")]);
        assert_eq!(integration.configs().len(), 1);

        let value = serde_json::to_value(&integration).expect("serialize");
        assert!(value.get(fields::CONFIGS).is_none());
    }

    #[test]
    fn unknown_attributes_roundtrip() {
        let parsed: Integration = serde_json::from_value(json!({
            "integrationId": "int-1",
            "posId": "pos-9",
            "status": "active",
        }))
        .expect("deserialize");

        assert_eq!(parsed.attributes.get("status"), Some(&json!("active")));
        assert!(parsed.created_at.is_none());
        assert!(parsed.configs().is_empty());
    }

    #[test]
    fn config_payload_is_flattened() {
        let config = IntegrationConfig::with_id("cfg-1", "int-1")
            .with_attribute("name", json!("menu_sync"))
            .with_attribute("value", json!({"interval": 15}));

        let value = serde_json::to_value(&config).expect("serialize");
        assert_eq!(
            value,
            json!({
                "integrationConfigId": "cfg-1",
                "integrationId": "int-1",
                "name": "menu_sync",
                "value": {"interval": 15},
            })
        );
        assert_eq!(config.attribute("name"), Some(&json!("menu_sync")));
    }

    #[test]
    fn reserved_attributes_are_detected() {
        let integration = Integration::new("int-1", "pos-9").with_attribute("provider", json!("x"));
        assert_eq!(integration.reserved_attribute(), None);
        assert_eq!(
            integration
                .with_attribute("createdAt", json!("yesterday"))
                .reserved_attribute(),
            Some(fields::CREATED_AT)
        );

        let config = IntegrationConfig::with_id("cfg-1", "int-1")
            .with_attribute("configs", json!(["a"]))
            .with_attribute("posId", json!("pos-9"));
        assert_eq!(config.reserved_attribute(), None);
        assert_eq!(
            config
                .with_attribute("integrationId", json!("int-404"))
                .reserved_attribute(),
            Some(fields::INTEGRATION_ID)
        );
    }

    #[test]
    fn zero_time_counts_as_unset() {
        let zero: DateTime<Utc> = "0001-01-01T00:00:00Z".parse().expect("time");
        let later: DateTime<Utc> = "0001-01-01T00:00:01Z".parse().expect("time");
        assert!(is_unset(None));
        assert!(is_unset(Some(zero)));
        assert!(!is_unset(Some(later)));
        assert!(!is_unset(Some(Utc::now())));
    }

    #[test]
    fn new_config_generates_id() {
        let config = IntegrationConfig::new("int-1");
        assert!(config.integration_config_id.as_str().starts_with("cfg_"));
        assert_eq!(config.integration_id.as_str(), "int-1");
    }
}
