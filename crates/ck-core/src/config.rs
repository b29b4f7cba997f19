//! Migration configuration.
//!
//! The transform takes its configuration as an explicit parameter instead of
//! reading process-wide state, so a batch driver can run migrations for
//! different deployments side by side and tests need no global setup. How the
//! values are loaded (file, env, remote) is the embedding platform's concern.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::attributes::TENANT_FIELD;
use crate::error::ConfigError;

/// Platform default tenant used when no deployment-specific value is set.
pub const DEFAULT_TENANT: &str = "cgrates.org";

/// Legacy field name for the request type, remapped during migration.
pub const LEGACY_REQUEST_TYPE_FIELD: &str = "ReqType";

/// Canonical field name the legacy request-type field maps to.
pub const REQUEST_TYPE_FIELD: &str = "RequestType";

/// Legacy field name reserved for a tenant override inside a profile.
pub const LEGACY_TENANT_FIELD: &str = "Tenant";

/// Configuration consumed by [`migrate`](crate::migrate::migrate).
///
/// Shared-immutable for the duration of a migration batch; the transform
/// only ever borrows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    /// Tenant every migrated record is normalized into.
    pub default_tenant: String,
    /// Field names that become equality filters instead of substitution
    /// attributes. Order is preserved; names must be unique.
    pub filter_fields: Vec<String>,
    /// Legacy field name to canonical field name. Unmapped names pass
    /// through unchanged; map targets must be fixed points so applying the
    /// map twice is a no-op.
    pub field_name_map: BTreeMap<String, String>,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        let mut field_name_map = BTreeMap::new();
        field_name_map.insert(
            LEGACY_REQUEST_TYPE_FIELD.to_string(),
            REQUEST_TYPE_FIELD.to_string(),
        );
        field_name_map.insert(LEGACY_TENANT_FIELD.to_string(), TENANT_FIELD.to_string());
        Self {
            default_tenant: DEFAULT_TENANT.to_string(),
            filter_fields: Vec::new(),
            field_name_map,
        }
    }
}

impl MigrationConfig {
    /// Config for `default_tenant` and `filter_fields`, keeping the
    /// platform's canonical field-name map.
    pub fn new(default_tenant: impl Into<String>, filter_fields: Vec<String>) -> Self {
        Self {
            default_tenant: default_tenant.into(),
            filter_fields,
            ..Self::default()
        }
    }

    /// Check the configuration for values the transform cannot work with.
    ///
    /// Filter field names must be non-empty and unique. Field-name-map
    /// targets must be fixed points of the map, which is what makes
    /// [`canonical_field_name`](Self::canonical_field_name) idempotent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_tenant.trim().is_empty() {
            return Err(ConfigError::EmptyDefaultTenant);
        }

        let mut seen = std::collections::HashSet::new();
        for field in &self.filter_fields {
            if field.trim().is_empty() {
                return Err(ConfigError::EmptyFilterField);
            }
            if !seen.insert(field.as_str()) {
                return Err(ConfigError::DuplicateFilterField(field.clone()));
            }
        }

        for (from, target) in &self.field_name_map {
            if let Some(next) = self.field_name_map.get(target) {
                if next != target {
                    return Err(ConfigError::NonCanonicalMapTarget {
                        from: from.clone(),
                        target: target.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Canonical rendition of a legacy field name: map hit or pass-through.
    #[must_use]
    pub fn canonical_field_name<'a>(&'a self, field: &'a str) -> &'a str {
        self.field_name_map.get(field).map_or(field, String::as_str)
    }

    /// Whether a field becomes an equality filter instead of an attribute.
    #[must_use]
    pub fn is_filter_field(&self, field: &str) -> bool {
        self.filter_fields.iter().any(|name| name == field)
    }
}
