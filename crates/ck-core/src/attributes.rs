//! Attribute-profile output model.
//!
//! An attribute profile is a structured rule set for the downstream policy
//! engine: when its filters match a request, each attribute substitutes a
//! value into the request context. The reserved tokens here are wire-level
//! contracts shared with the filter-evaluation engine and must be reproduced
//! byte for byte.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::substitution::SubstitutionRule;

/// Wildcard token: matches any context and any current field value.
pub const ANY: &str = "*any";

/// Canonical field name of the tenant attribute.
pub const TENANT_FIELD: &str = "*tenant";

/// Filter type prefix for equality-on-literal filters.
pub const STRING_FILTER_PREFIX: &str = "*string";

/// Render the filter identifier for one equality filter,
/// `*string:<Field>:<Value>`.
#[must_use]
pub fn string_filter_id(field: &str, value: &str) -> String {
    format!("{STRING_FILTER_PREFIX}:{field}:{value}")
}

/// One field substitution inside an attribute profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Attribute {
    /// Canonical field name the substitution applies to.
    pub field_name: String,
    /// Current-value guard; [`ANY`] matches regardless of the field's value.
    pub initial: String,
    /// Compiled rule producing the replacement value.
    pub substitute: SubstitutionRule,
    /// Whether the substitution augments existing context data instead of
    /// replacing it.
    pub append: bool,
}

/// Time window during which a profile applies.
///
/// Migrated profiles never carry one; the type exists because this record
/// shape belongs to the downstream attribute-policy store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ActivationInterval {
    pub activation_time: DateTime<Utc>,
    pub expiry_time: DateTime<Utc>,
}

impl ActivationInterval {
    /// Whether `at` falls inside the window (activation inclusive, expiry
    /// exclusive).
    #[must_use]
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        self.activation_time <= at && at < self.expiry_time
    }
}

/// A structured rule set handed to the downstream attribute-policy store.
///
/// `filter_ids` is always a concrete (possibly empty) sequence, never an
/// absent value, so downstream serialization needs no null handling. The
/// order of `filter_ids` and `attributes` is not guaranteed when the record
/// was produced from an unordered source; compare as sets or sort first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttributeProfile {
    /// Owning tenant; migration always sets the configured default.
    pub tenant: String,
    #[serde(rename = "ID")]
    pub id: String,
    /// Request contexts the profile applies in.
    pub contexts: Vec<String>,
    #[serde(rename = "FilterIDs")]
    pub filter_ids: Vec<String>,
    pub activation_interval: Option<ActivationInterval>,
    pub attributes: Vec<Attribute>,
    /// Whether a match stops evaluation of lower-weight profiles.
    pub blocker: bool,
    pub weight: f64,
}

/// Accumulates filters and attributes for one profile under construction.
///
/// Identity and weight are fixed up front; [`build`](Self::build) fills in
/// the migration invariants (wildcard context, no activation window, not a
/// blocker).
#[derive(Debug)]
pub struct AttributeProfileBuilder {
    tenant: String,
    id: String,
    weight: f64,
    filter_ids: Vec<String>,
    attributes: Vec<Attribute>,
}

impl AttributeProfileBuilder {
    /// Start a profile with its identity fields.
    pub fn new(tenant: impl Into<String>, id: impl Into<String>, weight: f64) -> Self {
        Self {
            tenant: tenant.into(),
            id: id.into(),
            weight,
            filter_ids: Vec::new(),
            attributes: Vec::new(),
        }
    }

    /// Append an equality filter on `field` having exactly `value`.
    pub fn push_string_filter(&mut self, field: &str, value: &str) {
        self.filter_ids.push(string_filter_id(field, value));
    }

    /// Append an attribute that substitutes `substitute` for `field_name`
    /// whatever the field's current value.
    pub fn push_attribute(&mut self, field_name: impl Into<String>, substitute: SubstitutionRule) {
        self.attributes.push(Attribute {
            field_name: field_name.into(),
            initial: ANY.to_string(),
            substitute,
            append: true,
        });
    }

    /// Finalize the profile.
    #[must_use]
    pub fn build(self) -> AttributeProfile {
        AttributeProfile {
            tenant: self.tenant,
            id: self.id,
            contexts: vec![ANY.to_string()],
            filter_ids: self.filter_ids,
            activation_interval: None,
            attributes: self.attributes,
            blocker: false,
            weight: self.weight,
        }
    }
}
