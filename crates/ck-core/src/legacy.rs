//! Legacy subscriber-profile input model.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One record of the legacy user-profile store, read once and discarded
/// after migration.
///
/// Serde names follow the legacy dump format (`Tenant`, `UserName`,
/// `Masked`, `Profile`, `Weight`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LegacyProfile {
    /// Owning organization in the legacy store.
    pub tenant: String,
    /// Subject identifier (subscriber/user name).
    #[serde(rename = "UserName")]
    pub id: String,
    /// Legacy masking flag. Carried for dump fidelity; the migration has no
    /// observable behavior tied to it.
    #[serde(default)]
    pub masked: bool,
    /// Free-form field name to field value mapping. Unordered, keys unique.
    #[serde(default, rename = "Profile")]
    pub fields: HashMap<String, String>,
    /// Priority used for rule ordering in the downstream policy engine.
    pub weight: f64,
}
