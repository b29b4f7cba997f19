//! Migration of legacy subscriber profiles into attribute profiles.
//!
//! The transform is a pure function over one [`LegacyProfile`] and a borrowed
//! [`MigrationConfig`]: no I/O, no shared state, safe to run concurrently
//! over disjoint inputs. Content is deterministic; the order of the output's
//! `filter_ids` and `attributes` is not, because the legacy field mapping is
//! unordered.

use std::collections::HashMap;

use crate::attributes::{AttributeProfile, AttributeProfileBuilder, TENANT_FIELD};
use crate::config::MigrationConfig;
use crate::error::Result;
use crate::legacy::LegacyProfile;
use crate::substitution::SubstitutionRule;

/// Field pairs of one legacy profile, split by filter eligibility.
///
/// Pairs borrow from the source map; both sequences follow its iteration
/// order, which is unordered.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Classified<'a> {
    /// Pairs that become `*string` equality filters.
    pub filters: Vec<(&'a str, &'a str)>,
    /// Pairs that become substitution attributes.
    pub attributes: Vec<(&'a str, &'a str)>,
}

/// Partition a profile's fields into filter pairs and attribute pairs.
///
/// Pure and infallible; a profile with no filter-eligible fields simply
/// yields an empty `filters`.
#[must_use]
pub fn classify<'a>(fields: &'a HashMap<String, String>, cfg: &MigrationConfig) -> Classified<'a> {
    let mut out = Classified::default();
    for (name, value) in fields {
        if cfg.is_filter_field(name) {
            out.filters.push((name, value));
        } else {
            out.attributes.push((name, value));
        }
    }
    out
}

/// Migrate one legacy profile into an attribute profile.
///
/// Filter-eligible fields become `*string:<Field>:<Value>` filter
/// identifiers; every other field becomes a wildcard-matched, appending
/// attribute under its canonical name, substituting the literal field value.
/// A source tenant differing from `cfg.default_tenant` is preserved through
/// an extra [`TENANT_FIELD`] attribute, since the output record's own tenant
/// is always normalized to the default.
///
/// The only error path is a substitution literal that fails to compile; in
/// that case no partial profile is returned.
pub fn migrate(profile: &LegacyProfile, cfg: &MigrationConfig) -> Result<AttributeProfile> {
    let classified = classify(&profile.fields, cfg);

    let mut builder = AttributeProfileBuilder::new(&cfg.default_tenant, &profile.id, profile.weight);
    for (field, value) in classified.filters {
        builder.push_string_filter(field, value);
    }
    for (field, value) in classified.attributes {
        let substitute = match SubstitutionRule::compile(value) {
            Ok(rule) => rule,
            Err(err) => {
                tracing::warn!(
                    id = %profile.id,
                    field,
                    error = %err,
                    "substitution literal failed to compile"
                );
                return Err(err.into());
            }
        };
        builder.push_attribute(cfg.canonical_field_name(field), substitute);
    }
    if profile.tenant != cfg.default_tenant {
        builder.push_attribute(TENANT_FIELD, SubstitutionRule::compile(&profile.tenant)?);
    }

    let attr = builder.build();
    tracing::debug!(
        id = %attr.id,
        filters = attr.filter_ids.len(),
        attributes = attr.attributes.len(),
        "migrated legacy profile"
    );
    Ok(attr)
}
