//! ck-core: Core library for chargekit
//!
//! This crate provides the migration path from a legacy free-form
//! subscriber-profile store into the structured attribute-profile records
//! consumed by the platform's policy engine, plus the splitter that breaks a
//! vendor CDR document into per-record fragments.
//!
//! # Architecture
//!
//! ```text
//! Legacy store → LegacyProfile → classify → AttributeProfileBuilder
//!                                    ↓               ↓
//!                            MigrationConfig   SubstitutionRule
//!                                                    ↓
//!                                            AttributeProfile → policy store
//!
//! CDR document → CdrXmlSplitter → per-record fragments → downstream decoders
//! ```
//!
//! # Modules
//!
//! - `config`: Migration configuration (default tenant, filter fields, name map)
//! - `legacy`: Legacy subscriber-profile input model
//! - `attributes`: Attribute-profile output model and reserved wire tokens
//! - `substitution`: Substitution-rule compiler and evaluator
//! - `migrate`: Field classification and the migration transform
//! - `cdr_xml`: CDR document splitter over a relaxed XML parse
//! - `error`: Subsystem error enums and the crate-level `Error`/`Result`
//! - `logging`: Tracing initialization helper
//!
//! # Safety
//!
//! This crate forbids unsafe code.

#![forbid(unsafe_code)]

pub mod attributes;
pub mod cdr_xml;
pub mod config;
pub mod error;
pub mod legacy;
pub mod logging;
pub mod migrate;
pub mod substitution;

pub use attributes::{ANY, Attribute, AttributeProfile, TENANT_FIELD};
pub use cdr_xml::{CdrRecord, CdrXmlSplitter};
pub use config::MigrationConfig;
pub use error::{Error, Result};
pub use legacy::LegacyProfile;
pub use migrate::{classify, migrate};
pub use substitution::SubstitutionRule;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
