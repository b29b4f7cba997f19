//! Substitution-rule compiler and evaluator.
//!
//! A substitution rule is the value-producing side of an attribute: compiled
//! once from a rules string, then evaluated against a request context to
//! yield the replacement value. The migration path only ever compiles
//! literal values, but the dialect is shared with the rest of the platform,
//! so dynamic field references stay supported:
//!
//! - `;` separates atoms; evaluation concatenates their outputs.
//! - An atom starting with `~` is a dynamic field reference: `~<path>`
//!   followed by zero or more `:s/<pattern>/<replacement>/` suffixes applied
//!   in order with `replace_all`. `<replacement>` may use capture groups
//!   (`$1`, `${name}`). A `/` inside a section is written `\/`.
//! - Any other atom is a literal producing itself.
//!
//! Rules compare equal on their source string, and serialize as it.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use regex::Regex;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{CompileError, EvalError};

/// Separator between atoms of a rules string.
pub const RULES_SEPARATOR: char = ';';

/// Marker introducing a dynamic field reference.
pub const FIELD_MARKER: char = '~';

/// Source of field values for dynamic references.
///
/// The transform itself never evaluates dynamic rules; this seam exists for
/// the platform components that do.
pub trait FieldSource {
    /// Value for a dynamic field path, if the context carries it.
    fn field_value(&self, path: &str) -> Option<&str>;
}

impl FieldSource for HashMap<String, String> {
    fn field_value(&self, path: &str) -> Option<&str> {
        self.get(path).map(String::as_str)
    }
}

impl FieldSource for BTreeMap<String, String> {
    fn field_value(&self, path: &str) -> Option<&str> {
        self.get(path).map(String::as_str)
    }
}

/// One compiled `s/<pattern>/<replacement>/` suffix.
#[derive(Debug, Clone)]
struct RegexSubstitution {
    pattern: Regex,
    replacement: String,
}

/// One compiled atom of a rules string.
#[derive(Debug, Clone)]
enum Atom {
    Literal(String),
    Field {
        path: String,
        substitutions: Vec<RegexSubstitution>,
    },
}

/// A compiled substitution rule: an ordered chain of atoms.
#[derive(Debug, Clone)]
pub struct SubstitutionRule {
    source: String,
    atoms: Vec<Atom>,
}

impl SubstitutionRule {
    /// Compile a rules string.
    ///
    /// Any well-formed literal input compiles and later evaluates to itself
    /// unchanged; malformed template syntax fails here, never at evaluation.
    pub fn compile(raw: &str) -> Result<Self, CompileError> {
        let mut atoms = Vec::new();
        for piece in raw.split(RULES_SEPARATOR) {
            if let Some(body) = piece.strip_prefix(FIELD_MARKER) {
                atoms.push(compile_field(raw, body)?);
            } else {
                atoms.push(Atom::Literal(piece.to_string()));
            }
        }
        Ok(Self {
            source: raw.to_string(),
            atoms,
        })
    }

    /// Evaluate against a runtime context, concatenating atom outputs.
    ///
    /// Fails only when a dynamic atom references a field the context does
    /// not provide; literal-only rules cannot fail.
    pub fn evaluate<S: FieldSource>(&self, ctx: &S) -> Result<String, EvalError> {
        let mut out = String::new();
        for atom in &self.atoms {
            match atom {
                Atom::Literal(text) => out.push_str(text),
                Atom::Field {
                    path,
                    substitutions,
                } => {
                    let value = ctx
                        .field_value(path)
                        .ok_or_else(|| EvalError::FieldNotFound(path.clone()))?;
                    let mut value = value.to_string();
                    for sub in substitutions {
                        value = sub
                            .pattern
                            .replace_all(&value, sub.replacement.as_str())
                            .into_owned();
                    }
                    out.push_str(&value);
                }
            }
        }
        Ok(out)
    }

    /// The rules string this rule was compiled from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether every atom is a literal (evaluation can never fail).
    #[must_use]
    pub fn is_literal(&self) -> bool {
        self.atoms
            .iter()
            .all(|atom| matches!(atom, Atom::Literal(_)))
    }

    /// The literal text when the rule is a single literal atom.
    #[must_use]
    pub fn as_literal(&self) -> Option<&str> {
        match self.atoms.as_slice() {
            [Atom::Literal(text)] => Some(text),
            _ => None,
        }
    }
}

fn compile_field(rule: &str, body: &str) -> Result<Atom, CompileError> {
    let (path, mut rest) = match body.find(':') {
        Some(idx) => (&body[..idx], &body[idx..]),
        None => (body, ""),
    };
    if path.is_empty() {
        return Err(CompileError::EmptyFieldPath { rule: rule.to_string() });
    }

    let mut substitutions = Vec::new();
    while !rest.is_empty() {
        let suffix = &rest[1..]; // rest always begins with ':'
        let Some(directive_body) = suffix.strip_prefix("s/") else {
            let directive = suffix.split(':').next().unwrap_or_default().to_string();
            return Err(CompileError::UnknownDirective {
                rule: rule.to_string(),
                directive,
            });
        };
        let Some((pattern_text, after_pattern)) = scan_section(directive_body) else {
            return Err(CompileError::UnterminatedSubstitution { rule: rule.to_string() });
        };
        let Some((replacement, after_replacement)) = scan_section(after_pattern) else {
            return Err(CompileError::UnterminatedSubstitution { rule: rule.to_string() });
        };
        if !after_replacement.is_empty() && !after_replacement.starts_with(':') {
            return Err(CompileError::UnknownDirective {
                rule: rule.to_string(),
                directive: after_replacement.to_string(),
            });
        }
        let pattern = Regex::new(&pattern_text).map_err(|source| CompileError::InvalidRegex {
            rule: rule.to_string(),
            source,
        })?;
        substitutions.push(RegexSubstitution {
            pattern,
            replacement,
        });
        rest = after_replacement;
    }

    Ok(Atom::Field {
        path: path.to_string(),
        substitutions,
    })
}

/// Consume one `/`-terminated section, honoring `\/` escapes. Other escape
/// sequences pass through untouched so regex escapes keep working.
fn scan_section(input: &str) -> Option<(String, &str)> {
    let mut out = String::new();
    let mut chars = input.char_indices();
    while let Some((idx, ch)) = chars.next() {
        match ch {
            '/' => return Some((out, &input[idx + 1..])),
            '\\' => match chars.next() {
                Some((_, '/')) => out.push('/'),
                Some((_, other)) => {
                    out.push('\\');
                    out.push(other);
                }
                None => return None,
            },
            _ => out.push(ch),
        }
    }
    None
}

impl PartialEq for SubstitutionRule {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for SubstitutionRule {}

impl fmt::Display for SubstitutionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl Serialize for SubstitutionRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

impl<'de> Deserialize<'de> for SubstitutionRule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::compile(&raw).map_err(D::Error::custom)
    }
}
