//! Path templates: named filesystem patterns with ordered, typed keys.
//!
//! A workfile reference names a template plus positional field values; the
//! template expands those values back into a concrete path. Field coercion
//! is deliberately lenient: a value only has to be structurally convertible
//! to the key's declared type. In particular, integer keys accept values
//! without zero-padding, since references frequently carry bare version
//! numbers; padding is re-applied on expansion.

use crate::error::BackendError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Looks up path templates by name.
pub trait TemplateEngine: Send + Sync {
    fn template(&self, name: &str) -> Option<&PathTemplate>;
}

/// The declared type of a template key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyKind {
    #[default]
    Str,
    Int,
}

/// A coerced field value, as carried by a parsed workfile reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Str(String),
    Int(i64),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{s}"),
            Self::Int(i) => write!(f, "{i}"),
        }
    }
}

/// One ordered key of a path template.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TemplateKey {
    pub name: String,
    #[serde(default)]
    pub kind: KeyKind,
    /// Zero-pad integer values to this width on expansion.
    #[serde(default)]
    pub padding: Option<usize>,
}

impl TemplateKey {
    /// Lenient value coercion. Accepts anything structurally convertible to
    /// the declared type; no format or padding validation.
    #[must_use]
    pub fn coerce(&self, raw: &str) -> Option<FieldValue> {
        if raw.is_empty() {
            return None;
        }
        match self.kind {
            KeyKind::Str => Some(FieldValue::Str(raw.to_string())),
            KeyKind::Int => raw.parse::<i64>().ok().map(FieldValue::Int),
        }
    }

    fn format(&self, value: &FieldValue) -> String {
        match (value, self.padding) {
            (FieldValue::Int(i), Some(width)) => format!("{i:0width$}"),
            _ => value.to_string(),
        }
    }
}

/// A named path template, e.g.
/// `/mnt/proj/sequences/{Sequence}/{Shot}/work/scene.v{version}.ma`.
///
/// Keys are ordered: a workfile reference supplies its field values
/// positionally against this order.
#[derive(Debug, Clone, PartialEq)]
pub struct PathTemplate {
    name: String,
    definition: String,
    keys: Vec<TemplateKey>,
}

impl PathTemplate {
    /// Builds a template, checking that the `{token}`s in the definition and
    /// the declared keys agree exactly.
    pub fn new(
        name: impl Into<String>,
        definition: impl Into<String>,
        keys: Vec<TemplateKey>,
    ) -> Result<Self, BackendError> {
        let name = name.into();
        let definition = definition.into();

        let tokens = definition_tokens(&definition)
            .map_err(|reason| BackendError::InvalidTemplate {
                name: name.clone(),
                reason,
            })?;

        for token in &tokens {
            if !keys.iter().any(|k| &k.name == token) {
                return Err(BackendError::InvalidTemplate {
                    name,
                    reason: format!("definition token '{{{token}}}' has no declared key"),
                });
            }
        }
        for key in &keys {
            if !tokens.contains(&key.name) {
                return Err(BackendError::InvalidTemplate {
                    name,
                    reason: format!("declared key '{}' does not appear in the definition", key.name),
                });
            }
        }

        Ok(Self {
            name,
            definition,
            keys,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The template's keys, in the order reference field values must be
    /// supplied.
    #[must_use]
    pub fn ordered_keys(&self) -> &[TemplateKey] {
        &self.keys
    }

    /// Expands the template against named field values, producing a path.
    pub fn apply_fields(&self, fields: &[(String, FieldValue)]) -> Result<PathBuf, BackendError> {
        let mut out = self.definition.clone();
        for key in &self.keys {
            let value = fields
                .iter()
                .find(|(name, _)| name == &key.name)
                .map(|(_, value)| value)
                .ok_or_else(|| BackendError::MissingTemplateField {
                    template: self.name.clone(),
                    key: key.name.clone(),
                })?;
            out = out.replace(&format!("{{{}}}", key.name), &key.format(value));
        }
        Ok(PathBuf::from(out))
    }
}

/// Collects `{token}` names from a definition, deduplicated.
fn definition_tokens(definition: &str) -> Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut rest = definition;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        let close = after
            .find('}')
            .ok_or_else(|| "unbalanced '{' in definition".to_string())?;
        let token = &after[..close];
        if token.is_empty() {
            return Err("empty '{}' token in definition".to_string());
        }
        if !tokens.iter().any(|t| t == token) {
            tokens.push(token.to_string());
        }
        rest = &after[close + 1..];
    }
    Ok(tokens)
}

/// A set of templates loaded from TOML configuration.
#[derive(Debug, Default)]
pub struct TemplateSet {
    templates: BTreeMap<String, PathTemplate>,
}

/// Raw TOML structure for the templates file.
#[derive(Deserialize)]
struct TemplatesFile {
    #[serde(default)]
    template: Vec<TemplateEntry>,
}

#[derive(Deserialize)]
struct TemplateEntry {
    name: String,
    definition: String,
    #[serde(default)]
    keys: Vec<TemplateKey>,
}

impl TemplateSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, template: PathTemplate) {
        self.templates.insert(template.name().to_string(), template);
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, BackendError> {
        let file: TemplatesFile = toml::from_str(contents).map_err(|e| BackendError::ConfigParse {
            path: "<inline>".to_string(),
            reason: e.to_string(),
        })?;

        let mut set = Self::new();
        for entry in file.template {
            set.insert(PathTemplate::new(entry.name, entry.definition, entry.keys)?);
        }
        debug!(count = set.templates.len(), "loaded path templates");
        Ok(set)
    }

    pub fn load_from(path: &Path) -> Result<Self, BackendError> {
        let contents = std::fs::read_to_string(path).map_err(|source| BackendError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            BackendError::ConfigParse { reason, .. } => BackendError::ConfigParse {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }
}

impl TemplateEngine for TemplateSet {
    fn template(&self, name: &str) -> Option<&PathTemplate> {
        self.templates.get(name)
    }
}
