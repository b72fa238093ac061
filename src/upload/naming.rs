//! Naming fields and their sanitized path segments.
//!
//! Every naming field has a `raw` form (trimmed input, or a per-field default
//! when blank) and a `safe` form where each character outside `[A-Za-z0-9_-]`
//! becomes `_`. Safe forms are used as single directory names.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// One level of the destination hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamingLevel {
    /// Multipart field name carrying the value.
    pub field: &'static str,
    /// Raw value used when the field is missing or blank.
    pub default: &'static str,
}

const FOLDER_LEVELS: &[NamingLevel] = &[NamingLevel {
    field: "folderName",
    default: "default",
}];

const HIERARCHICAL_LEVELS: &[NamingLevel] = &[
    NamingLevel {
        field: "companyName",
        default: "company_default",
    },
    NamingLevel {
        field: "projectName",
        default: "project_default",
    },
    NamingLevel {
        field: "titleName",
        default: "title_default",
    },
];

/// Which naming fields build the destination directory. Fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingScheme {
    /// `<root>/<folderName>`
    #[default]
    Folder,
    /// `<root>/<companyName>/<projectName>/<titleName>`
    Hierarchical,
}

impl NamingScheme {
    /// Levels in path order.
    pub fn levels(self) -> &'static [NamingLevel] {
        match self {
            NamingScheme::Folder => FOLDER_LEVELS,
            NamingScheme::Hierarchical => HIERARCHICAL_LEVELS,
        }
    }

    /// Whether `name` is one of this scheme's naming fields.
    pub fn is_naming_field(self, name: &str) -> bool {
        self.levels().iter().any(|level| level.field == name)
    }
}

impl fmt::Display for NamingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamingScheme::Folder => f.write_str("folder"),
            NamingScheme::Hierarchical => f.write_str("hierarchical"),
        }
    }
}

impl FromStr for NamingScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "folder" => Ok(NamingScheme::Folder),
            "hierarchical" => Ok(NamingScheme::Hierarchical),
            other => Err(format!("unknown naming scheme: {other}")),
        }
    }
}

/// Replace every character outside `[A-Za-z0-9_-]` with `_`, one for one.
pub fn sanitize_segment(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// A naming field value in both forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamingValue {
    pub raw: String,
    pub safe: String,
}

impl NamingValue {
    /// Resolve user input against the field default.
    pub fn resolve(input: Option<&str>, default: &str) -> Self {
        let raw = match input.map(str::trim) {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => default.to_string(),
        };
        let safe = sanitize_segment(&raw);
        Self { raw, safe }
    }
}

/// Naming text fields collected from a multipart body.
#[derive(Debug, Default)]
pub struct NamingFields {
    values: HashMap<String, String>,
}

impl NamingFields {
    /// Record a field value. A repeated field keeps its last value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Resolve every level of `scheme`, in path order.
    pub fn resolve(&self, scheme: NamingScheme) -> ResolvedNaming {
        let values = scheme
            .levels()
            .iter()
            .map(|level| {
                let input = self.values.get(level.field).map(String::as_str);
                (level.field, NamingValue::resolve(input, level.default))
            })
            .collect();
        ResolvedNaming { scheme, values }
    }
}

/// Resolved naming fields for one request, in path order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedNaming {
    scheme: NamingScheme,
    values: Vec<(&'static str, NamingValue)>,
}

impl ResolvedNaming {
    pub fn scheme(&self) -> NamingScheme {
        self.scheme
    }

    /// Look up a value by field name.
    pub fn get(&self, field: &str) -> Option<&NamingValue> {
        self.values
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, value)| value)
    }

    /// Safe path segments, root first.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(_, value)| value.safe.as_str())
    }

    /// Raw value of the first level.
    pub fn primary_raw(&self) -> &str {
        self.values
            .first()
            .map(|(_, value)| value.raw.as_str())
            .unwrap_or_default()
    }
}

impl Serialize for ResolvedNaming {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (field, value) in &self.values {
            map.serialize_entry(field, value)?;
        }
        map.end()
    }
}
