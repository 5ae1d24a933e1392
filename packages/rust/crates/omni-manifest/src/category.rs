//! Category annotation parsing.
//!
//! The category string is the remainder of an `@module` marker line:
//!
//! ```text
//! @module cli http(method=GET,path=/users) admin(2)
//! ```
//!
//! Entries are separated by single spaces. An entry shaped like
//! `name(args)` carries attributes; anything else is a bare category.
//! The grammar never rejects input.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[allow(clippy::expect_used)]
static PARAMETERIZED_ENTRY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\w+)\((.*)\)").expect("Failed to compile category entry pattern"));

/// One attribute of a parameterized category.
///
/// Positional attributes have no key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CategoryAttribute {
    /// Attribute key (`None` for positional attributes)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Attribute value, whitespace-trimmed
    pub value: String,
}

impl CategoryAttribute {
    /// Create a positional attribute.
    #[must_use]
    pub fn positional(value: impl Into<String>) -> Self {
        Self {
            key: None,
            value: value.into(),
        }
    }

    /// Create a keyed attribute.
    #[must_use]
    pub fn keyed(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            value: value.into(),
        }
    }
}

/// A category tag attached to a module, optionally parameterized.
///
/// Attribute order is declaration order. Duplicate keys are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ModuleCategory {
    /// Category name (bucket key in the manifest)
    pub name: String,
    /// Positional and keyed attributes in declaration order
    #[serde(default)]
    pub attributes: Vec<CategoryAttribute>,
}

impl ModuleCategory {
    /// Create a category without attributes.
    #[must_use]
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    /// Create a category with the given attributes.
    #[must_use]
    pub fn with_attributes(name: impl Into<String>, attributes: Vec<CategoryAttribute>) -> Self {
        Self {
            name: name.into(),
            attributes,
        }
    }

    /// True when the category carries no attributes.
    #[must_use]
    pub fn is_bare(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Value of the first attribute with the given key.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.key.as_deref() == Some(key))
            .map(|attr| attr.value.as_str())
    }

    /// Values of positional attributes, in order.
    pub fn positional(&self) -> impl Iterator<Item = &str> {
        self.attributes
            .iter()
            .filter(|attr| attr.key.is_none())
            .map(|attr| attr.value.as_str())
    }
}

impl fmt::Display for ModuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_bare() {
            return write!(f, "{}", self.name);
        }
        write!(f, "{}(", self.name)?;
        for (i, attr) in self.attributes.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            match &attr.key {
                Some(key) => write!(f, "{key}={}", attr.value)?,
                None => write!(f, "{}", attr.value)?,
            }
        }
        write!(f, ")")
    }
}

/// Parse a category annotation string into categories.
///
/// The input is trimmed and split on single spaces, so `""` yields one
/// bare category with an empty name and doubled spaces yield empty-named
/// entries. Values cannot contain `(`, `)`, `,` or `=`; there is no escaping.
#[must_use]
pub fn parse_categories(input: &str) -> Vec<ModuleCategory> {
    input.trim().split(' ').map(parse_entry).collect()
}

fn parse_entry(entry: &str) -> ModuleCategory {
    let Some(caps) = PARAMETERIZED_ENTRY.captures(entry) else {
        return ModuleCategory::bare(entry.trim());
    };

    let name = caps.get(1).map_or("", |m| m.as_str());
    let args = caps.get(2).map_or("", |m| m.as_str());

    let attributes = args
        .split(',')
        .map(|component| match component.split_once('=') {
            Some((key, value)) => CategoryAttribute::keyed(key.trim(), value.trim()),
            None => CategoryAttribute::positional(component.trim()),
        })
        .collect();

    ModuleCategory::with_attributes(name, attributes)
}
