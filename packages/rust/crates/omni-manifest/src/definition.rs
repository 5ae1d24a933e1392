//! Discovered module type.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::category::ModuleCategory;

/// One module discovered in a source file.
///
/// Identity is the (namespace, categories, type name) triple. Two files
/// declaring the same triple produce two definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ModuleDefinition {
    /// Declared namespace (may be backslash-qualified, e.g. `App\Modules`)
    pub namespace_path: String,
    /// Categories from the `@module` marker, in declaration order
    #[serde(default)]
    pub categories: Vec<ModuleCategory>,
    /// Declared class name
    pub type_name: String,
}

impl ModuleDefinition {
    /// Create a module definition.
    #[must_use]
    pub fn new(
        namespace_path: impl Into<String>,
        categories: Vec<ModuleCategory>,
        type_name: impl Into<String>,
    ) -> Self {
        Self {
            namespace_path: namespace_path.into(),
            categories,
            type_name: type_name.into(),
        }
    }

    /// Fully qualified class name (`Namespace\Type`), as a runtime loader
    /// would instantiate it.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        if self.namespace_path.is_empty() {
            return self.type_name.clone();
        }
        format!("{}\\{}", self.namespace_path, self.type_name)
    }

    /// Category with the given name, if declared.
    #[must_use]
    pub fn category(&self, name: &str) -> Option<&ModuleCategory> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// True when the module declares the given category.
    #[must_use]
    pub fn has_category(&self, name: &str) -> bool {
        self.category(name).is_some()
    }
}
