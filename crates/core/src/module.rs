//! Module descriptors and the category naming convention.
//!
//! GRASS encodes a module's category in its name prefix (`r.slope` is a
//! raster module, `v.buffer` a vector one); the engine exposes no separate
//! category field. [`CATEGORY_PREFIXES`] is the single source of that
//! convention for both catalog listing and introspection.

use std::fmt;

use serde::Serialize;

/// Recognized category prefixes in the module catalog.
pub const CATEGORY_PREFIXES: &[(&str, ModuleCategory)] = &[
    ("r.", ModuleCategory::Raster),
    ("v.", ModuleCategory::Vector),
];

/// Sentinel parameter type emitted by the engine for parameters that carry
/// no semantic meaning for callers. Excluded from descriptors.
pub const NOOP_PARAMETER_TYPE: &str = "do_nothing";

/// Processing module category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleCategory {
    Raster,
    Vector,
}

impl ModuleCategory {
    /// Wire/string representation (`"raster"` / `"vector"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Raster => "raster",
            Self::Vector => "vector",
        }
    }

    /// Classify a bare module name by its first character.
    ///
    /// Inherited convention: a name starting with `r` is raster, anything
    /// else is vector. Listing and introspection share this rule.
    pub fn from_name(name: &str) -> Self {
        if name.starts_with('r') {
            Self::Raster
        } else {
            Self::Vector
        }
    }
}

impl fmt::Display for ModuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declared module parameter, in engine introspection order.
#[derive(Debug, Clone, Serialize)]
pub struct Parameter {
    pub name: String,
    pub description: String,
    /// Declared type tag from the engine's type system (`raster`, `str`,
    /// `int`, ...). Purely descriptive; the engine remains the sole
    /// authority on parameter validity.
    #[serde(rename = "type")]
    pub param_type: String,
    pub required: bool,
    pub default: Option<String>,
}

/// Introspected schema of one module.
///
/// Rebuilt fresh on every describe call; never cached.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub category: ModuleCategory,
    pub inputs: Vec<Parameter>,
    pub outputs: Vec<Parameter>,
}

/// One entry in the module listing.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub category: ModuleCategory,
}

/// Result of listing the module catalog.
///
/// `count` always equals `modules.len()`. Ordering follows filesystem
/// enumeration and is not stable; callers must not depend on it.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleList {
    pub count: usize,
    pub modules: Vec<ModuleEntry>,
}
