//! Function registry -- an in-memory collection of function descriptors.
//!
//! The registry is the bundled [`FunctionResolver`] implementation. It can
//! be populated programmatically or loaded from a `functions.toml` file:
//!
//! ```toml
//! [[functions]]
//! plugin = "Writer"
//! name = "Tell"
//! description = "Tell a short story"
//!
//! [[functions.parameters]]
//! name = "input"
//! description = "Story seed"
//! default = ""
//! ```
//!
//! Functions declared without a `plugin` form the global namespace.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use super::descriptor::FunctionDescriptor;
use super::resolver::FunctionResolver;

/// Errors that can occur while loading a registry file.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read registry file {path}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("duplicate function: {0:?}")]
    DuplicateFunction(String),

    #[error("function in plugin {plugin:?} has an empty name")]
    EmptyName { plugin: String },
}

/// On-disk shape of a registry file.
#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    functions: Vec<FunctionDescriptor>,
}

/// Lookup key: lowercased `(plugin, name)`.
type FunctionKey = (String, String);

fn function_key(plugin_name: &str, function_name: &str) -> FunctionKey {
    (
        plugin_name.to_ascii_lowercase(),
        function_name.to_ascii_lowercase(),
    )
}

/// A collection of [`FunctionDescriptor`]s keyed case-insensitively by
/// plugin and function name.
///
/// # Example
///
/// ```
/// use seqplan_core::function::{FunctionDescriptor, FunctionRegistry};
///
/// let mut registry = FunctionRegistry::new();
/// registry.register(FunctionDescriptor::new("Writer", "Tell"));
/// assert!(registry.get("writer", "tell").is_some());
/// ```
#[derive(Default, Clone)]
pub struct FunctionRegistry {
    functions: HashMap<FunctionKey, Arc<FunctionDescriptor>>,
}

impl FunctionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function.
    ///
    /// If a function with the same plugin and name (ignoring case) is
    /// already registered, it is replaced and the old one is returned.
    pub fn register(
        &mut self,
        descriptor: impl Into<Arc<FunctionDescriptor>>,
    ) -> Option<Arc<FunctionDescriptor>> {
        let descriptor = descriptor.into();
        let key = function_key(&descriptor.plugin_name, &descriptor.name);
        self.functions.insert(key, descriptor)
    }

    /// Look up a function by plugin and name.
    pub fn get(&self, plugin_name: &str, function_name: &str) -> Option<&Arc<FunctionDescriptor>> {
        self.functions.get(&function_key(plugin_name, function_name))
    }

    /// Look up a function in the global (plugin-less) namespace.
    pub fn get_global(&self, function_name: &str) -> Option<&Arc<FunctionDescriptor>> {
        self.get("", function_name)
    }

    /// All registered functions, sorted by plugin then function name.
    pub fn list(&self) -> Vec<&FunctionDescriptor> {
        let mut keys: Vec<&FunctionKey> = self.functions.keys().collect();
        keys.sort();
        keys.into_iter()
            .map(|key| self.functions[key].as_ref())
            .collect()
    }

    /// Registered functions grouped by plugin name, each group sorted by
    /// function name. Global functions are grouped under `""`.
    pub fn plugins(&self) -> BTreeMap<&str, Vec<&FunctionDescriptor>> {
        let mut plugins: BTreeMap<&str, Vec<&FunctionDescriptor>> = BTreeMap::new();
        for descriptor in self.list() {
            plugins
                .entry(descriptor.plugin_name.as_str())
                .or_default()
                .push(descriptor);
        }
        plugins
    }

    /// Return the number of registered functions.
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Return `true` if no functions are registered.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Parse and validate a registry TOML document.
    ///
    /// Rejects empty function names and duplicate `(plugin, name)` pairs.
    pub fn from_toml_str(content: &str) -> Result<Self, RegistryError> {
        let file: RegistryFile = toml::from_str(content)?;

        let mut seen = HashSet::new();
        let mut registry = Self::new();
        for descriptor in file.functions {
            if descriptor.name.is_empty() {
                return Err(RegistryError::EmptyName {
                    plugin: descriptor.plugin_name,
                });
            }
            if !seen.insert(function_key(&descriptor.plugin_name, &descriptor.name)) {
                return Err(RegistryError::DuplicateFunction(descriptor.qualified_name()));
            }
            registry.register(descriptor);
        }
        Ok(registry)
    }

    /// Read and parse a registry file from disk.
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let content = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

impl FunctionResolver for FunctionRegistry {
    fn resolve(&self, plugin_name: &str, function_name: &str) -> Option<Arc<FunctionDescriptor>> {
        let found = if plugin_name.is_empty() {
            self.get_global(function_name)
        } else {
            self.get(plugin_name, function_name)
        };
        found.cloned()
    }
}

impl std::fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field(
                "functions",
                &self
                    .list()
                    .iter()
                    .map(|d| d.qualified_name())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}
