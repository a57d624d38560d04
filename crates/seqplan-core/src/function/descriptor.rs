//! Function descriptors: registry-supplied metadata for callable functions.

use serde::{Deserialize, Serialize};

/// Describes a function a plan step can call.
///
/// Descriptors are owned by a registry and shared with compiled steps as
/// `Arc<FunctionDescriptor>`. The compiler only reads them, most notably the
/// parameter defaults used to seed a step's inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDescriptor {
    /// Plugin the function belongs to. Empty for the global namespace.
    #[serde(default, rename = "plugin")]
    pub plugin_name: String,
    /// Function name, unique within its plugin.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Declared parameters, in declaration order.
    #[serde(default)]
    pub parameters: Vec<ParameterDescriptor>,
}

/// A single declared function parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    /// Parameter name, used as the step input variable name.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Value bound when a step does not set the parameter explicitly.
    #[serde(default, rename = "default")]
    pub default_value: String,
}

impl FunctionDescriptor {
    /// Create a descriptor with no description or parameters.
    pub fn new(plugin_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            plugin_name: plugin_name.into(),
            name: name.into(),
            description: String::new(),
            parameters: Vec::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append a declared parameter.
    pub fn with_parameter(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        default_value: impl Into<String>,
    ) -> Self {
        self.parameters.push(ParameterDescriptor {
            name: name.into(),
            description: description.into(),
            default_value: default_value.into(),
        });
        self
    }

    /// `plugin.name`, or just `name` for global functions.
    pub fn qualified_name(&self) -> String {
        if self.plugin_name.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.plugin_name, self.name)
        }
    }

    /// Return `true` if the function lives in the global namespace.
    pub fn is_global(&self) -> bool {
        self.plugin_name.is_empty()
    }
}
