//! Static node description
//!
//! Everything a host needs to list the node and render its form: key,
//! labels, credential requirement, resources and operations, parameter
//! descriptors and hints. Hosts serialize it as JSON.

use serde::Serialize;
use serde_json::Value;

/// Static metadata describing a node type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionMetadata {
    /// Unique node key (e.g. `"rye"`).
    pub key: String,
    /// Human-readable name.
    pub name: String,
    /// Short description.
    pub description: String,
    /// UI group (e.g. `"transform"`).
    pub group: String,
    /// Node version.
    pub version: u32,
    /// Credential types the node needs, by key.
    pub required_credentials: Vec<String>,
    /// Form parameters.
    pub parameters: Vec<ParameterDescriptor>,
    /// Hints shown around execution.
    pub hints: Vec<NodeHint>,
}

impl ActionMetadata {
    /// Metadata with the minimum required fields.
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            description: description.into(),
            group: String::new(),
            version: 1,
            required_credentials: Vec::new(),
            parameters: Vec::new(),
            hints: Vec::new(),
        }
    }

    /// Set the UI group.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    /// Set the node version.
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Add a required credential type.
    pub fn with_required_credential(mut self, credential_key: impl Into<String>) -> Self {
        self.required_credentials.push(credential_key.into());
        self
    }

    /// Append a parameter.
    pub fn with_parameter(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Append a hint.
    pub fn with_hint(mut self, hint: NodeHint) -> Self {
        self.hints.push(hint);
        self
    }

    /// First parameter named `name` that applies to `resource` / `operation`.
    pub fn parameter_for(
        &self,
        name: &str,
        resource: &str,
        operation: &str,
    ) -> Option<&ParameterDescriptor> {
        self.parameters
            .iter()
            .find(|p| p.name == name && p.applies_to(resource, operation))
    }
}

/// Parameter value type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ParameterKind {
    /// Free text.
    String {
        /// Mask the value in the UI.
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        password: bool,
    },
    /// Number.
    Number,
    /// Toggle.
    Boolean,
    /// One of a fixed set of values.
    Options {
        /// Choices.
        options: Vec<ParameterOption>,
    },
    /// Group of nested fields.
    Collection {
        /// Nested fields.
        fields: Vec<ParameterDescriptor>,
    },
    /// List of strings.
    StringList,
}

/// One choice of an options parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterOption {
    /// Label.
    pub name: String,
    /// Stored value.
    pub value: String,
    /// Help text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ParameterOption {
    /// Option with a label and value.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            description: None,
        }
    }

    /// Add help text.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// When a parameter is shown. Empty lists match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayCondition {
    /// Resources the parameter belongs to.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub resource: Vec<String>,
    /// Operations the parameter belongs to.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub operation: Vec<String>,
    /// Only shown when polling is on (or off).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_polling: Option<bool>,
}

impl DisplayCondition {
    fn matches(&self, resource: &str, operation: &str) -> bool {
        (self.resource.is_empty() || self.resource.iter().any(|r| r == resource))
            && (self.operation.is_empty() || self.operation.iter().any(|o| o == operation))
    }
}

/// Describes one form parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDescriptor {
    /// Key in the parameter object.
    pub name: String,
    /// Label.
    pub display_name: String,
    /// Value type.
    #[serde(flatten)]
    pub kind: ParameterKind,
    /// Default value.
    pub default: Value,
    /// Whether an empty value is rejected.
    pub required: bool,
    /// Help text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Example value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Visibility rule.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show: Option<DisplayCondition>,
}

impl ParameterDescriptor {
    /// Parameter of `kind`, optional, with a `null` default.
    pub fn new(name: impl Into<String>, display_name: impl Into<String>, kind: ParameterKind) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            kind,
            default: Value::Null,
            required: false,
            description: None,
            placeholder: None,
            show: None,
        }
    }

    /// Text parameter.
    pub fn string(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self::new(name, display_name, ParameterKind::String { password: false })
            .with_default("")
    }

    /// Masked text parameter.
    pub fn password(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self::new(name, display_name, ParameterKind::String { password: true })
            .with_default("")
    }

    /// Mark as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the default value.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = default.into();
        self
    }

    /// Set help text.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set an example value.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Restrict visibility.
    pub fn shown_when(mut self, condition: DisplayCondition) -> Self {
        self.show = Some(condition);
        self
    }

    /// Whether the parameter is shown for `resource` / `operation`.
    pub fn applies_to(&self, resource: &str, operation: &str) -> bool {
        self.show
            .as_ref()
            .is_none_or(|condition| condition.matches(resource, operation))
    }
}

/// Where a hint appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HintLocation {
    /// Next to the output data.
    OutputPane,
    /// In the parameter form.
    Ndv,
}

/// Message shown to workflow authors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeHint {
    /// Hint text.
    pub message: String,
    /// Placement.
    pub location: HintLocation,
    /// Only show after the node has run.
    pub after_execution: bool,
    /// Parameters that must match for the hint to show.
    pub display_condition: DisplayCondition,
}
