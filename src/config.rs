use serde::{Deserialize, Serialize};

/// Identifiers a [`LineFormatter`] is built from.
///
/// Meant to be embedded in the host application's own configuration; this
/// crate never loads it from disk or the environment itself.
///
/// [`LineFormatter`]: crate::formatter::LineFormatter
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatterConfig {
    /// Owning project or organization, e.g. `"AS"`.
    pub project_name: String,
    /// Emitting service or module, e.g. `"worker"`.
    pub component_name: String,
}

impl FormatterConfig {
    pub fn new(project_name: impl Into<String>, component_name: impl Into<String>) -> Self {
        FormatterConfig {
            project_name: project_name.into(),
            component_name: component_name.into(),
        }
    }
}
