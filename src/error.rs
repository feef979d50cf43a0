/// Error type returned when building a [`LineFormatter`] from identifiers
/// that cannot produce a valid line prefix.
///
/// [`LineFormatter`]: crate::formatter::LineFormatter
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("a project name must be specified")]
    EmptyProjectName,

    #[error("a component name must be specified")]
    EmptyComponentName,
}
