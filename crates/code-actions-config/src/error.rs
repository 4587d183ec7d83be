use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors that prevent a settings document from loading at all.
///
/// A malformed individual rule is not an error here: it is dropped with a warning and its
/// siblings still load.
pub enum ConfigError {
    #[error("JSON parse error: {0}")]
    /// JSON parsing failed.
    Json(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    /// YAML parsing failed.
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    /// Filesystem I/O failed.
    Io(#[from] std::io::Error),

    #[error("cannot infer settings format from '{}'", .0.display())]
    /// A settings path has no `.json`, `.yaml` or `.yml` extension.
    UnknownFormat(PathBuf),

    #[error("'{section}' must be a mapping")]
    /// A top-level section was present but not a mapping.
    NotAMapping {
        /// Section name.
        section: &'static str,
    },
}
