#![warn(missing_docs)]
//! Settings loader for `code-actions`.
//!
//! Reads the `actions`, `lookup` and `diagLookup` sections of a settings document (JSON,
//! YAML or an already-parsed [`serde_json::Value`]) into a [`code_actions::Configuration`]
//! ready for [`code_actions::Engine::reload`].
//!
//! Each rule is converted on its own: a rule that is missing a required field, names an
//! unknown `action`/`where`/`needsContinue` value or carries an invalid pattern is dropped with
//! a `tracing` warning, and the rest of the document still loads.
//!
//! # Example
//!
//! ```rust
//! use code_actions_config::{SettingsFormat, load_str};
//!
//! let config = load_str(
//!     r##"
//! actions:
//!   "[python, go]":
//!     Add header:
//!       text: "# generated\n"
//!     Broken:
//!       where: start
//! lookup:
//!   author: ada
//! "##,
//!     SettingsFormat::Yaml,
//! )?;
//!
//! assert_eq!(config.action_sets.len(), 1);
//! assert_eq!(config.action_sets[0].languages, ["python", "go"]);
//! assert_eq!(config.action_sets[0].set.len(), 1);
//! assert_eq!(config.tables.lookup("author"), Some("ada"));
//! # Ok::<(), code_actions_config::ConfigError>(())
//! ```

mod error;
pub mod loader;
pub mod schema;
pub mod selector;

pub use error::ConfigError;
pub use loader::{SettingsFormat, load_path, load_str, load_value};
pub use schema::{NeedsContinue, OneOrMany, RuleConfig, StepConfig};
pub use selector::parse_language_selector;
