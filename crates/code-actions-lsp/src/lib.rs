#![warn(missing_docs)]
//! `code-actions-lsp` - LSP integration for `code-actions`.
//!
//! Language servers speak UTF-16 positions and `file://` URIs; the engine works in char
//! columns and paths. This crate converts between the two without pulling in `lsp-types`:
//! diagnostics come in as `serde_json::Value`, candidate actions go out as `CodeAction` JSON.

pub mod lsp_code_actions;
pub mod lsp_diagnostics;
pub mod lsp_position;
pub mod lsp_uri;

pub use lsp_code_actions::{code_action_to_value, code_actions_to_value, workspace_edit_to_value};
pub use lsp_diagnostics::{
    diagnostic_from_value, diagnostic_to_value, diagnostics_from_value, severity_from_lsp,
    severity_to_lsp,
};
pub use lsp_position::{
    LspPosition, LspRange, char_offset_to_utf16, lsp_position_for, lsp_range_for,
    position_from_lsp, range_from_lsp, utf16_to_char_offset,
};
pub use lsp_uri::{
    document_for_uri, file_uri_to_path, path_to_file_uri, percent_decode_path, percent_encode_path,
};
