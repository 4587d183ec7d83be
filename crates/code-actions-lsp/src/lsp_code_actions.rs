//! Candidate actions → LSP `CodeAction` / `WorkspaceEdit` JSON.

use crate::lsp_diagnostics::diagnostic_to_value;
use crate::lsp_position::{LspPosition, LspRange, lsp_range_for};
use crate::lsp_uri::path_to_file_uri;
use code_actions::{CandidateAction, DocumentSource, Range, TextEdit, WorkspaceEdit};
use serde_json::{Map, Value, json};

fn raw_range(range: Range) -> LspRange {
    LspRange::new(
        LspPosition::new(range.start.line as u32, range.start.column as u32),
        LspPosition::new(range.end.line as u32, range.end.column as u32),
    )
}

fn text_edit_to_value(edit: &TextEdit, range: LspRange) -> Value {
    json!({ "range": range.to_value(), "newText": edit.new_text })
}

/// Serialize a workspace edit as an LSP `WorkspaceEdit` with a `changes` map.
///
/// Positions are converted to UTF-16 against the open document. Edits for a document that is
/// not open keep their char columns.
pub fn workspace_edit_to_value(edit: &WorkspaceEdit, source: &dyn DocumentSource) -> Value {
    let mut changes = Map::new();
    for (path, edits) in edit.iter() {
        let document = source.find_open_document(path);
        let edits = edits
            .iter()
            .map(|edit| {
                let range = match document {
                    Some(document) => lsp_range_for(document, edit.range),
                    None => raw_range(edit.range),
                };
                text_edit_to_value(edit, range)
            })
            .collect();
        changes.insert(path_to_file_uri(path), Value::Array(edits));
    }
    json!({ "changes": changes })
}

/// Serialize a candidate as an LSP `CodeAction`.
///
/// The `edit` member is present once the action is resolved. The diagnostic that gated the
/// rule, if any, is reported under `diagnostics`.
pub fn code_action_to_value(action: &CandidateAction, source: &dyn DocumentSource) -> Value {
    let mut out = Map::new();
    out.insert("title".into(), json!(action.title()));
    out.insert("kind".into(), json!(action.kind()));

    if let Some(found) = &action.context().diagnostic
        && let Some(document) = source.find_open_document(action.document())
    {
        out.insert(
            "diagnostics".into(),
            json!([diagnostic_to_value(&found.diagnostic, document)]),
        );
    }

    if let Some(edit) = action.edit() {
        out.insert("edit".into(), workspace_edit_to_value(edit, source));
    }
    Value::Object(out)
}

/// Serialize a list of candidates as an LSP `(Command | CodeAction)[]` response.
pub fn code_actions_to_value(actions: &[CandidateAction], source: &dyn DocumentSource) -> Value {
    Value::Array(
        actions
            .iter()
            .map(|action| code_action_to_value(action, source))
            .collect(),
    )
}
