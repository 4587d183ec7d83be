use code_actions::{
    ActionSet, CONTINUE_MESSAGE, CandidateAction, Configuration, Continuation, DocumentSource,
    EditStep, Engine, InsertAnchor, LanguageActionSet, MemoryWorkspace, MessageKind, Position,
    Range, Resolution, RuleSpec,
};
use pretty_assertions::assert_eq;
use std::path::Path;

const MAIN: &str = "/w/main.rs";

fn setup(text: &str, steps: Vec<EditStep>) -> (Engine, MemoryWorkspace) {
    let rule = RuleSpec::with_steps("Steps", steps).unwrap();
    let engine = Engine::with_configuration(Configuration {
        action_sets: vec![LanguageActionSet::new(["rust"], ActionSet::new(vec![rule]))],
        ..Default::default()
    });
    let mut ws = MemoryWorkspace::new();
    ws.open_document_with_text(MAIN, "rust", text).unwrap();
    (engine, ws)
}

fn candidate(engine: &Engine, ws: &MemoryWorkspace) -> CandidateAction {
    let doc = ws.active_document().unwrap();
    let mut actions = engine.query_actions(doc, Range::caret(Position::new(0, 0)), &[]);
    assert_eq!(actions.len(), 1);
    actions.remove(0)
}

fn text(ws: &MemoryWorkspace) -> String {
    ws.document_text(Path::new(MAIN)).unwrap()
}

#[test]
fn test_two_step_sequence_needs_two_invocations() {
    let (engine, mut ws) = setup(
        "fn main() {}\n",
        vec![
            EditStep::insert("use std::io;\n")
                .unless_found(vec!["^use std::io;".into()], None)
                .with_continuation(Continuation::Always),
            EditStep::insert("// io ready\n").anchored(InsertAnchor::AfterLastMatch, "^use "),
        ],
    );

    let mut first = candidate(&engine, &ws);
    let resolution = engine.invoke(&mut first, &mut ws).unwrap();
    assert_eq!(resolution, Resolution::Resolved { needs_reapply: true });
    assert_eq!(first.edit().unwrap().edit_count(), 1);
    assert_eq!(text(&ws), "use std::io;\nfn main() {}\n");
    assert_eq!(ws.messages().len(), 1);
    assert_eq!(ws.messages()[0].kind, MessageKind::Information);
    assert_eq!(ws.messages()[0].text, CONTINUE_MESSAGE);

    let mut second = candidate(&engine, &ws);
    let resolution = engine.invoke(&mut second, &mut ws).unwrap();
    assert_eq!(resolution, Resolution::Resolved { needs_reapply: false });
    assert_eq!(text(&ws), "use std::io;\n// io ready\nfn main() {}\n");
    assert_eq!(ws.messages().len(), 1);

    // Fully applied: every step is skipped.
    let mut third = candidate(&engine, &ws);
    engine.invoke(&mut third, &mut ws).unwrap();
    assert!(third.edit().unwrap().is_empty());
    assert_eq!(text(&ws), "use std::io;\n// io ready\nfn main() {}\n");
}

#[test]
fn test_guarded_step_prompts_by_default() {
    let (engine, ws) = setup(
        "x\n",
        vec![
            EditStep::insert("a\n").unless_found(vec!["^a$".into()], None),
            EditStep::insert("b\n"),
        ],
    );

    let mut action = candidate(&engine, &ws);
    assert_eq!(
        engine.resolve_action(&mut action, &ws),
        Resolution::Resolved { needs_reapply: true }
    );
    assert_eq!(action.edit().unwrap().edit_count(), 1);
}

#[test]
fn test_satisfied_condition_skips_without_halting() {
    let (engine, ws) = setup(
        "a\n",
        vec![
            EditStep::insert("a\n").unless_found(vec!["^a$".into()], None),
            EditStep::insert("b\n"),
        ],
    );

    let mut action = candidate(&engine, &ws);
    assert_eq!(
        engine.resolve_action(&mut action, &ws),
        Resolution::Resolved { needs_reapply: false }
    );
    assert_eq!(
        action.edit().unwrap().edits_for(Path::new(MAIN))[0].new_text,
        "b\n"
    );
}

#[test]
fn test_never_halts_silently() {
    let (engine, mut ws) = setup(
        "x\n",
        vec![
            EditStep::insert("a\n").with_continuation(Continuation::Never),
            EditStep::insert("b\n"),
        ],
    );

    let mut action = candidate(&engine, &ws);
    let resolution = engine.invoke(&mut action, &mut ws).unwrap();
    assert_eq!(resolution, Resolution::Resolved { needs_reapply: false });
    assert!(resolution.messages().is_empty());
    assert!(ws.messages().is_empty());
    assert_eq!(text(&ws), "a\nx\n");
}

#[test]
fn test_no_continuation_runs_all_steps() {
    let (engine, mut ws) = setup(
        "x\n",
        vec![
            EditStep::insert("a\n"),
            EditStep::insert("b\n").anchored(InsertAnchor::AfterLastMatch, "^x$"),
        ],
    );

    let mut action = candidate(&engine, &ws);
    engine.invoke(&mut action, &mut ws).unwrap();
    assert_eq!(text(&ws), "a\nx\nb\n");
}

#[test]
fn test_next_condition_failure_halts() {
    let steps = vec![
        EditStep::insert("import a\n").with_continuation(Continuation::OnNextConditionFailure),
        EditStep::insert("import b\n")
            .unless_found(vec!["^import b".into()], None)
            .with_continuation(Continuation::Never),
    ];
    let (engine, mut ws) = setup("x\n", steps);

    let mut first = candidate(&engine, &ws);
    let resolution = engine.invoke(&mut first, &mut ws).unwrap();
    assert_eq!(resolution, Resolution::Resolved { needs_reapply: true });
    assert_eq!(text(&ws), "import a\nx\n");

    let mut second = candidate(&engine, &ws);
    let resolution = engine.invoke(&mut second, &mut ws).unwrap();
    assert_eq!(resolution, Resolution::Resolved { needs_reapply: false });
    assert_eq!(text(&ws), "import b\nimport a\nx\n");
}

#[test]
fn test_next_condition_already_satisfied_continues() {
    let steps = vec![
        EditStep::insert("import a\n").with_continuation(Continuation::OnNextConditionFailure),
        EditStep::insert("import b\n").unless_found(vec!["^import b".into()], None),
    ];
    let (engine, ws) = setup("import b\nx\n", steps);

    let mut action = candidate(&engine, &ws);
    assert_eq!(
        engine.resolve_action(&mut action, &ws),
        Resolution::Resolved { needs_reapply: false }
    );
    assert_eq!(action.edit().unwrap().edit_count(), 1);
}

#[test]
fn test_next_condition_failure_on_unguarded_next_step() {
    let steps = vec![
        EditStep::insert("import a\n").with_continuation(Continuation::OnNextConditionFailure),
        EditStep::insert("import b\n"),
    ];
    let (engine, ws) = setup("x\n", steps);

    let mut action = candidate(&engine, &ws);
    assert_eq!(
        engine.resolve_action(&mut action, &ws),
        Resolution::Resolved { needs_reapply: true }
    );
    assert_eq!(action.edit().unwrap().edit_count(), 1);
}

#[test]
fn test_condition_stop_pattern() {
    // The guard looks for an import inside `mod a`; the one in `mod b` must not count.
    let guarded = |text: &str| {
        setup(
            text,
            vec![
                EditStep::insert("    use super::*;\n")
                    .anchored(InsertAnchor::AfterLastMatch, r"^mod a \{")
                    .unless_found(
                        vec![r"^mod a \{".into(), r"^\s+use super::\*;".into()],
                        Some(r"^mod ".into()),
                    )
                    .with_continuation(Continuation::Never),
            ],
        )
    };

    let (engine, ws) = guarded("mod a {\n    use super::*;\n}\n");
    let mut action = candidate(&engine, &ws);
    engine.resolve_action(&mut action, &ws);
    assert!(action.edit().unwrap().is_empty());

    let (engine, ws) = guarded("mod a {\n}\nmod b {\n    use super::*;\n}\n");
    let mut action = candidate(&engine, &ws);
    engine.resolve_action(&mut action, &ws);
    // Present in the file already, so resolve-time de-duplication still skips it.
    assert!(action.edit().unwrap().is_empty());

    let (engine, ws) = guarded("mod a {\n}\nmod b {\n    use std::fmt;\n}\n");
    let mut action = candidate(&engine, &ws);
    engine.resolve_action(&mut action, &ws);
    assert_eq!(
        action.edit().unwrap().edits_for(Path::new(MAIN))[0].range.start,
        Position::new(1, 0)
    );
}
