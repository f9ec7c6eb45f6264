use std::path::PathBuf;
use std::sync::Arc;

use graft_apply::{
    ActiveDocument, ApplyAction, ApplyConfig, ApplyContext, ApplyEngine, ApplyPayload,
    CreateLocation, Intent, NoticeSeverity, PreviewMode,
};
use graft_core::{Position, Range};
use graft_host::{DocumentId, SymbolNode};
use graft_testing::{
    MemoryDocuments, MemoryFs, RecordingPresenter, RecordingTerminal, ScriptedPicker,
    StaticSymbols,
};

const MAIN_DOC: &str = "file:///ws/src/main.ts";

struct Harness {
    engine: ApplyEngine,
    documents: Arc<MemoryDocuments>,
    fs: Arc<MemoryFs>,
    terminal: Arc<RecordingTerminal>,
    picker: Arc<ScriptedPicker>,
    presenter: Arc<RecordingPresenter>,
}

impl Harness {
    fn new(config: ApplyConfig) -> Self {
        Self::build(
            config,
            MemoryDocuments::new(),
            StaticSymbols::new(),
            ScriptedPicker::new(),
            MemoryFs::new(),
        )
    }

    fn build(
        config: ApplyConfig,
        documents: MemoryDocuments,
        symbols: StaticSymbols,
        picker: ScriptedPicker,
        fs: MemoryFs,
    ) -> Self {
        let documents = Arc::new(documents);
        let fs = Arc::new(fs);
        let terminal = Arc::new(RecordingTerminal::new());
        let picker = Arc::new(picker);
        let presenter = Arc::new(RecordingPresenter::new());
        let engine = ApplyEngine::new(
            documents.clone(),
            Arc::new(symbols),
            terminal.clone(),
            picker.clone(),
            fs.clone(),
            presenter.clone(),
            config,
        );
        Self {
            engine,
            documents,
            fs,
            terminal,
            picker,
            presenter,
        }
    }
}

fn ws_context() -> ApplyContext {
    ApplyContext::new().with_workspace_root("/ws")
}

fn active_main(cursor: Position) -> ActiveDocument {
    ActiveDocument::new(MAIN_DOC, Some(PathBuf::from("/ws/src/main.ts")), cursor)
}

fn no_preview() -> ApplyConfig {
    ApplyConfig {
        preview: PreviewMode::Never,
        ..ApplyConfig::default()
    }
}

#[tokio::test]
async fn path_comment_block_becomes_a_workspace_file() {
    let harness = Harness::new(ApplyConfig::default());
    let payload = ApplyPayload::new(
        "// src/util/date.ts\nexport function formatDate(d) {\n  return d.toISOString();\n}\n",
        "typescript",
    );

    let result = harness.engine.apply(&payload, &ws_context()).await;

    assert!(result.success);
    assert_eq!(result.action, ApplyAction::Created);
    assert_eq!(result.message.as_deref(), Some("Created src/util/date.ts"));
    // The header line names the file; it does not end up inside it.
    assert_eq!(
        harness.fs.file("/ws/src/util/date.ts").as_deref(),
        Some("export function formatDate(d) {\n  return d.toISOString();\n}\n")
    );
    assert!(harness.fs.dirs().contains(&PathBuf::from("/ws/src/util")));
    assert_eq!(
        harness.documents.opened_paths(),
        vec![PathBuf::from("/ws/src/util/date.ts")]
    );
}

#[tokio::test]
async fn command_blocks_stage_without_executing() {
    let harness = Harness::new(ApplyConfig::default());
    let payload = ApplyPayload::new("$ npm install left-pad", "bash");

    let result = harness.engine.apply(&payload, &ws_context()).await;

    assert!(result.success);
    assert_eq!(result.action, ApplyAction::SentToTerminal);
    assert_eq!(
        result.message.as_deref(),
        Some("Command staged in the terminal (not executed)")
    );
    assert_eq!(harness.terminal.staged(), vec!["npm install left-pad"]);
}

#[tokio::test]
async fn explicit_intent_overrides_detection() {
    let documents = MemoryDocuments::new().with_document(MAIN_DOC, "alpha\nomega\n");
    let harness = Harness::build(
        no_preview(),
        documents,
        StaticSymbols::new(),
        ScriptedPicker::new(),
        MemoryFs::new(),
    );
    let context = ws_context().with_active(active_main(Position::new(1, 0)));
    // Looks exactly like a command, but the caller said "edit".
    let payload = ApplyPayload::new("$ npm install left-pad\n", "bash").with_intent(Intent::Edit);

    let result = harness.engine.apply(&payload, &context).await;

    assert!(result.success);
    assert_eq!(result.action, ApplyAction::Edited);
    assert!(harness.terminal.staged().is_empty());
    assert_eq!(
        harness
            .documents
            .text_of(&DocumentId::new(MAIN_DOC))
            .as_deref(),
        Some("alpha\n$ npm install left-pad\nomega\n")
    );
}

#[tokio::test]
async fn detection_fills_a_missing_target() {
    let harness = Harness::new(ApplyConfig::default());
    // Create intent supplied, target left for the classifier to find.
    let payload =
        ApplyPayload::new("// src/app.ts\nexport const x = 1;\n", "ts").with_intent(Intent::Create);

    let result = harness.engine.apply(&payload, &ws_context()).await;

    assert!(result.success);
    assert_eq!(result.message.as_deref(), Some("Created src/app.ts"));
    assert_eq!(
        harness.fs.file("/ws/src/app.ts").as_deref(),
        Some("export const x = 1;\n")
    );
}

#[tokio::test]
async fn create_without_target_opens_an_untitled_buffer() {
    let harness = Harness::new(ApplyConfig::default());
    let payload = ApplyPayload::new("print('hi')\n", "py").with_intent(Intent::Create);

    // No workspace root either; the file flow is unavailable.
    let result = harness.engine.apply(&payload, &ApplyContext::new()).await;

    assert!(result.success);
    assert_eq!(result.action, ApplyAction::Created);
    assert_eq!(result.message.as_deref(), Some("Opened new python buffer"));
    assert_eq!(
        harness.documents.opened_untitled(),
        vec![("print('hi')\n".to_string(), "python".to_string())]
    );
}

#[tokio::test]
async fn edit_without_an_active_document_becomes_a_create() {
    let harness = Harness::new(ApplyConfig::default());
    let payload = ApplyPayload::new("- [ ] write docs\n", "md")
        .with_intent(Intent::Edit)
        .with_target("notes/todo.md");

    let result = harness.engine.apply(&payload, &ws_context()).await;

    assert!(result.success);
    assert_eq!(result.action, ApplyAction::Created);
    assert_eq!(
        harness.fs.file("/ws/notes/todo.md").as_deref(),
        Some("- [ ] write docs\n")
    );
}

#[tokio::test]
async fn fuzzy_symbol_match_replaces_the_symbol_and_says_so() {
    let text = "function formatDateTime(d) {\n  return d.toISOString();\n}\n";
    let documents = MemoryDocuments::new().with_document(MAIN_DOC, text);
    let symbols = StaticSymbols::new().with_symbols(
        MAIN_DOC,
        vec![SymbolNode::new(
            "formatDateTime",
            Range::new(Position::new(0, 0), Position::new(2, 1)),
        )],
    );
    let harness = Harness::build(
        no_preview(),
        documents,
        symbols,
        ScriptedPicker::new(),
        MemoryFs::new(),
    );
    let context = ws_context().with_active(active_main(Position::new(0, 0)));
    let replacement = "function formatDate(d) {\n  return d.toLocaleDateString();\n}";
    let payload = ApplyPayload::new(replacement, "ts")
        .with_intent(Intent::Edit)
        .with_anchor("formatDate");

    let result = harness.engine.apply(&payload, &context).await;

    assert!(result.success);
    assert_eq!(result.action, ApplyAction::Edited);
    assert_eq!(result.notices.len(), 1);
    assert_eq!(result.notices[0].severity, NoticeSeverity::Info);
    assert!(result.notices[0].message.contains("formatDateTime"));
    assert_eq!(
        harness
            .documents
            .text_of(&DocumentId::new(MAIN_DOC))
            .as_deref(),
        Some("function formatDate(d) {\n  return d.toLocaleDateString();\n}\n")
    );
}

#[tokio::test]
async fn missing_anchor_degrades_to_cursor_with_a_warning() {
    let documents = MemoryDocuments::new().with_document(MAIN_DOC, "alpha\nomega\n");
    let harness = Harness::build(
        no_preview(),
        documents,
        StaticSymbols::new(),
        ScriptedPicker::new(),
        MemoryFs::new(),
    );
    let context = ws_context().with_active(active_main(Position::new(1, 0)));
    let payload = ApplyPayload::new("beta\n", "ts")
        .with_intent(Intent::Edit)
        .with_anchor("missingAnchor");

    let result = harness.engine.apply(&payload, &context).await;

    assert!(result.success, "a degraded location still applies");
    assert_eq!(result.action, ApplyAction::Edited);
    assert_eq!(result.notices.len(), 1);
    assert_eq!(result.notices[0].severity, NoticeSeverity::Warning);
    assert!(result.notices[0].message.contains("missingAnchor"));
    assert_eq!(
        harness
            .documents
            .text_of(&DocumentId::new(MAIN_DOC))
            .as_deref(),
        Some("alpha\nbeta\nomega\n")
    );
}

#[tokio::test]
async fn edits_preview_by_default_and_accept_applies() {
    let documents = MemoryDocuments::new().with_document(MAIN_DOC, "alpha\nomega\n");
    let harness = Harness::build(
        ApplyConfig::default(),
        documents,
        StaticSymbols::new(),
        ScriptedPicker::new(),
        MemoryFs::new(),
    );
    let context = ws_context().with_active(active_main(Position::new(1, 0)));
    let payload = ApplyPayload::new("beta\n", "ts").with_intent(Intent::Edit);

    let result = harness.engine.apply(&payload, &context).await;

    assert!(result.success);
    assert_eq!(result.action, ApplyAction::PreviewShown);
    assert_eq!(result.change_id.as_deref(), Some("pending-1"));
    // The document itself is untouched until the user accepts.
    assert_eq!(
        harness
            .documents
            .text_of(&DocumentId::new(MAIN_DOC))
            .as_deref(),
        Some("alpha\nomega\n")
    );
    assert_eq!(
        harness.presenter.proposed_for("pending-1").as_deref(),
        Some("alpha\nbeta\nomega\n")
    );

    assert!(harness.engine.pending_changes().accept_change("pending-1").await);
    assert_eq!(
        harness
            .documents
            .text_of(&DocumentId::new(MAIN_DOC))
            .as_deref(),
        Some("alpha\nbeta\nomega\n")
    );
    assert!(harness.presenter.closed_keys().contains(&"pending-1".to_string()));
    assert!(!harness.engine.pending_changes().has_pending_changes());
}

#[tokio::test]
async fn rejecting_a_preview_leaves_the_document_alone() {
    let documents = MemoryDocuments::new().with_document(MAIN_DOC, "alpha\nomega\n");
    let harness = Harness::build(
        ApplyConfig::default(),
        documents,
        StaticSymbols::new(),
        ScriptedPicker::new(),
        MemoryFs::new(),
    );
    let context = ws_context().with_active(active_main(Position::new(1, 0)));
    let payload = ApplyPayload::new("beta\n", "ts").with_intent(Intent::Edit);

    let result = harness.engine.apply(&payload, &context).await;
    let id = result.change_id.expect("preview allocates an id");

    assert!(harness.engine.pending_changes().reject_change(&id).await);
    assert_eq!(
        harness
            .documents
            .text_of(&DocumentId::new(MAIN_DOC))
            .as_deref(),
        Some("alpha\nomega\n")
    );
    assert!(harness.presenter.closed_keys().contains(&id));
    assert!(!harness.engine.pending_changes().has_pending_changes());
}

#[tokio::test]
async fn mismatched_target_can_apply_to_the_active_file() {
    let documents = MemoryDocuments::new().with_document(MAIN_DOC, "alpha\nomega\n");
    let picker = ScriptedPicker::new().with_choice(Some(0));
    let harness = Harness::build(
        no_preview(),
        documents,
        StaticSymbols::new(),
        picker,
        MemoryFs::new(),
    );
    let context = ws_context().with_active(active_main(Position::new(1, 0)));
    let payload = ApplyPayload::new("beta\n", "ts")
        .with_intent(Intent::Edit)
        .with_target("src/other.ts");

    let result = harness.engine.apply(&payload, &context).await;

    assert!(result.success);
    assert_eq!(result.action, ApplyAction::Edited);
    assert_eq!(
        harness
            .documents
            .text_of(&DocumentId::new(MAIN_DOC))
            .as_deref(),
        Some("alpha\nbeta\nomega\n")
    );
}

#[tokio::test]
async fn mismatched_target_can_divert_to_a_new_file() {
    let documents = MemoryDocuments::new().with_document(MAIN_DOC, "alpha\nomega\n");
    let picker = ScriptedPicker::new().with_choice(Some(1));
    let harness = Harness::build(
        no_preview(),
        documents,
        StaticSymbols::new(),
        picker,
        MemoryFs::new(),
    );
    let context = ws_context().with_active(active_main(Position::new(1, 0)));
    let payload = ApplyPayload::new("beta\n", "ts")
        .with_intent(Intent::Edit)
        .with_target("src/other.ts");

    let result = harness.engine.apply(&payload, &context).await;

    assert!(result.success);
    assert_eq!(result.action, ApplyAction::Created);
    assert_eq!(harness.fs.file("/ws/src/other.ts").as_deref(), Some("beta\n"));
    // The active document was never touched.
    assert_eq!(
        harness
            .documents
            .text_of(&DocumentId::new(MAIN_DOC))
            .as_deref(),
        Some("alpha\nomega\n")
    );
    let prompts = harness.picker.prompts_seen();
    assert!(
        prompts[0].contains("other.ts") && prompts[0].contains("main.ts"),
        "prompt names both files: {prompts:?}"
    );
}

#[tokio::test]
async fn dismissing_the_mismatch_prompt_cancels() {
    let documents = MemoryDocuments::new().with_document(MAIN_DOC, "alpha\nomega\n");
    let picker = ScriptedPicker::new().with_choice(None);
    let harness = Harness::build(
        no_preview(),
        documents,
        StaticSymbols::new(),
        picker,
        MemoryFs::new(),
    );
    let context = ws_context().with_active(active_main(Position::new(1, 0)));
    let payload = ApplyPayload::new("beta\n", "ts")
        .with_intent(Intent::Edit)
        .with_target("src/other.ts");

    let result = harness.engine.apply(&payload, &context).await;

    assert!(!result.success);
    assert_eq!(result.action, ApplyAction::Cancelled);
    assert_eq!(
        harness
            .documents
            .text_of(&DocumentId::new(MAIN_DOC))
            .as_deref(),
        Some("alpha\nomega\n")
    );
}

#[tokio::test]
async fn declined_overwrite_cancels_the_create() {
    let fs = MemoryFs::new().with_file("/ws/app.ts", "original\n");
    let picker = ScriptedPicker::new().with_confirm(false);
    let harness = Harness::build(
        ApplyConfig::default(),
        MemoryDocuments::new(),
        StaticSymbols::new(),
        picker,
        fs,
    );
    let payload = ApplyPayload::new("replacement\n", "ts")
        .with_intent(Intent::Create)
        .with_target("app.ts");

    let result = harness.engine.apply(&payload, &ws_context()).await;

    assert!(!result.success);
    assert_eq!(result.action, ApplyAction::Cancelled);
    assert_eq!(harness.fs.file("/ws/app.ts").as_deref(), Some("original\n"));
}

#[tokio::test]
async fn confirmed_overwrite_replaces_the_file() {
    let fs = MemoryFs::new().with_file("/ws/app.ts", "original\n");
    let picker = ScriptedPicker::new().with_confirm(true);
    let harness = Harness::build(
        ApplyConfig::default(),
        MemoryDocuments::new(),
        StaticSymbols::new(),
        picker,
        fs,
    );
    let payload = ApplyPayload::new("replacement\n", "ts")
        .with_intent(Intent::Create)
        .with_target("app.ts");

    let result = harness.engine.apply(&payload, &ws_context()).await;

    assert!(result.success);
    assert_eq!(
        harness.fs.file("/ws/app.ts").as_deref(),
        Some("replacement\n")
    );
}

#[tokio::test]
async fn targets_may_not_escape_the_workspace() {
    let harness = Harness::new(ApplyConfig::default());

    for target in ["../evil.sh", "src/../../evil.sh", "/etc/passwd"] {
        let payload = ApplyPayload::new("oops\n", "sh")
            .with_intent(Intent::Create)
            .with_target(target);
        let result = harness.engine.apply(&payload, &ws_context()).await;
        assert!(!result.success, "target {target} must be rejected");
        assert_eq!(result.action, ApplyAction::Error);
    }
    assert!(harness.fs.file("/evil.sh").is_none());
    assert!(harness.fs.file("/etc/passwd").is_none());
}

#[tokio::test]
async fn current_folder_policy_uses_the_active_documents_folder() {
    let config = ApplyConfig {
        create_location: CreateLocation::CurrentFolder,
        ..ApplyConfig::default()
    };
    let documents = MemoryDocuments::new().with_document(MAIN_DOC, "");
    let harness = Harness::build(
        config,
        documents,
        StaticSymbols::new(),
        ScriptedPicker::new(),
        MemoryFs::new(),
    );
    let context = ws_context().with_active(active_main(Position::new(0, 0)));
    let payload = ApplyPayload::new("export {};\n", "ts")
        .with_intent(Intent::Create)
        .with_target("helper.ts");

    let result = harness.engine.apply(&payload, &context).await;

    assert!(result.success);
    assert_eq!(
        harness.fs.file("/ws/src/helper.ts").as_deref(),
        Some("export {};\n")
    );
}

#[tokio::test]
async fn ask_policy_can_route_to_a_picked_folder() {
    let config = ApplyConfig {
        create_location: CreateLocation::Ask,
        ..ApplyConfig::default()
    };
    let picker = ScriptedPicker::new()
        .with_choice(Some(2))
        .with_folder(Some(PathBuf::from("/ws/tools")));
    let harness = Harness::build(
        config,
        MemoryDocuments::new(),
        StaticSymbols::new(),
        picker,
        MemoryFs::new(),
    );
    let payload = ApplyPayload::new("print('hi')\n", "py")
        .with_intent(Intent::Create)
        .with_target("run.py");

    let result = harness.engine.apply(&payload, &ws_context()).await;

    assert!(result.success);
    assert_eq!(
        harness.fs.file("/ws/tools/run.py").as_deref(),
        Some("print('hi')\n")
    );
}

#[tokio::test]
async fn dismissing_the_ask_prompt_cancels_the_create() {
    let config = ApplyConfig {
        create_location: CreateLocation::Ask,
        ..ApplyConfig::default()
    };
    let picker = ScriptedPicker::new().with_choice(None);
    let harness = Harness::build(
        config,
        MemoryDocuments::new(),
        StaticSymbols::new(),
        picker,
        MemoryFs::new(),
    );
    let payload = ApplyPayload::new("print('hi')\n", "py")
        .with_intent(Intent::Create)
        .with_target("run.py");

    let result = harness.engine.apply(&payload, &ws_context()).await;

    assert!(!result.success);
    assert_eq!(result.action, ApplyAction::Cancelled);
    assert!(harness.fs.file("/ws/run.py").is_none());
}

#[tokio::test]
async fn batch_halts_at_the_first_failure() {
    let fs = MemoryFs::new().with_file("/ws/b.ts", "keep me\n");
    // Only one scripted answer: the decline for b.ts.
    let picker = ScriptedPicker::new().with_confirm(false);
    let harness = Harness::build(
        ApplyConfig::default(),
        MemoryDocuments::new(),
        StaticSymbols::new(),
        picker,
        fs,
    );
    let payloads = vec![
        ApplyPayload::new("let a = 1;\n", "ts")
            .with_intent(Intent::Create)
            .with_target("a.ts"),
        ApplyPayload::new("let b = 2;\n", "ts")
            .with_intent(Intent::Create)
            .with_target("b.ts"),
        ApplyPayload::new("$ rm -rf build", "bash"),
    ];

    let result = harness.engine.apply_all(&payloads, &ws_context()).await;

    assert!(!result.success);
    assert_eq!(result.action, ApplyAction::Cancelled);
    // The unit before the failure stays applied; the one after never ran.
    assert_eq!(harness.fs.file("/ws/a.ts").as_deref(), Some("let a = 1;\n"));
    assert_eq!(harness.fs.file("/ws/b.ts").as_deref(), Some("keep me\n"));
    assert!(harness.terminal.staged().is_empty());
}

#[tokio::test]
async fn batch_success_reports_the_file_count() {
    let harness = Harness::new(ApplyConfig::default());
    let payloads = vec![
        ApplyPayload::new("// src/a.ts\nexport const a = 1;\n", "ts"),
        ApplyPayload::new("// src/b.ts\nexport const b = 2;\n", "ts"),
    ];

    let result = harness.engine.apply_all(&payloads, &ws_context()).await;

    assert!(result.success);
    assert_eq!(result.action, ApplyAction::Created);
    assert_eq!(result.message.as_deref(), Some("Applied 2 files"));
    assert!(harness.fs.file("/ws/src/a.ts").is_some());
    assert!(harness.fs.file("/ws/src/b.ts").is_some());
}

#[tokio::test]
async fn auto_detect_off_leaves_hints_alone() {
    let config = ApplyConfig {
        auto_detect: false,
        ..ApplyConfig::default()
    };
    let harness = Harness::new(config);
    // Would classify as a command, but detection is off and no intent was
    // given, so it falls back to edit, and with no active document to
    // create into an untitled buffer.
    let payload = ApplyPayload::new("$ ls -la", "sh");

    let result = harness.engine.apply(&payload, &ws_context()).await;

    assert!(result.success);
    assert_eq!(result.action, ApplyAction::Created);
    assert!(harness.terminal.staged().is_empty());
    assert_eq!(
        harness.documents.opened_untitled(),
        vec![("$ ls -la".to_string(), "shellscript".to_string())]
    );
}
