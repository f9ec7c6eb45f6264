//! Dispatch and the three unit handlers.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use graft_anchor::{AnchorResolver, ResolveMethod};
use graft_host::{
    ApplyResult, DocumentEdit, DocumentStore, HostError, Notice, PickerPrompt, PreviewPresenter,
    SymbolIndex, TerminalSink, WorkspaceFs,
};
use graft_intent::{detect, normalize_language, shape, Intent};
use graft_pending::PendingChangeStore;

use crate::{ActiveDocument, ApplyConfig, ApplyContext, ApplyPayload, CreateLocation, PreviewMode};

/// Detection confidence above which a recomputed intent is adopted.
const ADOPT_CONFIDENCE: f64 = 0.6;

/// The orchestrator. One engine serves a host session; it owns the
/// pending-change store (and through it the expiry sweeper), everything else
/// is a shared collaborator handle.
pub struct ApplyEngine {
    documents: Arc<dyn DocumentStore>,
    terminal: Arc<dyn TerminalSink>,
    prompt: Arc<dyn PickerPrompt>,
    fs: Arc<dyn WorkspaceFs>,
    resolver: AnchorResolver,
    pending: Arc<PendingChangeStore>,
    config: ApplyConfig,
}

/// One payload after intent adoption: explicit fields kept, gaps filled from
/// detection, intent defaulted to `edit`.
struct PlannedUnit<'a> {
    intent: Intent,
    code: &'a str,
    language: &'a str,
    target: Option<String>,
    anchor: Option<String>,
}

impl ApplyEngine {
    /// Must run inside a tokio runtime (the pending store starts its sweeper
    /// on construction).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        symbols: Arc<dyn SymbolIndex>,
        terminal: Arc<dyn TerminalSink>,
        prompt: Arc<dyn PickerPrompt>,
        fs: Arc<dyn WorkspaceFs>,
        presenter: Arc<dyn PreviewPresenter>,
        config: ApplyConfig,
    ) -> Self {
        Self {
            resolver: AnchorResolver::new(symbols),
            pending: Arc::new(PendingChangeStore::new(documents.clone(), presenter)),
            documents,
            terminal,
            prompt,
            fs,
            config,
        }
    }

    /// The staged-change store, for accept/reject and teardown.
    pub fn pending_changes(&self) -> &PendingChangeStore {
        &self.pending
    }

    /// Applies one code block and reports what happened.
    ///
    /// Expected outcomes (cancelled prompts, declined overwrites, missing
    /// pending changes) come back as structured results, never as `Err`.
    pub async fn apply(&self, payload: &ApplyPayload, context: &ApplyContext) -> ApplyResult {
        let unit = self.plan_unit(payload, context);
        tracing::debug!(intent = ?unit.intent, "applying code block");
        match unit.intent {
            Intent::Create => self.handle_create(&unit, context).await,
            Intent::Command => self.handle_command(&unit).await,
            Intent::Edit => self.handle_edit(&unit, context).await,
        }
    }

    /// Applies payloads strictly in order, halting on the first failure.
    ///
    /// The failing unit's result is returned as the batch result; units after
    /// it are never attempted, and units before it are not rolled back.
    pub async fn apply_all(&self, payloads: &[ApplyPayload], context: &ApplyContext) -> ApplyResult {
        for (index, payload) in payloads.iter().enumerate() {
            let result = self.apply(payload, context).await;
            if !result.success {
                tracing::debug!(index, action = ?result.action, "batch halted");
                return result;
            }
        }
        ApplyResult::created(format!("Applied {} files", payloads.len()))
    }

    fn plan_unit<'a>(&self, payload: &'a ApplyPayload, context: &ApplyContext) -> PlannedUnit<'a> {
        let mut intent = payload.intent;
        let mut target = payload.target.clone();
        let mut anchor = payload.anchor.clone();

        if self.config.auto_detect {
            let hint = context.active.as_ref().and_then(ActiveDocument::file_name);
            let detected = detect(&payload.code, &payload.language, hint.as_deref());
            if detected.confidence > ADOPT_CONFIDENCE {
                // Explicit payload fields always win; detection fills gaps.
                intent = intent.or(Some(detected.intent));
                target = target.or(detected.target);
                anchor = anchor.or(detected.anchor);
            }
        }

        PlannedUnit {
            intent: intent.unwrap_or(Intent::Edit),
            code: &payload.code,
            language: &payload.language,
            target,
            anchor,
        }
    }

    async fn handle_create(&self, unit: &PlannedUnit<'_>, context: &ApplyContext) -> ApplyResult {
        let code = shape::strip_path_header(unit.code);
        match (&unit.target, &context.workspace_root) {
            (Some(target), Some(root)) => self.create_file(root, target, code, context).await,
            _ => self.create_untitled(code, unit.language).await,
        }
    }

    async fn create_file(
        &self,
        root: &Path,
        target: &str,
        code: &str,
        context: &ApplyContext,
    ) -> ApplyResult {
        let base = match self.resolve_base(root, context).await {
            Ok(Some(base)) => base,
            Ok(None) => return ApplyResult::cancelled(),
            Err(error) => return ApplyResult::error(format!("folder choice failed: {error}")),
        };
        let path = match join_inside(&base, target) {
            Ok(path) => path,
            Err(message) => return ApplyResult::error(message),
        };

        if self.fs.exists(&path).await {
            let question = format!("{} already exists. Overwrite it?", path.display());
            match self.prompt.confirm(&question).await {
                Ok(true) => {}
                Ok(false) => {
                    tracing::debug!(path = %path.display(), "create declined at overwrite prompt");
                    return ApplyResult::cancelled();
                }
                Err(error) => {
                    return ApplyResult::error(format!("overwrite prompt failed: {error}"))
                }
            }
        }

        if let Some(parent) = path.parent() {
            if let Err(error) = self.fs.create_dir_all(parent).await {
                return ApplyResult::error(format!(
                    "failed to create {}: {error}",
                    parent.display()
                ));
            }
        }
        if let Err(error) = self.fs.write(&path, code).await {
            return ApplyResult::error(format!("failed to write {}: {error}", path.display()));
        }
        if let Err(error) = self.documents.open_path(&path).await {
            return ApplyResult::error(format!(
                "created {} but could not open it: {error}",
                path.display()
            ));
        }
        tracing::debug!(path = %path.display(), "file created");
        ApplyResult::created(format!("Created {target}"))
    }

    async fn resolve_base(
        &self,
        root: &Path,
        context: &ApplyContext,
    ) -> Result<Option<PathBuf>, HostError> {
        let current_folder = || {
            context
                .active
                .as_ref()
                .and_then(|active| active.path.as_deref())
                .and_then(Path::parent)
                .map_or_else(|| root.to_path_buf(), Path::to_path_buf)
        };

        match self.config.create_location {
            CreateLocation::WorkspaceRoot => Ok(Some(root.to_path_buf())),
            CreateLocation::CurrentFolder => Ok(Some(current_folder())),
            CreateLocation::Ask => {
                let options = ["Workspace root", "Current folder", "Pick a folder"];
                match self.prompt.choose("Create the file where?", &options).await? {
                    Some(0) => Ok(Some(root.to_path_buf())),
                    Some(1) => Ok(Some(current_folder())),
                    Some(2) => self.prompt.pick_folder(Some(root)).await,
                    _ => Ok(None),
                }
            }
        }
    }

    async fn create_untitled(&self, code: &str, language: &str) -> ApplyResult {
        let language = normalize_language(language);
        match self.documents.open_untitled(code, &language).await {
            Ok(doc) => {
                tracing::debug!(doc = %doc, %language, "untitled buffer opened");
                ApplyResult::created(format!("Opened new {language} buffer"))
            }
            Err(error) => ApplyResult::error(format!("failed to open untitled buffer: {error}")),
        }
    }

    async fn handle_command(&self, unit: &PlannedUnit<'_>) -> ApplyResult {
        let command = strip_prompt_marker(unit.code);
        match self.terminal.stage_text(command).await {
            Ok(()) => {
                tracing::debug!("command staged in terminal");
                ApplyResult::sent_to_terminal("Command staged in the terminal (not executed)")
            }
            Err(error) => ApplyResult::error(format!("failed to stage command: {error}")),
        }
    }

    async fn handle_edit(&self, unit: &PlannedUnit<'_>, context: &ApplyContext) -> ApplyResult {
        let Some(active) = &context.active else {
            // Nothing to edit into; treat the block as a creation.
            return self.handle_create(unit, context).await;
        };

        if let (Some(target), Some(active_name)) = (&unit.target, active.file_name()) {
            if let Some(target_name) = basename(target) {
                if target_name != active_name {
                    let title =
                        format!("This block names {target_name}, but {active_name} is active");
                    let options = ["Apply here", "Create the file", "Cancel"];
                    match self.prompt.choose(&title, &options).await {
                        Ok(Some(0)) => {}
                        Ok(Some(1)) => return self.handle_create(unit, context).await,
                        Ok(_) => return ApplyResult::cancelled(),
                        Err(error) => {
                            return ApplyResult::error(format!("prompt failed: {error}"))
                        }
                    }
                }
            }
        }

        let text = match self.documents.text(&active.id).await {
            Ok(text) => text,
            Err(error) => {
                return ApplyResult::error(format!(
                    "failed to read {}: {error}",
                    active.display_name()
                ))
            }
        };

        let location = self
            .resolver
            .resolve(&active.id, &text, unit.anchor.as_deref(), active.cursor)
            .await;

        let mut notices = Vec::new();
        match (location.method, &unit.anchor) {
            (ResolveMethod::CursorFallback, Some(anchor)) => {
                notices.push(Notice::warning(format!(
                    "anchor \"{anchor}\" not found; applying at the cursor"
                )));
            }
            (ResolveMethod::FuzzySymbol, _) => {
                let matched = location.symbol_name.as_deref().unwrap_or("a similar symbol");
                notices.push(Notice::info(format!("matched similar symbol \"{matched}\"")));
            }
            _ => {}
        }

        let preview = match self.config.preview {
            PreviewMode::Always => true,
            PreviewMode::EditsOnly => unit.intent == Intent::Edit,
            PreviewMode::Never => false,
        };
        if preview {
            return self
                .pending
                .show_preview(&active.id, location.position, unit.code, location.range)
                .await
                .with_notices(notices);
        }

        let edit = match location.range {
            Some(range) => DocumentEdit::replace(range, unit.code),
            None => DocumentEdit::insert(location.position, unit.code),
        };
        match self.documents.apply_edit(&active.id, edit).await {
            Ok(()) => ApplyResult::edited(format!("Applied changes to {}", active.display_name()))
                .with_notices(notices),
            Err(error) => ApplyResult::error(format!(
                "failed to edit {}: {error}",
                active.display_name()
            ))
            .with_notices(notices),
        }
    }
}

/// Joins `target` onto `base`, rejecting absolute targets and any `..` that
/// would climb out of `base`.
fn join_inside(base: &Path, target: &str) -> Result<PathBuf, String> {
    let relative = Path::new(target);
    if relative.is_absolute() {
        return Err(format!("target path must be relative: {target}"));
    }

    let mut resolved = base.to_path_buf();
    for component in relative.components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !resolved.pop() || !resolved.starts_with(base) {
                    return Err(format!("target path escapes the workspace: {target}"));
                }
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(format!("target path must be relative: {target}"));
            }
        }
    }
    Ok(resolved)
}

/// Strips one leading shell-prompt marker from a command block.
fn strip_prompt_marker(command: &str) -> &str {
    let command = command.trim();
    match command.strip_prefix(['$', '>', '%']) {
        Some(rest) => rest.trim_start(),
        None => command,
    }
}

fn basename(path: &str) -> Option<String> {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
}
