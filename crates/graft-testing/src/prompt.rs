use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use graft_host::{HostError, PickerPrompt};
use parking_lot::Mutex;

/// [`PickerPrompt`] that replays scripted answers in order.
///
/// Each prompt kind consumes from its own queue. A prompt arriving with an
/// empty queue fails with a descriptive error rather than panicking, so an
/// unexpected prompt shows up as a failed operation in the test.
#[derive(Default)]
pub struct ScriptedPicker {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    choices: VecDeque<Option<usize>>,
    confirms: VecDeque<bool>,
    folders: VecDeque<Option<PathBuf>>,
    seen: Vec<String>,
}

impl ScriptedPicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an answer for the next `choose` call; `None` means dismissed.
    pub fn with_choice(self, answer: Option<usize>) -> Self {
        self.inner.lock().choices.push_back(answer);
        self
    }

    /// Queue an answer for the next `confirm` call.
    pub fn with_confirm(self, answer: bool) -> Self {
        self.inner.lock().confirms.push_back(answer);
        self
    }

    /// Queue an answer for the next `pick_folder` call.
    pub fn with_folder(self, answer: Option<PathBuf>) -> Self {
        self.inner.lock().folders.push_back(answer);
        self
    }

    /// Titles and messages of every prompt shown, in order.
    pub fn prompts_seen(&self) -> Vec<String> {
        self.inner.lock().seen.clone()
    }
}

#[async_trait]
impl PickerPrompt for ScriptedPicker {
    async fn choose(&self, title: &str, options: &[&str]) -> Result<Option<usize>, HostError> {
        let mut inner = self.inner.lock();
        inner.seen.push(format!("choose: {title} {options:?}"));
        inner
            .choices
            .pop_front()
            .ok_or_else(|| HostError::other(format!("unscripted prompt: {title}")))
    }

    async fn confirm(&self, message: &str) -> Result<bool, HostError> {
        let mut inner = self.inner.lock();
        inner.seen.push(format!("confirm: {message}"));
        inner
            .confirms
            .pop_front()
            .ok_or_else(|| HostError::other(format!("unscripted confirmation: {message}")))
    }

    async fn pick_folder(&self, start: Option<&Path>) -> Result<Option<PathBuf>, HostError> {
        let mut inner = self.inner.lock();
        inner.seen.push(format!("pick_folder: {start:?}"));
        inner
            .folders
            .pop_front()
            .ok_or_else(|| HostError::other("unscripted folder picker"))
    }
}
