use async_trait::async_trait;
use graft_host::{HostError, TerminalSink};
use parking_lot::Mutex;

/// [`TerminalSink`] that records staged text instead of showing a terminal.
#[derive(Default)]
pub struct RecordingTerminal {
    staged: Mutex<Vec<String>>,
}

impl RecordingTerminal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything staged so far, in call order.
    pub fn staged(&self) -> Vec<String> {
        self.staged.lock().clone()
    }
}

#[async_trait]
impl TerminalSink for RecordingTerminal {
    async fn stage_text(&self, text: &str) -> Result<(), HostError> {
        self.staged.lock().push(text.to_string());
        Ok(())
    }
}
