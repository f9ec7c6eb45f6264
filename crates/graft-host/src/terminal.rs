use async_trait::async_trait;

use crate::HostError;

/// Terminal access as the host exposes it.
#[async_trait]
pub trait TerminalSink: Send + Sync {
    /// Reveal a terminal (creating one when none exists) and stage `text`
    /// into its input line without running it.
    ///
    /// Execution is always a separate, explicit user action; implementations
    /// must not submit the staged text themselves.
    async fn stage_text(&self, text: &str) -> Result<(), HostError>;
}
