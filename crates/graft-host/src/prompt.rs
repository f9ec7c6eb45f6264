use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::HostError;

/// Interactive choices presented to the user.
///
/// Every method distinguishes "picked something" from "dismissed": a dismissed
/// prompt is a cancellation, never an error.
#[async_trait]
pub trait PickerPrompt: Send + Sync {
    /// Present an N-way choice. Returns the index of the chosen option, or
    /// `None` when the prompt was dismissed.
    async fn choose(&self, title: &str, options: &[&str]) -> Result<Option<usize>, HostError>;

    /// Ask a yes/no question. `false` covers both "no" and dismissal.
    async fn confirm(&self, message: &str) -> Result<bool, HostError>;

    /// Open a folder picker, starting at `start` when given. `None` when
    /// dismissed.
    async fn pick_folder(&self, start: Option<&Path>) -> Result<Option<PathBuf>, HostError>;
}
