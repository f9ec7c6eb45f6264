use serde::{Deserialize, Serialize};

/// What an apply operation did (or why it stopped).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyAction {
    Created,
    Edited,
    SentToTerminal,
    PreviewShown,
    Cancelled,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeSeverity {
    Info,
    Warning,
}

/// Advisory message attached to a result. Notices never affect `success`;
/// they exist so degraded outcomes (fuzzy match, cursor fallback) stay
/// visible without blocking completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub severity: NoticeSeverity,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: NoticeSeverity::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: NoticeSeverity::Warning,
            message: message.into(),
        }
    }
}

/// Terminal value of one applied unit (or a whole batch).
///
/// Expected, handled conditions (cancellation, missing pending change,
/// failed write) are reported through this type, never as errors crossing
/// the public API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyResult {
    pub success: bool,
    pub action: ApplyAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<Notice>,
}

impl ApplyResult {
    fn new(success: bool, action: ApplyAction) -> Self {
        Self {
            success,
            action,
            message: None,
            change_id: None,
            notices: Vec::new(),
        }
    }

    pub fn created(message: impl Into<String>) -> Self {
        Self::new(true, ApplyAction::Created).with_message(message)
    }

    pub fn edited(message: impl Into<String>) -> Self {
        Self::new(true, ApplyAction::Edited).with_message(message)
    }

    pub fn sent_to_terminal(message: impl Into<String>) -> Self {
        Self::new(true, ApplyAction::SentToTerminal).with_message(message)
    }

    pub fn preview_shown(change_id: impl Into<String>) -> Self {
        let mut result = Self::new(true, ApplyAction::PreviewShown);
        result.change_id = Some(change_id.into());
        result
    }

    pub fn cancelled() -> Self {
        Self::new(false, ApplyAction::Cancelled)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(false, ApplyAction::Error).with_message(message)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_notice(mut self, notice: Notice) -> Self {
        self.notices.push(notice);
        self
    }

    pub fn with_notices(mut self, notices: impl IntoIterator<Item = Notice>) -> Self {
        self.notices.extend(notices);
        self
    }
}
