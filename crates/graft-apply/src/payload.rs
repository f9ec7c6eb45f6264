use graft_intent::Intent;
use serde::{Deserialize, Serialize};

/// One code block as received from the chat frontend.
///
/// `code` and `language` always arrive; intent, target path, and anchor are
/// hints the frontend may or may not supply. Missing hints are filled by
/// classification, explicit ones are never overridden.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplyPayload {
    pub code: String,
    #[serde(default)]
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
}

impl ApplyPayload {
    pub fn new(code: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            language: language.into(),
            intent: None,
            target: None,
            anchor: None,
        }
    }

    pub fn with_intent(mut self, intent: Intent) -> Self {
        self.intent = Some(intent);
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_anchor(mut self, anchor: impl Into<String>) -> Self {
        self.anchor = Some(anchor.into());
        self
    }
}
