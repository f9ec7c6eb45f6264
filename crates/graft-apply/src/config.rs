use serde::{Deserialize, Serialize};

/// Where created files land when a target path is being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreateLocation {
    /// Join the target onto the workspace root.
    WorkspaceRoot,
    /// Join onto the active document's folder, falling back to the root.
    CurrentFolder,
    /// Prompt a three-way choice per creation.
    Ask,
}

/// When edits are staged for review instead of applied directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewMode {
    Always,
    /// Preview only units whose final intent is `edit`.
    EditsOnly,
    Never,
}

/// Orchestrator policy knobs. All of them have conservative defaults; hosts
/// overlay user settings by deserializing over [`Default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ApplyConfig {
    /// Recompute intent per payload and adopt it above the confidence bar.
    pub auto_detect: bool,
    pub create_location: CreateLocation,
    pub preview: PreviewMode,
}

impl Default for ApplyConfig {
    fn default() -> Self {
        Self {
            auto_detect: true,
            create_location: CreateLocation::WorkspaceRoot,
            preview: PreviewMode::EditsOnly,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_values_use_snake_case() {
        let config: ApplyConfig = serde_json::from_str(
            r#"{"create_location": "current_folder", "preview": "edits_only"}"#,
        )
        .unwrap();
        assert_eq!(config.create_location, CreateLocation::CurrentFolder);
        assert_eq!(config.preview, PreviewMode::EditsOnly);
        // Unspecified fields keep their defaults.
        assert!(config.auto_detect);
    }

    #[test]
    fn defaults_are_stable() {
        let config = ApplyConfig::default();
        assert!(config.auto_detect);
        assert_eq!(config.create_location, CreateLocation::WorkspaceRoot);
        assert_eq!(config.preview, PreviewMode::EditsOnly);
    }
}
