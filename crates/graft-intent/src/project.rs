//! Workspace project-type detection.
//!
//! Advisory context only: callers may use the result to bias display or
//! defaults, never to override classification.

use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Node,
    Python,
    Rust,
    Go,
    Unknown,
}

/// Marker files probed in order; the first hit wins.
const MARKERS: &[(&str, ProjectType)] = &[
    ("package.json", ProjectType::Node),
    ("requirements.txt", ProjectType::Python),
    ("pyproject.toml", ProjectType::Python),
    ("setup.py", ProjectType::Python),
    ("Cargo.toml", ProjectType::Rust),
    ("go.mod", ProjectType::Go),
];

pub fn detect_project_type(root: &Path) -> ProjectType {
    for (marker, project_type) in MARKERS {
        if root.join(marker).is_file() {
            return *project_type;
        }
    }
    ProjectType::Unknown
}
