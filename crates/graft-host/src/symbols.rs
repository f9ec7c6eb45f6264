use async_trait::async_trait;
use graft_core::Range;
use serde::{Deserialize, Serialize};

use crate::{DocumentId, HostError};

/// One node of a document's symbol tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolNode {
    pub name: String,
    /// Full extent of the symbol, including its body.
    pub range: Range,
    #[serde(default)]
    pub children: Vec<SymbolNode>,
}

impl SymbolNode {
    pub fn new(name: impl Into<String>, range: Range) -> Self {
        Self {
            name: name.into(),
            range,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<SymbolNode>) -> Self {
        self.children = children;
        self
    }
}

/// Symbol lookup as the host editor exposes it.
#[async_trait]
pub trait SymbolIndex: Send + Sync {
    /// Symbol tree for a document.
    ///
    /// Hosts without a symbol provider for the document's language should
    /// return an empty vector; callers treat failures the same way.
    async fn document_symbols(&self, doc: &DocumentId) -> Result<Vec<SymbolNode>, HostError>;
}
