use std::collections::HashMap;

use async_trait::async_trait;
use graft_host::{DocumentId, HostError, SymbolIndex, SymbolNode};
use parking_lot::Mutex;

/// [`SymbolIndex`] serving fixed symbol trees per document. Documents without
/// an entry get an empty tree, the same shape a host without a symbol
/// provider reports.
#[derive(Default)]
pub struct StaticSymbols {
    by_doc: Mutex<HashMap<DocumentId, Vec<SymbolNode>>>,
}

impl StaticSymbols {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_symbols(self, doc: impl Into<DocumentId>, symbols: Vec<SymbolNode>) -> Self {
        self.by_doc.lock().insert(doc.into(), symbols);
        self
    }

    pub fn set(&self, doc: impl Into<DocumentId>, symbols: Vec<SymbolNode>) {
        self.by_doc.lock().insert(doc.into(), symbols);
    }
}

#[async_trait]
impl SymbolIndex for StaticSymbols {
    async fn document_symbols(&self, doc: &DocumentId) -> Result<Vec<SymbolNode>, HostError> {
        Ok(self.by_doc.lock().get(doc).cloned().unwrap_or_default())
    }
}
