//! The resolution chain: exact symbol, fuzzy symbol, text search, cursor.

use std::sync::Arc;

use graft_core::{LineIndex, Position, Range, TextSize};
use graft_host::{DocumentId, SymbolIndex, SymbolNode};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::distance::within_distance;
use crate::imports::import_insertion_position;

/// Anchor value that routes straight to the import-section locator.
pub const IMPORTS_ANCHOR: &str = "imports";

/// Maximum Levenshtein distance for a fuzzy symbol match.
const MAX_SYMBOL_DISTANCE: usize = 3;

/// How a location was found, ordered from strongest to weakest evidence.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveMethod {
    ExactSymbol,
    FuzzySymbol,
    TextSearch,
    CursorFallback,
}

/// Where an edit should land, and how much to trust that answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub position: Position,
    /// Present only when the edit should replace an existing extent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<Range>,
    pub method: ResolveMethod,
    /// Name of the matched symbol, for symbol-based methods.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol_name: Option<String>,
}

impl ResolvedLocation {
    fn at(position: Position, method: ResolveMethod) -> Self {
        Self {
            position,
            range: None,
            method,
            symbol_name: None,
        }
    }

    fn symbol(node: &SymbolNode, method: ResolveMethod) -> Self {
        Self {
            position: node.range.start,
            range: Some(node.range),
            method,
            symbol_name: Some(node.name.clone()),
        }
    }
}

/// Resolves an anchor against a text snapshot and its symbol tree.
///
/// The chain never fails: an anchor nothing recognizes degrades to the
/// caller's cursor position, reported as [`ResolveMethod::CursorFallback`].
pub fn resolve_in_text(
    text: &str,
    symbols: &[SymbolNode],
    anchor: Option<&str>,
    cursor: Position,
) -> ResolvedLocation {
    let anchor = match anchor.map(str::trim) {
        Some(anchor) if !anchor.is_empty() => anchor,
        _ => return ResolvedLocation::at(cursor, ResolveMethod::CursorFallback),
    };

    if anchor.eq_ignore_ascii_case(IMPORTS_ANCHOR) {
        return ResolvedLocation::at(import_insertion_position(text), ResolveMethod::TextSearch);
    }

    let location = exact_symbol(symbols, anchor)
        .or_else(|| fuzzy_symbol(symbols, anchor))
        .or_else(|| text_search(text, anchor))
        .unwrap_or_else(|| ResolvedLocation::at(cursor, ResolveMethod::CursorFallback));
    tracing::debug!(anchor, method = ?location.method, "anchor resolved");
    location
}

/// Pre-order walk of the symbol tree; the first match wins.
fn find_symbol<'a>(
    symbols: &'a [SymbolNode],
    matches: &dyn Fn(&str) -> bool,
) -> Option<&'a SymbolNode> {
    for symbol in symbols {
        if matches(&symbol.name) {
            return Some(symbol);
        }
        if let Some(found) = find_symbol(&symbol.children, matches) {
            return Some(found);
        }
    }
    None
}

fn exact_symbol(symbols: &[SymbolNode], anchor: &str) -> Option<ResolvedLocation> {
    find_symbol(symbols, &|name| name.eq_ignore_ascii_case(anchor))
        .map(|node| ResolvedLocation::symbol(node, ResolveMethod::ExactSymbol))
}

fn fuzzy_symbol(symbols: &[SymbolNode], anchor: &str) -> Option<ResolvedLocation> {
    let needle = anchor.to_lowercase();
    find_symbol(symbols, &|name| {
        if name.is_empty() {
            return false;
        }
        let name = name.to_lowercase();
        name.contains(&needle)
            || needle.contains(&name)
            || within_distance(&name, &needle, MAX_SYMBOL_DISTANCE)
    })
    .map(|node| ResolvedLocation::symbol(node, ResolveMethod::FuzzySymbol))
}

fn text_search(text: &str, anchor: &str) -> Option<ResolvedLocation> {
    let offset = substring_search(text, anchor).or_else(|| declaration_search(text, anchor))?;
    let index = LineIndex::new(text);
    let position = index.position(text, offset);
    Some(ResolvedLocation::at(position, ResolveMethod::TextSearch))
}

/// First occurrence of `anchor` in `text`, ignoring ASCII case.
fn substring_search(text: &str, anchor: &str) -> Option<TextSize> {
    let haystack = text.as_bytes();
    let needle = anchor.as_bytes();
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    (0..=haystack.len() - needle.len())
        .filter(|&start| text.is_char_boundary(start))
        .find(|&start| haystack[start..start + needle.len()].eq_ignore_ascii_case(needle))
        .map(|start| TextSize::from(start as u32))
}

/// Declaration patterns tried in a fixed order. Unlike [`substring_search`]
/// these fold case beyond ASCII, so they can still hit for non-ASCII anchors.
fn declaration_search(text: &str, anchor: &str) -> Option<TextSize> {
    let name = regex::escape(anchor);
    let patterns = [
        format!(r"(?i)\bfunction\s+{name}\s*\("),
        format!(r"(?i)\bdef\s+{name}\s*\("),
        format!(r"(?i)\b(?:const|let|var)\s+{name}\s*="),
        format!(r"(?i)\bclass\s+{name}\b"),
        format!(r"(?i)\bfn\s+{name}\b"),
        format!(r"(?i)\bfunc\s+{name}\b"),
    ];
    for pattern in patterns {
        let regex = Regex::new(&pattern).expect("escaped anchor yields a valid pattern");
        if let Some(found) = regex.find(text) {
            return Some(TextSize::from(found.start() as u32));
        }
    }
    None
}

/// Resolves anchors for live documents using the host's symbol index.
#[derive(Clone)]
pub struct AnchorResolver {
    symbols: Arc<dyn SymbolIndex>,
}

impl AnchorResolver {
    pub fn new(symbols: Arc<dyn SymbolIndex>) -> Self {
        Self { symbols }
    }

    /// Resolve `anchor` inside `doc`, falling back to `cursor`.
    ///
    /// A failed symbol lookup is treated as an empty symbol tree; the text
    /// tiers still run, so resolution itself never fails.
    pub async fn resolve(
        &self,
        doc: &DocumentId,
        text: &str,
        anchor: Option<&str>,
        cursor: Position,
    ) -> ResolvedLocation {
        let wants_symbols = anchor
            .map(str::trim)
            .is_some_and(|anchor| !anchor.is_empty() && !anchor.eq_ignore_ascii_case(IMPORTS_ANCHOR));
        let symbols = if wants_symbols {
            match self.symbols.document_symbols(doc).await {
                Ok(symbols) => symbols,
                Err(error) => {
                    tracing::debug!(doc = %doc, %error, "symbol lookup failed; resolving from text only");
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };
        resolve_in_text(text, &symbols, anchor, cursor)
    }
}
