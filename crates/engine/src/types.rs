use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metadata block attached to every [`ContextResult`].
///
/// `nodes_found` and `strategy` are observability aids, not part of the
/// correctness contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextMetadata {
    /// Project source file list, as exposed by the document.
    pub source_files: Value,

    /// Import list, as exposed by the document.
    pub imports: Value,

    /// External dependency map, as exposed by the document.
    pub dependencies: Value,

    /// Total nodes in the slice.
    pub nodes_found: usize,

    /// Coarse label: "file-based" or "symbol-based".
    pub strategy: String,
}

/// The engine's sole output: one contextual slice of the document.
///
/// Created fresh per request and immutable once returned. `endpoints`
/// and `relationships` are omitted from the serialized form when the
/// filtered subsets are empty, matching the snapshot format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextResult {
    /// Echo of the requested symbols, order and contents preserved.
    pub symbols: Vec<String>,

    /// Subset of `symbols` that resolved to at least one node.
    #[serde(rename = "matchedSymbols")]
    pub matched_symbols: Vec<String>,

    /// Closure nodes, owned, in discovery order (seeds first).
    pub nodes: Vec<Value>,

    /// Endpoint registry entries tied to the slice.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoints: Option<Map<String, Value>>,

    /// Relationship registry entries touching the slice.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationships: Option<Map<String, Value>>,

    pub metadata: ContextMetadata,

    /// Snapshot artifact location; `None` when the write failed or was
    /// disabled.
    #[serde(rename = "savedTo", skip_serializing_if = "Option::is_none")]
    pub saved_to: Option<String>,
}
