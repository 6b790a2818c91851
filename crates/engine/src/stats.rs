use serde::{Deserialize, Serialize};

/// Statistics about one indexing pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexStats {
    /// Nodes registered in the id table
    pub nodes: usize,

    /// Nodes that carry a human-readable name
    pub named: usize,

    /// Distinct kind tags seen
    pub kinds: usize,

    /// Distinct source files seen
    pub files: usize,

    /// Time taken in milliseconds
    pub time_ms: u64,
}
