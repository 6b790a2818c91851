use std::path::PathBuf;

/// Policy for picking a node when a relationship endpoint names several.
///
/// Duplicate names are legal (overloads, shadowing across files), so a
/// name-based reference can be ambiguous. `PreferSameFile` keeps the
/// candidate that lives in the same source file as the opposite endpoint
/// of the relationship; `FirstMatch` keeps the first node in traversal
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AmbiguityPolicy {
    #[default]
    FirstMatch,
    PreferSameFile,
}

/// Configuration for one slicing request.
///
/// Passed explicitly into every entry point; nothing in the engine reads
/// process-global state. The CLI builds this from flags and environment
/// variables once per invocation.
#[derive(Debug, Clone)]
pub struct SliceConfig {
    /// Suffix that makes a requested symbol a file-name lookup (e.g. ".bal").
    pub file_suffix: String,

    /// Minimum symbol length before substring matching activates.
    /// Short symbols over-match on common words, so they only go through
    /// the exact and id strategies.
    pub min_substring_len: usize,

    /// How to settle name-based references that match several nodes.
    pub ambiguity: AmbiguityPolicy,

    /// Also scan every indexed node for raw string mentions of the seed
    /// ids during the reverse pass. Catches references outside the known
    /// dependency keys at the cost of a full index sweep.
    pub deep_reverse: bool,

    /// Directory for snapshot artifacts.
    pub output_dir: PathBuf,

    /// Whether to persist a snapshot at all.
    pub snapshot: bool,
}

impl Default for SliceConfig {
    fn default() -> Self {
        Self {
            file_suffix: ".bal".to_string(),
            min_substring_len: 3,
            ambiguity: AmbiguityPolicy::default(),
            deep_reverse: false,
            output_dir: PathBuf::from("ast-context-results"),
            snapshot: true,
        }
    }
}
