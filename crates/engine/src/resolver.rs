use crate::config::SliceConfig;
use crate::index::DocumentIndex;
use std::collections::HashSet;

/// Outcome of mapping requested symbols onto indexed nodes.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Seed node ids in resolution order, deduplicated.
    pub seed_ids: Vec<String>,

    /// Input symbols that produced at least one hit, in input order.
    pub matched_symbols: Vec<String>,

    /// Whether any symbol resolved through the file-name strategy.
    pub file_matched: bool,
}

/// Map symbol strings to seed node ids with layered matching.
///
/// Strategies are cumulative, not first-match-wins: one symbol may hit
/// through its file name, its exact name, and a substring all at once.
/// Symbols that match nothing stay out of `matched_symbols` but are never
/// an error. Resolution is pure with respect to the index and idempotent.
pub fn resolve_symbols(
    symbols: &[String],
    index: &DocumentIndex<'_>,
    config: &SliceConfig,
) -> Resolution {
    let mut resolution = Resolution::default();
    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut seen_symbols: HashSet<&str> = HashSet::new();

    for symbol in symbols {
        let mut hit = false;
        let lower = symbol.to_lowercase();

        // 1. File match: every node registered under that source file.
        if symbol.ends_with(&config.file_suffix) {
            for &entry in index.entries_for_file(symbol) {
                push_seed(&mut resolution.seed_ids, &mut seen_ids, &index.node(entry).id);
                hit = true;
                resolution.file_matched = true;
            }
        }

        // 2. Exact name, original case.
        for &entry in index.entries_for_name(symbol) {
            push_seed(&mut resolution.seed_ids, &mut seen_ids, &index.node(entry).id);
            hit = true;
        }

        // 3. Exact name, lower-cased.
        if lower != *symbol {
            for &entry in index.entries_for_name(&lower) {
                push_seed(&mut resolution.seed_ids, &mut seen_ids, &index.node(entry).id);
                hit = true;
            }
        }

        // 4. Bidirectional substring over registered names: a short symbol
        // picks up names containing it, and a long path-like symbol picks
        // up the short names it contains. Gated on symbol length to keep
        // common short words from over-matching.
        if symbol.chars().count() >= config.min_substring_len {
            for name in index.names() {
                let name_lower = name.to_lowercase();
                if name_lower.contains(&lower) || lower.contains(&name_lower) {
                    for &entry in index.entries_for_name(name) {
                        push_seed(&mut resolution.seed_ids, &mut seen_ids, &index.node(entry).id);
                        hit = true;
                    }
                }
            }
        }

        // 5. Direct id match.
        if index.contains_id(symbol) {
            push_seed(&mut resolution.seed_ids, &mut seen_ids, symbol);
            hit = true;
        }

        if hit && seen_symbols.insert(symbol.as_str()) {
            resolution.matched_symbols.push(symbol.clone());
        }
    }

    log::debug!(
        "resolved {} symbols to {} seed nodes ({} matched)",
        symbols.len(),
        resolution.seed_ids.len(),
        resolution.matched_symbols.len()
    );

    resolution
}

fn push_seed(seed_ids: &mut Vec<String>, seen: &mut HashSet<String>, id: &str) {
    if seen.insert(id.to_string()) {
        seed_ids.push(id.to_string());
    }
}
