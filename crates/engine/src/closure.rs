use crate::config::{AmbiguityPolicy, SliceConfig};
use crate::document::SourceDocument;
use crate::index::DocumentIndex;
use serde_json::Value;
use std::collections::{HashSet, VecDeque};

/// Field names whose values reference other nodes by id.
pub const DEPENDENCY_KEYS: &[&str] = &[
    "resolvesTo",
    "typeResolvesTo",
    "usesVariables",
    "usesFunctions",
    "usesTypes",
    "dependsOn",
    "calls",
    "accesses",
    "contains",
];

/// Compute the full closure id set: seeds, forward transitive
/// dependencies, and reverse dependencies.
///
/// The forward pass is a worklist BFS, not recursion over the id graph:
/// each id is enqueued at most once and the set grows monotonically,
/// bounded by the node count, so termination is guaranteed even with
/// reference cycles. Dangling references are ignored.
///
/// The reverse pass walks the relationship registry: a seed on either end
/// pulls in the opposite end. With `deep_reverse` enabled, every indexed
/// node is additionally scanned for raw string mentions of a seed id.
///
/// Returns ids in discovery order (seeds first); order is deterministic
/// but not part of the contract.
pub fn close_dependencies(
    seeds: &[String],
    index: &DocumentIndex<'_>,
    document: &SourceDocument,
    config: &SliceConfig,
) -> Vec<String> {
    let mut context: Vec<String> = Vec::new();
    let mut member: HashSet<String> = HashSet::new();
    let mut worklist: VecDeque<String> = VecDeque::new();

    for id in seeds {
        if member.insert(id.clone()) {
            context.push(id.clone());
            worklist.push_back(id.clone());
        }
    }

    // Forward pass.
    while let Some(id) = worklist.pop_front() {
        let Some(node) = index.get(&id) else { continue };
        let mut referenced = Vec::new();
        collect_dependency_ids(node.value, &mut referenced);
        for dep in referenced {
            if index.contains_id(&dep) && member.insert(dep.clone()) {
                context.push(dep.clone());
                worklist.push_back(dep);
            }
        }
    }

    // Reverse pass over the relationship registry. Both endpoints may be
    // ids or names; "in the seed set" means "resolves onto a seed id".
    let seed_set: HashSet<&str> = seeds.iter().map(String::as_str).collect();
    for rel in document.relationships() {
        let (Some(from_raw), Some(to_raw)) = (rel.from, rel.to) else {
            continue;
        };
        reverse_pull(from_raw, to_raw, &seed_set, index, config, &mut context, &mut member);
        reverse_pull(to_raw, from_raw, &seed_set, index, config, &mut context, &mut member);
    }

    if config.deep_reverse {
        for node in index.nodes() {
            if value_mentions(node.value, &seed_set) && member.insert(node.id.clone()) {
                context.push(node.id.clone());
            }
        }
    }

    log::debug!(
        "closure: {} seeds grew to {} context nodes",
        seeds.len(),
        context.len()
    );

    context
}

/// If `anchor_raw` denotes a seed, add whatever `other_raw` resolves to.
///
/// The anchor side is a membership test, not a resolution: when the
/// anchor is an ambiguous name, every node it could denote is checked
/// against the seed set, so a relationship anchored on a non-first
/// duplicate still fires.
#[allow(clippy::too_many_arguments)]
fn reverse_pull(
    anchor_raw: &str,
    other_raw: &str,
    seed_set: &HashSet<&str>,
    index: &DocumentIndex<'_>,
    config: &SliceConfig,
    context: &mut Vec<String>,
    member: &mut HashSet<String>,
) {
    let Some(anchor_id) = candidate_ids(anchor_raw, index)
        .into_iter()
        .find(|id| seed_set.contains(id.as_str()))
    else {
        return;
    };
    let anchor_file = index
        .get(&anchor_id)
        .and_then(|node| node.source_file.clone());
    if let Some(other_id) = resolve_reference(other_raw, index, config, anchor_file.as_deref()) {
        if member.insert(other_id.clone()) {
            context.push(other_id);
        }
    }
}

/// Every id a relationship endpoint could denote: the id itself, or all
/// nodes registered under that name (original case, then lower-cased).
fn candidate_ids(reference: &str, index: &DocumentIndex<'_>) -> Vec<String> {
    if index.contains_id(reference) {
        return vec![reference.to_string()];
    }
    let mut entries = index.entries_for_name(reference);
    if entries.is_empty() {
        entries = index.entries_for_name(&reference.to_lowercase());
    }
    entries
        .iter()
        .map(|&entry| index.node(entry).id.clone())
        .collect()
}

/// Resolve a relationship endpoint to a single node id. Ambiguous names
/// are settled by the configured policy; `prefer_file` is the source
/// file of the opposite endpoint.
fn resolve_reference(
    reference: &str,
    index: &DocumentIndex<'_>,
    config: &SliceConfig,
    prefer_file: Option<&str>,
) -> Option<String> {
    let candidates = candidate_ids(reference, index);
    if config.ambiguity == AmbiguityPolicy::PreferSameFile {
        if let Some(file) = prefer_file {
            if let Some(id) = candidates.iter().find(|id| {
                index
                    .get(id.as_str())
                    .and_then(|node| node.source_file.as_deref())
                    == Some(file)
            }) {
                return Some(id.clone());
            }
        }
    }
    candidates.into_iter().next()
}

/// Gather every id referenced through a dependency-bearing field,
/// anywhere in the node's subtree. Values are a single id string or a
/// sequence of id strings; anything else under a dependency key is
/// ignored.
fn collect_dependency_ids(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if key.starts_with('_') {
                    continue;
                }
                if DEPENDENCY_KEYS.contains(&key.as_str()) {
                    match child {
                        Value::String(id) => out.push(id.clone()),
                        Value::Array(items) => {
                            out.extend(items.iter().filter_map(Value::as_str).map(str::to_string));
                        }
                        _ => {}
                    }
                }
                collect_dependency_ids(child, out);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_dependency_ids(item, out);
            }
        }
        _ => {}
    }
}

/// True when any nested string value (outside bookkeeping fields) is one
/// of the target ids.
fn value_mentions(value: &Value, targets: &HashSet<&str>) -> bool {
    match value {
        Value::String(s) => targets.contains(s.as_str()),
        Value::Object(map) => map
            .iter()
            .any(|(key, child)| !key.starts_with('_') && value_mentions(child, targets)),
        Value::Array(items) => items.iter().any(|item| value_mentions(item, targets)),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn close(doc: &SourceDocument, seeds: &[&str], config: &SliceConfig) -> Vec<String> {
        let index = DocumentIndex::build(doc);
        let seeds: Vec<String> = seeds.iter().map(|s| s.to_string()).collect();
        close_dependencies(&seeds, &index, doc, config)
    }

    #[test]
    fn forward_closure_follows_dependency_keys_transitively() {
        let doc = SourceDocument::from_value(json!({
            "modules": [
                {"id": "fn_a", "name": "foo", "body": {"resolvesTo": "type_b"}},
                {"id": "type_b", "name": "Bar", "usesTypes": ["type_c"]},
                {"id": "type_c", "name": "Baz"}
            ]
        }));
        let ids = close(&doc, &["fn_a"], &SliceConfig::default());
        assert_eq!(ids, ["fn_a", "type_b", "type_c"]);
    }

    #[test]
    fn closure_contains_seeds_and_dangling_references_are_ignored() {
        let doc = SourceDocument::from_value(json!({
            "modules": [
                {"id": "fn_a", "name": "foo", "resolvesTo": "no_such_node"}
            ]
        }));
        let ids = close(&doc, &["fn_a"], &SliceConfig::default());
        assert_eq!(ids, ["fn_a"]);
    }

    #[test]
    fn cycles_terminate() {
        let doc = SourceDocument::from_value(json!({
            "modules": [
                {"id": "fn_a", "calls": "fn_b"},
                {"id": "fn_b", "calls": "fn_a"}
            ]
        }));
        let ids = close(&doc, &["fn_a"], &SliceConfig::default());
        assert_eq!(ids, ["fn_a", "fn_b"]);
    }

    #[test]
    fn reverse_pass_pulls_the_opposite_relationship_endpoint() {
        let doc = SourceDocument::from_value(json!({
            "modules": [
                {"id": "fn_a", "name": "caller"},
                {"id": "fn_c", "name": "callee"}
            ],
            "dependency_graph": {
                "relationships": {
                    "r1": {"from": "fn_a", "to": "fn_c", "type": "calls"}
                }
            }
        }));
        // Seed on the `to` side pulls in `from` (who depends on me).
        let ids = close(&doc, &["fn_c"], &SliceConfig::default());
        assert!(ids.contains(&"fn_a".to_string()));

        // Symmetric: seed on the `from` side pulls in `to`.
        let ids = close(&doc, &["fn_a"], &SliceConfig::default());
        assert!(ids.contains(&"fn_c".to_string()));
    }

    #[test]
    fn relationship_names_fall_back_to_the_name_index() {
        let doc = SourceDocument::from_value(json!({
            "modules": [
                {"id": "fn_a", "name": "caller"},
                {"id": "fn_c", "name": "callee"}
            ],
            "dependency_graph": {
                "relationships": {
                    "r1": {"from": "caller", "to": "callee"}
                }
            }
        }));
        let ids = close(&doc, &["fn_c"], &SliceConfig::default());
        assert!(ids.contains(&"fn_a".to_string()));
    }

    #[test]
    fn anchor_names_match_any_duplicate_in_the_seed_set() {
        // "handler" denotes both h1 and h2; seeding the second duplicate
        // must still fire the relationship and pull in the caller.
        let doc = SourceDocument::from_value(json!({
            "modules": [
                {"id": "h1", "name": "handler", "sourceFile": "a.bal"},
                {"id": "h2", "name": "handler", "sourceFile": "b.bal"},
                {"id": "fn_x", "name": "caller"}
            ],
            "dependency_graph": {
                "relationships": {
                    "r1": {"from": "caller", "to": "handler"}
                }
            }
        }));
        let ids = close(&doc, &["h2"], &SliceConfig::default());
        assert!(ids.contains(&"fn_x".to_string()));
    }

    #[test]
    fn ambiguous_names_can_prefer_the_anchors_source_file() {
        let doc = SourceDocument::from_value(json!({
            "modules": [
                {"id": "h1", "name": "handler", "sourceFile": "a.bal"},
                {"id": "h2", "name": "handler", "sourceFile": "b.bal"},
                {"id": "fn_c", "name": "callee", "sourceFile": "b.bal"}
            ],
            "dependency_graph": {
                "relationships": {
                    "r1": {"from": "handler", "to": "fn_c"}
                }
            }
        }));

        let first = close(&doc, &["fn_c"], &SliceConfig::default());
        assert!(first.contains(&"h1".to_string()));

        let config = SliceConfig {
            ambiguity: AmbiguityPolicy::PreferSameFile,
            ..SliceConfig::default()
        };
        let same_file = close(&doc, &["fn_c"], &config);
        assert!(same_file.contains(&"h2".to_string()));
    }

    #[test]
    fn deep_reverse_finds_mentions_outside_dependency_keys() {
        let doc = SourceDocument::from_value(json!({
            "modules": [
                {"id": "fn_a", "name": "target"},
                {"id": "fn_b", "annotations": {"ref": "fn_a"}}
            ]
        }));

        let plain = close(&doc, &["fn_a"], &SliceConfig::default());
        assert!(!plain.contains(&"fn_b".to_string()));

        let config = SliceConfig {
            deep_reverse: true,
            ..SliceConfig::default()
        };
        let deep = close(&doc, &["fn_a"], &config);
        assert!(deep.contains(&"fn_b".to_string()));
    }

    #[test]
    fn closure_is_idempotent_and_monotone() {
        let doc = SourceDocument::from_value(json!({
            "modules": [
                {"id": "fn_a", "dependsOn": ["type_b", "type_c"]},
                {"id": "type_b"},
                {"id": "type_c", "usesTypes": ["type_b"]}
            ]
        }));
        let seeds = ["fn_a"];
        let a = close(&doc, &seeds, &SliceConfig::default());
        let b = close(&doc, &seeds, &SliceConfig::default());
        assert_eq!(a, b);
        for seed in seeds {
            assert!(a.contains(&seed.to_string()));
        }
    }
}
