use crate::document::SourceDocument;
use crate::index::DocumentIndex;
use crate::resolver::Resolution;
use crate::types::{ContextMetadata, ContextResult};
use serde_json::Map;
use std::collections::HashSet;

/// Gathers closure nodes and the document side tables into one
/// [`ContextResult`].
pub struct ContextAssembler<'a> {
    document: &'a SourceDocument,
    index: &'a DocumentIndex<'a>,
}

impl<'a> ContextAssembler<'a> {
    pub fn new(document: &'a SourceDocument, index: &'a DocumentIndex<'a>) -> Self {
        Self { document, index }
    }

    /// Project the closure back onto nodes and filter the endpoint and
    /// relationship registries down to the slice. Missing optional
    /// metadata never fails the operation.
    pub fn assemble(
        &self,
        context_ids: &[String],
        resolution: &Resolution,
        symbols: &[String],
    ) -> ContextResult {
        // Ids that fail to project are dropped defensively; the closure
        // only admits index-known ids, so this should not occur.
        let nodes: Vec<serde_json::Value> = context_ids
            .iter()
            .filter_map(|id| self.index.get(id))
            .map(|node| node.value.clone())
            .collect();

        let id_set: HashSet<&str> = context_ids.iter().map(String::as_str).collect();
        let matched: HashSet<&str> = resolution
            .matched_symbols
            .iter()
            .map(String::as_str)
            .collect();

        let mut endpoints = Map::new();
        for ep in self.document.endpoints() {
            let entity_hit = ep.entity.is_some_and(|entity| matched.contains(entity));
            let operation_hit = ep.operations.iter().any(|op| matched.contains(op));
            let id_hit = id_set.contains(ep.key);
            if entity_hit || operation_hit || id_hit {
                endpoints.insert(ep.key.to_string(), ep.raw.clone());
            }
        }

        let mut relationships = Map::new();
        for rel in self.document.relationships() {
            let from_hit = rel.from.is_some_and(|r| self.reference_in_closure(r, &id_set));
            let to_hit = rel.to.is_some_and(|r| self.reference_in_closure(r, &id_set));
            if from_hit || to_hit {
                relationships.insert(rel.key.to_string(), rel.raw.clone());
            }
        }

        let strategy = if resolution.file_matched {
            "file-based"
        } else {
            "symbol-based"
        };

        ContextResult {
            symbols: symbols.to_vec(),
            matched_symbols: resolution.matched_symbols.clone(),
            metadata: ContextMetadata {
                source_files: self.document.source_files(),
                imports: self.document.imports(),
                dependencies: self.document.dependencies(),
                nodes_found: nodes.len(),
                strategy: strategy.to_string(),
            },
            nodes,
            endpoints: (!endpoints.is_empty()).then_some(endpoints),
            relationships: (!relationships.is_empty()).then_some(relationships),
            saved_to: None,
        }
    }

    /// A registry reference intersects the closure when it is a closure
    /// id, or a name whose nodes include one.
    fn reference_in_closure(&self, reference: &str, id_set: &HashSet<&str>) -> bool {
        if id_set.contains(reference) {
            return true;
        }
        self.index
            .entries_for_name(reference)
            .iter()
            .any(|&entry| id_set.contains(self.index.node(entry).id.as_str()))
    }
}
