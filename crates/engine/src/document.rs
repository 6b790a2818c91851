use crate::error::{Result, SliceError};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// One entry of the document's relationship registry.
///
/// `from`/`to` may be node ids or plain names; resolution happens
/// downstream. Entries with missing endpoints are kept (the raw value is
/// still reportable) but never contribute to the closure.
#[derive(Debug, Clone)]
pub struct RelationshipEntry<'a> {
    pub key: &'a str,
    pub from: Option<&'a str>,
    pub to: Option<&'a str>,
    pub kind: Option<&'a str>,
    pub raw: &'a Value,
}

/// One entry of the document's endpoint registry.
#[derive(Debug, Clone)]
pub struct EndpointEntry<'a> {
    pub key: &'a str,
    pub entity: Option<&'a str>,
    pub operations: Vec<&'a str>,
    pub raw: &'a Value,
}

/// An already-parsed tree-shaped AST document.
///
/// The document is loaded once per request and never mutated; every
/// component borrows it. Shape expectations are lenient: registries and
/// metadata blocks that are absent simply read as empty.
#[derive(Debug)]
pub struct SourceDocument {
    root: Value,
}

impl SourceDocument {
    /// Load and parse the document from disk.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SliceError::DocumentNotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path)?;
        let root = serde_json::from_str(&text)?;
        Ok(Self { root })
    }

    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Subtree the indexer walks: the top-level `modules` sequence when
    /// present, otherwise the whole root.
    pub fn index_root(&self) -> &Value {
        self.root
            .get("modules")
            .filter(|v| v.is_array())
            .unwrap_or(&self.root)
    }

    pub fn relationships(&self) -> Vec<RelationshipEntry<'_>> {
        self.dependency_graph_table("relationships")
            .map(|table| {
                table
                    .iter()
                    .map(|(key, raw)| RelationshipEntry {
                        key,
                        from: raw.get("from").and_then(Value::as_str),
                        to: raw.get("to").and_then(Value::as_str),
                        kind: raw.get("type").and_then(Value::as_str),
                        raw,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn endpoints(&self) -> Vec<EndpointEntry<'_>> {
        self.dependency_graph_table("endpoints")
            .map(|table| {
                table
                    .iter()
                    .map(|(key, raw)| EndpointEntry {
                        key,
                        entity: raw.get("entity").and_then(Value::as_str),
                        operations: raw
                            .get("operations")
                            .and_then(Value::as_array)
                            .map(|ops| ops.iter().filter_map(Value::as_str).collect())
                            .unwrap_or_default(),
                        raw,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn source_files(&self) -> Value {
        self.root
            .pointer("/project_structure/source_files")
            .cloned()
            .unwrap_or_else(|| Value::Array(Vec::new()))
    }

    pub fn imports(&self) -> Value {
        self.root
            .pointer("/ast/imports")
            .cloned()
            .unwrap_or_else(|| Value::Array(Vec::new()))
    }

    pub fn dependencies(&self) -> Value {
        self.root
            .pointer("/project_structure/dependencies")
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()))
    }

    fn dependency_graph_table(&self, name: &str) -> Option<&Map<String, Value>> {
        self.root.get("dependency_graph")?.get(name)?.as_object()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_document_is_a_structured_error() {
        let err = SourceDocument::load(Path::new("/nonexistent/ast.json")).unwrap_err();
        assert!(matches!(err, SliceError::DocumentNotFound(_)));
        assert!(err.to_string().contains("/nonexistent/ast.json"));
    }

    #[test]
    fn registries_default_to_empty() {
        let doc = SourceDocument::from_value(json!({"modules": []}));
        assert!(doc.relationships().is_empty());
        assert!(doc.endpoints().is_empty());
        assert_eq!(doc.source_files(), json!([]));
        assert_eq!(doc.imports(), json!([]));
        assert_eq!(doc.dependencies(), json!({}));
    }

    #[test]
    fn relationship_entries_read_leniently() {
        let doc = SourceDocument::from_value(json!({
            "dependency_graph": {
                "relationships": {
                    "r1": {"from": "fn_a", "to": "fn_b", "type": "calls"},
                    "r2": {"from": "fn_c"}
                }
            }
        }));
        let rels = doc.relationships();
        assert_eq!(rels.len(), 2);
        let r1 = rels.iter().find(|r| r.key == "r1").unwrap();
        assert_eq!(r1.from, Some("fn_a"));
        assert_eq!(r1.to, Some("fn_b"));
        assert_eq!(r1.kind, Some("calls"));
        let r2 = rels.iter().find(|r| r.key == "r2").unwrap();
        assert_eq!(r2.to, None);
    }

    #[test]
    fn index_root_prefers_modules() {
        let doc = SourceDocument::from_value(json!({"modules": [{"id": "m0"}]}));
        assert!(doc.index_root().is_array());

        let flat = SourceDocument::from_value(json!({"id": "root"}));
        assert!(flat.index_root().is_object());
    }
}
