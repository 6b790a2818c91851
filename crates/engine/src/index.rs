use crate::document::SourceDocument;
use crate::stats::IndexStats;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::time::Instant;

/// Field names that associate a node with a source file.
const FILE_KEYS: &[&str] = &["sourceFile", "source_file", "file"];

/// One indexed node: the borrowed subtree plus the attributes every
/// lookup table keys on.
#[derive(Debug, Clone)]
pub struct IndexedNode<'a> {
    /// Stable id: the node's own `id` field, or a synthesized path id.
    pub id: String,
    pub name: Option<String>,
    pub kind: Option<String>,
    pub source_file: Option<String>,
    pub value: &'a Value,
}

/// Lookup tables over one document, rebuilt per request.
///
/// The index is a pure side table: it borrows subtrees and never writes
/// anything back into the document. Nodes without an `id` field get a
/// deterministic path-derived id (`parent.field` / `parent.field.N`), so
/// re-indexing the same document yields the same ids.
pub struct DocumentIndex<'a> {
    nodes: Vec<IndexedNode<'a>>,
    by_id: HashMap<String, usize>,
    by_name: HashMap<String, Vec<usize>>,
    by_kind: HashMap<String, Vec<usize>>,
    by_file: HashMap<String, Vec<usize>>,
    /// Distinct original-case names in traversal order. Keeps substring
    /// matching deterministic instead of following hash-map order.
    /// Tracked separately from `by_name`, which also holds lower-cased
    /// aliases that must not shadow a genuine name.
    name_order: Vec<String>,
    name_seen: HashSet<String>,
    stats: IndexStats,
}

impl<'a> DocumentIndex<'a> {
    /// Walk the document once and build all lookup tables.
    pub fn build(document: &'a SourceDocument) -> Self {
        let started = Instant::now();
        let mut index = Self {
            nodes: Vec::new(),
            by_id: HashMap::new(),
            by_name: HashMap::new(),
            by_kind: HashMap::new(),
            by_file: HashMap::new(),
            name_order: Vec::new(),
            name_seen: HashSet::new(),
            stats: IndexStats::default(),
        };

        let root = document.index_root();
        match root {
            Value::Array(_) => index.visit(root, "modules", None),
            other => index.visit(other, "root", None),
        }

        index.stats.nodes = index.nodes.len();
        index.stats.named = index.nodes.iter().filter(|n| n.name.is_some()).count();
        index.stats.kinds = index.by_kind.len();
        index.stats.files = index.by_file.len();
        index.stats.time_ms = started.elapsed().as_millis() as u64;
        index
    }

    /// Pre-order traversal. Objects become nodes; sequences are walked
    /// element-wise; scalars are leaves. Fields with a leading underscore
    /// are bookkeeping and are not entered.
    fn visit(&mut self, value: &'a Value, ctx_id: &str, inherited_file: Option<&str>) {
        match value {
            Value::Object(map) => {
                let id = map
                    .get("id")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| ctx_id.to_string());
                let name = map
                    .get("name")
                    .and_then(Value::as_str)
                    .filter(|n| !n.is_empty())
                    .map(str::to_string);
                let kind = map
                    .get("kind")
                    .and_then(Value::as_str)
                    .or_else(|| map.get("type").and_then(Value::as_str))
                    .map(str::to_string);
                let source_file = FILE_KEYS
                    .iter()
                    .find_map(|key| map.get(*key).and_then(Value::as_str))
                    .or(inherited_file)
                    .map(str::to_string);

                let entry = self.nodes.len();
                // Last write wins on id collisions; synthesized ids cannot
                // collide, but a malformed document must not crash us.
                self.by_id.insert(id.clone(), entry);
                if let Some(name) = &name {
                    self.register_name(name, entry);
                }
                if let Some(kind) = &kind {
                    self.by_kind.entry(kind.clone()).or_default().push(entry);
                }
                if let Some(file) = &source_file {
                    self.by_file.entry(file.clone()).or_default().push(entry);
                }

                self.nodes.push(IndexedNode {
                    id: id.clone(),
                    name,
                    kind,
                    source_file: source_file.clone(),
                    value,
                });

                for (key, child) in map {
                    if key.starts_with('_') {
                        continue;
                    }
                    if child.is_object() || child.is_array() {
                        self.visit(child, &format!("{id}.{key}"), source_file.as_deref());
                    }
                }
            }
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if item.is_object() || item.is_array() {
                        self.visit(item, &format!("{ctx_id}.{i}"), inherited_file);
                    }
                }
            }
            _ => {}
        }
    }

    fn register_name(&mut self, name: &str, entry: usize) {
        if self.name_seen.insert(name.to_string()) {
            self.name_order.push(name.to_string());
        }
        self.by_name.entry(name.to_string()).or_default().push(entry);
        let lower = name.to_lowercase();
        if lower != name {
            self.by_name.entry(lower).or_default().push(entry);
        }
    }

    pub fn get(&self, id: &str) -> Option<&IndexedNode<'a>> {
        self.by_id.get(id).map(|&entry| &self.nodes[entry])
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn node(&self, entry: usize) -> &IndexedNode<'a> {
        &self.nodes[entry]
    }

    pub fn nodes(&self) -> &[IndexedNode<'a>] {
        &self.nodes
    }

    /// Entries registered under a name, original case or lower-cased.
    pub fn entries_for_name(&self, name: &str) -> &[usize] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn entries_for_kind(&self, kind: &str) -> &[usize] {
        self.by_kind.get(kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn entries_for_file(&self, file: &str) -> &[usize] {
        self.by_file.get(file).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Distinct original-case names in traversal order.
    pub fn names(&self) -> &[String] {
        &self.name_order
    }

    pub fn stats(&self) -> &IndexStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
