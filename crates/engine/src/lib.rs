//! # AST Slice Engine
//!
//! Contextual slicing over tree-shaped AST documents: given a parsed
//! program and a handful of symbol names, return the
//! minimal-but-complete subgraph needed to understand those symbols.
//!
//! ## Pipeline
//!
//! ```text
//! SourceDocument (serde_json tree)
//!     │
//!     ├──> Document Index (one pre-order walk)
//!     │      ├─ id → node (synthesized ids for anonymous nodes)
//!     │      ├─ name → nodes (case-insensitive, duplicates kept)
//!     │      ├─ kind → nodes
//!     │      └─ source file → nodes (inherited from ancestors)
//!     │
//!     ├──> Symbol Resolver (layered: file / exact / substring / id)
//!     │      └─ seed ids + matched symbols
//!     │
//!     ├──> Dependency Closure (worklist BFS + relationship reverse pass)
//!     │      └─ full context id set
//!     │
//!     ├──> Context Assembler
//!     │      ├─ closure nodes
//!     │      ├─ filtered endpoint / relationship registries
//!     │      └─ project metadata
//!     │
//!     └──> Snapshot Writer (timestamped JSON artifact)
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use astslice_engine::{ContextSlicer, SliceConfig, SourceDocument};
//! use std::path::Path;
//!
//! fn main() -> astslice_engine::Result<()> {
//!     let document = SourceDocument::load(Path::new("ast.json"))?;
//!     let slicer = ContextSlicer::new(SliceConfig::default());
//!     let result = slicer.slice(&document, &["deleteUser".to_string()]);
//!
//!     println!("found {} nodes", result.metadata.nodes_found);
//!     Ok(())
//! }
//! ```

mod assembler;
mod closure;
mod config;
mod document;
mod error;
mod index;
mod resolver;
mod slicer;
mod snapshot;
mod stats;
mod types;

pub use assembler::ContextAssembler;
pub use closure::{close_dependencies, DEPENDENCY_KEYS};
pub use config::{AmbiguityPolicy, SliceConfig};
pub use document::{EndpointEntry, RelationshipEntry, SourceDocument};
pub use error::{Result, SliceError};
pub use index::{DocumentIndex, IndexedNode};
pub use resolver::{resolve_symbols, Resolution};
pub use slicer::ContextSlicer;
pub use snapshot::SnapshotWriter;
pub use stats::IndexStats;
pub use types::{ContextMetadata, ContextResult};
