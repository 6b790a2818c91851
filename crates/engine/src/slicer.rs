use crate::assembler::ContextAssembler;
use crate::closure::close_dependencies;
use crate::config::SliceConfig;
use crate::document::SourceDocument;
use crate::index::DocumentIndex;
use crate::resolver::resolve_symbols;
use crate::snapshot::SnapshotWriter;
use crate::types::ContextResult;

/// End-to-end slicing pipeline: index, resolve, close, assemble,
/// snapshot.
///
/// One `slice` call runs to completion synchronously with no shared
/// state; concurrent requests each build their own index. The snapshot
/// write is compute-then-write: a failed write is logged and the
/// computed result is still returned, with `saved_to` left unset.
pub struct ContextSlicer {
    config: SliceConfig,
}

impl ContextSlicer {
    pub fn new(config: SliceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SliceConfig {
        &self.config
    }

    pub fn slice(&self, document: &SourceDocument, symbols: &[String]) -> ContextResult {
        let index = DocumentIndex::build(document);
        log::debug!(
            "indexed {} nodes ({} named) in {} ms",
            index.stats().nodes,
            index.stats().named,
            index.stats().time_ms
        );

        let resolution = resolve_symbols(symbols, &index, &self.config);
        let context_ids =
            close_dependencies(&resolution.seed_ids, &index, document, &self.config);
        let mut result =
            ContextAssembler::new(document, &index).assemble(&context_ids, &resolution, symbols);

        if self.config.snapshot {
            let writer = SnapshotWriter::new(&self.config.output_dir);
            match writer.write(&result) {
                Ok(path) => {
                    log::info!("context saved to {}", path.display());
                    result.saved_to = Some(path.display().to_string());
                }
                Err(err) => {
                    // The computed result outlives a failed write.
                    log::warn!("snapshot write failed: {err}");
                }
            }
        }

        log::info!(
            "found {} nodes for {} symbol(s)",
            result.metadata.nodes_found,
            symbols.len()
        );
        result
    }
}

impl Default for ContextSlicer {
    fn default() -> Self {
        Self::new(SliceConfig::default())
    }
}
