use std::sync::Arc;

use super::{FactExtractor, FallbackExtractor, PatternExtractor, SemanticEdgeExtractor};
use crate::config::{EmbeddingsConfig, ExtractionConfig};
use crate::db::FactStore;
use crate::embeddings::EmbeddingProvider;
use crate::intelligence::utils::strip_storage_prefix;
use crate::models::{ExtractionResult, NewNode};

/// Turns a storage command into persisted nodes.
///
/// Structured extractors run additively; the fallback runs only when they
/// created nothing. Failures of a single extractor or a single write are
/// logged and skipped, never propagated.
pub struct ExtractionPipeline {
    store: Arc<dyn FactStore>,
    storage_prefix: String,
    extractors: Vec<Box<dyn FactExtractor>>,
    fallback: FallbackExtractor,
}

impl ExtractionPipeline {
    pub fn new(
        store: Arc<dyn FactStore>,
        extraction: &ExtractionConfig,
        embeddings_config: &EmbeddingsConfig,
        embeddings: EmbeddingProvider,
    ) -> Self {
        let mut extractors: Vec<Box<dyn FactExtractor>> =
            vec![Box::new(PatternExtractor::new(extraction))];

        if embeddings.is_available() {
            extractors.push(Box::new(SemanticEdgeExtractor::new(
                embeddings,
                extraction,
                embeddings_config,
            )));
        } else {
            tracing::info!(
                reason = embeddings.unavailable_reason().unwrap_or("unknown"),
                "Embedding model unavailable, semantic edge extraction disabled"
            );
        }

        Self {
            store,
            storage_prefix: extraction.storage_prefix.clone(),
            extractors,
            fallback: FallbackExtractor::new(extraction),
        }
    }

    /// Names of the structured extractors in run order.
    pub fn extractor_names(&self) -> Vec<&'static str> {
        self.extractors.iter().map(|e| e.name()).collect()
    }

    pub async fn extract(&self, text: &str) -> ExtractionResult {
        let value = match strip_storage_prefix(text, &self.storage_prefix) {
            Some(value) => value,
            None => {
                tracing::debug!("Extraction called without storage prefix");
                text.trim_start()
            }
        };

        let mut result = ExtractionResult::empty();

        for extractor in &self.extractors {
            match extractor.extract(value).await {
                Ok(nodes) => self.persist(nodes, extractor.name(), &mut result).await,
                Err(e) if e.is_unavailable() => {
                    tracing::debug!(extractor = extractor.name(), error = %e, "Extractor skipped");
                }
                Err(e) => {
                    tracing::warn!(extractor = extractor.name(), error = %e, "Extractor failed");
                }
            }
        }

        if result.facts_created == 0 {
            match self.fallback.extract(value).await {
                Ok(nodes) => {
                    self.persist(nodes, self.fallback.name(), &mut result).await;
                    result.used_fallback = result.facts_created > 0;
                }
                Err(e) => tracing::warn!(error = %e, "Fallback extraction failed"),
            }
        }

        tracing::info!(
            facts_created = result.facts_created,
            used_fallback = result.used_fallback,
            "Extraction complete"
        );
        result
    }

    async fn persist(&self, nodes: Vec<NewNode>, source: &str, result: &mut ExtractionResult) {
        for node in nodes {
            let label = node.label.clone();
            match self.store.create_node(node).await {
                Ok(created) => {
                    tracing::debug!(label = %created.label, kind = %created.kind, source, "Node created");
                    result.facts_created += 1;
                    result.nodes.push(created);
                }
                Err(e) => {
                    tracing::warn!(label = %label, source, error = %e, "Failed to persist node");
                }
            }
        }
    }
}
