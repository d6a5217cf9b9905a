use std::sync::Arc;

use crate::config::Config;
use crate::db::FactStore;
use crate::embeddings::EmbeddingProvider;
use crate::intelligence::utils::is_storage_command;
use crate::intelligence::{ExtractionPipeline, NumericConflictDetector, SurfacingOrchestrator};
use crate::models::{AugmentedPrompt, SurfacedContext, TurnOutcome};

/// Entry point the host calls once per user utterance.
///
/// Every method degrades instead of failing: a broken store surfaces nothing,
/// an absent embedding model leaves the deterministic extractors in charge.
pub struct MemoryCore {
    store: Arc<dyn FactStore>,
    orchestrator: SurfacingOrchestrator,
    pipeline: ExtractionPipeline,
    detector: NumericConflictDetector,
    storage_prefix: String,
}

impl MemoryCore {
    pub fn new(config: &Config, store: Arc<dyn FactStore>, embeddings: EmbeddingProvider) -> Self {
        let pipeline = ExtractionPipeline::new(
            Arc::clone(&store),
            &config.extraction,
            &config.embeddings,
            embeddings,
        );

        Self {
            orchestrator: SurfacingOrchestrator::new(
                &config.guard,
                &config.surfacing,
                &config.extraction.storage_prefix,
            ),
            detector: NumericConflictDetector::new(&config.conflict, &config.guard),
            storage_prefix: config.extraction.storage_prefix.clone(),
            pipeline,
            store,
        }
    }

    /// Whether `text` starts with the configured storage prefix.
    pub fn is_storage_command(&self, text: &str) -> bool {
        is_storage_command(text, &self.storage_prefix)
    }

    /// Store a storage command, or surface facts for anything else.
    pub async fn handle_turn(&self, raw_text: &str) -> TurnOutcome {
        if self.is_storage_command(raw_text) {
            TurnOutcome::Stored(self.pipeline.extract(raw_text).await)
        } else {
            TurnOutcome::Surfaced(self.surface(raw_text).await)
        }
    }

    pub async fn surface(&self, query: &str) -> SurfacedContext {
        if self.is_storage_command(query) {
            return SurfacedContext::empty();
        }

        match self.store.iterate_nodes().await {
            Ok(nodes) => self.orchestrator.surface(query, &nodes),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read fact store, surfacing nothing");
                SurfacedContext::empty()
            }
        }
    }

    /// Conflict check first, then surfacing; the generator sees
    /// `surfaced facts + conflict warning + prompt`.
    pub async fn prepare_generation(&self, prompt: &str) -> AugmentedPrompt {
        let conflicts = self.detector.check_conflicts(self.store.as_ref(), prompt).await;
        let surfaced = self.surface(prompt).await;

        let mut text = String::with_capacity(
            surfaced.text.len() + conflicts.warning.len() + prompt.len() + 1,
        );
        text.push_str(&surfaced.text);
        if conflicts.has_conflicts() {
            text.push_str(conflicts.warning.trim_end());
            text.push('\n');
        }
        text.push_str(prompt);

        tracing::debug!(
            surfaced = surfaced.facts.len(),
            conflicts = conflicts.count,
            "Generation prompt prepared"
        );

        AugmentedPrompt {
            text,
            surfaced,
            conflicts,
        }
    }
}
