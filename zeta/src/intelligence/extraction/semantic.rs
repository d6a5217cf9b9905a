use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;

use super::pattern::causal_edge;
use super::{split_clauses, FactExtractor};
use crate::config::{EmbeddingsConfig, ExtractionConfig};
use crate::embeddings::{cosine_similarity, EmbeddingProvider};
use crate::error::Result;
use crate::models::NewNode;

/// Connectives that only sometimes express causation. Ones listed in
/// `CAUSE_FIRST` put the cause on the left.
const SOFT_CAUSAL_PATTERN: &str = r"(?i)^(.+?),?\s+(due\s+to|thanks\s+to|as\s+a\s+result|which\s+is\s+why|therefore|hence|since|so)\s*,?\s+(.+)$";

const CAUSE_FIRST: &[&str] = &["as a result", "which is why", "therefore", "hence", "so"];

/// Reference sentences describing a cause and its effect.
const CAUSAL_PROTOTYPES: &[&str] = &[
    "this happened because of that reason",
    "the cause produced the effect as a result",
    "it failed due to the problem",
    "the delay was caused by the storm so the trip was cancelled",
    "he was tired therefore he went to sleep early",
];

fn soft_causal_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(SOFT_CAUSAL_PATTERN).expect("static causal pattern must compile")
    })
}

/// Causal edges for soft connectives, accepted only when the clause reads
/// causally according to the embedding model.
pub struct SemanticEdgeExtractor {
    embeddings: EmbeddingProvider,
    threshold: f32,
    edge_salience: f32,
    max_value_chars: usize,
    prototypes: tokio::sync::OnceCell<Vec<Vec<f32>>>,
}

impl SemanticEdgeExtractor {
    pub fn new(
        embeddings: EmbeddingProvider,
        extraction: &ExtractionConfig,
        embeddings_config: &EmbeddingsConfig,
    ) -> Self {
        Self {
            embeddings,
            threshold: embeddings_config.causal_threshold,
            edge_salience: extraction.edge_salience,
            max_value_chars: extraction.max_value_chars,
            prototypes: tokio::sync::OnceCell::new(),
        }
    }

    async fn prototypes(&self) -> Result<&Vec<Vec<f32>>> {
        self.prototypes
            .get_or_try_init(|| async {
                let texts = CAUSAL_PROTOTYPES.iter().map(|s| s.to_string()).collect();
                self.embeddings.embed(texts).await
            })
            .await
    }

    async fn causal_score(&self, clause: &str) -> Result<f32> {
        let prototypes = self.prototypes().await?;
        let embedding = self.embeddings.embed_single(clause).await?;
        Ok(prototypes
            .iter()
            .map(|p| cosine_similarity(&embedding, p))
            .fold(f32::MIN, f32::max))
    }
}

#[async_trait]
impl FactExtractor for SemanticEdgeExtractor {
    fn name(&self) -> &'static str {
        "semantic"
    }

    async fn extract(&self, value: &str) -> Result<Vec<NewNode>> {
        let mut nodes = Vec::new();

        for clause in split_clauses(value) {
            if clause.ends_with('?') {
                continue;
            }
            let Some(caps) = soft_causal_pattern().captures(clause) else {
                continue;
            };

            let score = self.causal_score(clause).await?;
            if score < self.threshold {
                tracing::debug!(score, threshold = self.threshold, "Soft connective not causal");
                continue;
            }

            let connective = caps[2].split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
            let (left, right) = (&caps[1], &caps[3]);
            let (cause, effect) = if CAUSE_FIRST.contains(&connective.as_str()) {
                (left, right)
            } else {
                (right, left)
            };

            if let Some(edge) = causal_edge(cause, effect, self.edge_salience, self.max_value_chars)
            {
                tracing::debug!(connective = %connective, score, "Semantic causal edge");
                nodes.push(edge);
            }
        }

        Ok(nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ZetaError;
    use crate::models::NodeKind;

    fn extractor(threshold: f32) -> SemanticEdgeExtractor {
        let config = EmbeddingsConfig {
            causal_threshold: threshold,
            ..EmbeddingsConfig::default()
        };
        SemanticEdgeExtractor::new(
            EmbeddingProvider::hashed(64),
            &ExtractionConfig::default(),
            &config,
        )
    }

    #[tokio::test]
    async fn test_soft_connective_cause_on_right() {
        let nodes = extractor(-1.0)
            .extract("The game was cancelled due to heavy rain")
            .await
            .unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].kind, NodeKind::CausalEdge);
        assert_eq!(nodes[0].value, "heavy rain -> The game was cancelled");
    }

    #[tokio::test]
    async fn test_soft_connective_cause_on_left() {
        let nodes = extractor(-1.0)
            .extract("I missed the bus, so I walked to work")
            .await
            .unwrap();
        assert_eq!(nodes[0].value, "I missed the bus -> I walked to work");
    }

    #[tokio::test]
    async fn test_threshold_rejects() {
        let nodes = extractor(1.01)
            .extract("The game was cancelled due to heavy rain")
            .await
            .unwrap();
        assert!(nodes.is_empty());
    }

    #[tokio::test]
    async fn test_no_connective_skips_embedding() {
        let semantic = SemanticEdgeExtractor::new(
            EmbeddingProvider::unavailable("offline"),
            &ExtractionConfig::default(),
            &EmbeddingsConfig::default(),
        );
        let nodes = semantic.extract("my name is Dana").await.unwrap();
        assert!(nodes.is_empty());
    }

    #[tokio::test]
    async fn test_unavailable_embeddings_error() {
        let semantic = SemanticEdgeExtractor::new(
            EmbeddingProvider::unavailable("offline"),
            &ExtractionConfig::default(),
            &EmbeddingsConfig::default(),
        );
        let err = semantic
            .extract("The game was cancelled due to heavy rain")
            .await
            .unwrap_err();
        assert!(matches!(err, ZetaError::EmbeddingUnavailable(_)));
    }
}
