#[cfg(feature = "local-embeddings")]
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use sha2::{Digest, Sha256};
#[cfg(feature = "local-embeddings")]
use std::sync::{Arc, Mutex};

use crate::config::{parse_provider_model, EmbeddingsConfig};
use crate::error::{Result, ZetaError};
use crate::intelligence::utils::normalize_words;

#[derive(Clone)]
enum EmbeddingBackend {
    /// Deterministic feature-hashed bag of words. No model files needed.
    Hashed,
    #[cfg(feature = "local-embeddings")]
    Local {
        model: Arc<Mutex<TextEmbedding>>,
        batch_size: usize,
    },
    Unavailable { reason: String },
}

/// Embedding capability handed to the extraction pipeline at construction.
///
/// Callers check [`EmbeddingProvider::is_available`] instead of reading any
/// process-wide flag, so both states can be injected in tests.
#[derive(Clone)]
pub struct EmbeddingProvider {
    backend: EmbeddingBackend,
    dimensions: usize,
}

impl std::fmt::Debug for EmbeddingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingProvider")
            .field("backend", &self.backend_name())
            .field("dimensions", &self.dimensions)
            .finish()
    }
}

impl EmbeddingProvider {
    pub fn new(config: &EmbeddingsConfig) -> Result<Self> {
        if !config.enabled {
            return Ok(Self::unavailable("Embeddings disabled by configuration"));
        }

        if config.dimensions == 0 {
            return Err(ZetaError::Validation(
                "Embedding dimensions must be greater than zero".to_string(),
            ));
        }

        let (provider, model_name) = parse_provider_model(&config.model);
        match provider.to_lowercase().as_str() {
            "hash" => Ok(Self::hashed(config.dimensions)),
            _ => Self::new_local(config, model_name),
        }
    }

    pub fn hashed(dimensions: usize) -> Self {
        Self {
            backend: EmbeddingBackend::Hashed,
            dimensions: dimensions.max(1),
        }
    }

    pub fn unavailable(reason: &str) -> Self {
        Self {
            backend: EmbeddingBackend::Unavailable {
                reason: reason.to_string(),
            },
            dimensions: 0,
        }
    }

    #[cfg(feature = "local-embeddings")]
    fn new_local(config: &EmbeddingsConfig, model_name: &str) -> Result<Self> {
        let model = TextEmbedding::try_new(
            InitOptions::new(resolve_embedding_model(model_name))
                .with_show_download_progress(false),
        )
        .map_err(|e| ZetaError::Embedding(e.to_string()))?;

        Ok(Self {
            backend: EmbeddingBackend::Local {
                model: Arc::new(Mutex::new(model)),
                batch_size: 32,
            },
            dimensions: config.dimensions,
        })
    }

    #[cfg(not(feature = "local-embeddings"))]
    fn new_local(_config: &EmbeddingsConfig, model_name: &str) -> Result<Self> {
        Ok(Self::unavailable(&format!(
            "Local embedding model '{model_name}' requires the local-embeddings feature"
        )))
    }

    pub fn is_available(&self) -> bool {
        !matches!(self.backend, EmbeddingBackend::Unavailable { .. })
    }

    pub fn unavailable_reason(&self) -> Option<&str> {
        match &self.backend {
            EmbeddingBackend::Unavailable { reason } => Some(reason.as_str()),
            _ => None,
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn backend_name(&self) -> &'static str {
        match &self.backend {
            EmbeddingBackend::Hashed => "hash",
            #[cfg(feature = "local-embeddings")]
            EmbeddingBackend::Local { .. } => "local",
            EmbeddingBackend::Unavailable { .. } => "unavailable",
        }
    }

    pub async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        match &self.backend {
            EmbeddingBackend::Hashed => Ok(texts
                .iter()
                .map(|text| hashed_embedding(text, self.dimensions))
                .collect()),
            #[cfg(feature = "local-embeddings")]
            EmbeddingBackend::Local { model, batch_size } => {
                let model = Arc::clone(model);
                let batch_size = *batch_size;
                tokio::task::spawn_blocking(move || {
                    let mut model = model.lock().map_err(|e| {
                        ZetaError::Embedding(format!("Embedding model lock poisoned: {e}"))
                    })?;
                    model
                        .embed(texts, Some(batch_size))
                        .map_err(|e| ZetaError::Embedding(e.to_string()))
                })
                .await
                .map_err(|e| ZetaError::Embedding(format!("Embedding worker failed: {e}")))?
            }
            EmbeddingBackend::Unavailable { reason } => {
                Err(ZetaError::EmbeddingUnavailable(reason.clone()))
            }
        }
    }

    pub async fn embed_single(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.embed(vec![text.to_string()]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| ZetaError::Embedding("No embedding generated".to_string()))
    }
}

/// Cosine similarity of two vectors; 0.0 when either is empty, zero or the
/// lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

fn hashed_embedding(text: &str, dimensions: usize) -> Vec<f32> {
    let mut vector = vec![0.0f32; dimensions];
    for word in normalize_words(text) {
        let digest = Sha256::digest(word.as_bytes());
        let mut bucket_bytes = [0u8; 8];
        bucket_bytes.copy_from_slice(&digest[..8]);
        let bucket = (u64::from_le_bytes(bucket_bytes) % dimensions as u64) as usize;
        let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
        vector[bucket] += sign;
    }

    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in &mut vector {
            *x /= norm;
        }
    }
    vector
}

#[cfg(feature = "local-embeddings")]
fn resolve_embedding_model(model_name: &str) -> EmbeddingModel {
    match model_name {
        "BAAI/bge-small-en-v1.5" | "bge-small-en-v1.5" => EmbeddingModel::BGESmallENV15,
        "BAAI/bge-base-en-v1.5" | "bge-base-en-v1.5" => EmbeddingModel::BGEBaseENV15,
        "all-MiniLM-L6-v2" | "sentence-transformers/all-MiniLM-L6-v2" => {
            EmbeddingModel::AllMiniLML6V2
        }
        _ => EmbeddingModel::BGESmallENV15,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hashed_embeddings_are_deterministic_and_normalized() {
        let provider = EmbeddingProvider::hashed(64);
        let a = provider.embed_single("the roads were icy").await.unwrap();
        let b = provider.embed_single("The roads were ICY!").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_empty_text_embeds_to_zero_vector() {
        let provider = EmbeddingProvider::hashed(16);
        let v = provider.embed_single("").await.unwrap();
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[tokio::test]
    async fn test_unavailable_provider_errors() {
        let provider = EmbeddingProvider::unavailable("no model");
        assert!(!provider.is_available());
        assert_eq!(provider.unavailable_reason(), Some("no model"));
        let err = provider.embed_single("x").await.unwrap_err();
        assert!(err.is_unavailable());
    }

    #[test]
    fn test_disabled_config_is_unavailable() {
        let config = EmbeddingsConfig {
            enabled: false,
            ..EmbeddingsConfig::default()
        };
        let provider = EmbeddingProvider::new(&config).unwrap();
        assert!(!provider.is_available());
    }

    #[test]
    fn test_default_config_is_hashed() {
        let provider = EmbeddingProvider::new(&EmbeddingsConfig::default()).unwrap();
        assert!(provider.is_available());
        assert_eq!(provider.backend_name(), "hash");
        assert_eq!(provider.dimensions(), 256);
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let config = EmbeddingsConfig {
            dimensions: 0,
            ..EmbeddingsConfig::default()
        };
        assert!(EmbeddingProvider::new(&config).is_err());
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }

    #[tokio::test]
    async fn test_shared_words_raise_similarity() {
        let provider = EmbeddingProvider::hashed(256);
        let base = provider.embed_single("flight delayed due to snow").await.unwrap();
        let same = provider.embed_single("flight delayed due to snow").await.unwrap();
        assert!((cosine_similarity(&base, &same) - 1.0).abs() < 1e-5);
    }
}
