mod provider;

pub use provider::{cosine_similarity, EmbeddingProvider};
