#![allow(dead_code)]

use std::sync::Arc;

use zeta::config::{
    ConflictConfig, DatabaseConfig, EmbeddingsConfig, ExtractionConfig, GuardConfig,
    SurfacingConfig,
};
use zeta::db::{FactStore, InMemoryStore};
use zeta::models::{NewNode, Node, NodeKind};
use zeta::{Config, EmbeddingProvider, MemoryCore};

/// Built-in defaults, independent of the process environment.
pub fn test_config() -> Config {
    Config {
        database: DatabaseConfig {
            url: ":memory:".to_string(),
            auth_token: None,
        },
        guard: GuardConfig::default(),
        surfacing: SurfacingConfig::default(),
        extraction: ExtractionConfig::default(),
        embeddings: EmbeddingsConfig::default(),
        conflict: ConflictConfig::default(),
    }
}

/// A core over a fresh in-memory store, with or without embeddings.
pub fn test_core(embeddings_available: bool) -> (MemoryCore, Arc<InMemoryStore>) {
    let config = test_config();
    let store = Arc::new(InMemoryStore::new());
    let embeddings = if embeddings_available {
        EmbeddingProvider::hashed(config.embeddings.dimensions)
    } else {
        EmbeddingProvider::unavailable("disabled for test")
    };
    let core = MemoryCore::new(&config, store.clone(), embeddings);
    (core, store)
}

pub fn fact(id: &str, label: &str, value: &str, salience: f32) -> Node {
    Node::new(id.to_string(), NewNode::fact(label, value, salience))
}

pub fn raw(id: &str, value: &str) -> Node {
    Node::new(
        id.to_string(),
        NewNode::new(NodeKind::Raw, "statement", value, 0.85),
    )
}

pub async fn seed(store: &dyn FactStore, facts: &[(&str, &str, f32)]) {
    for (label, value, salience) in facts {
        store
            .create_node(NewNode::fact(*label, *value, *salience))
            .await
            .expect("seeding the store should work");
    }
}
