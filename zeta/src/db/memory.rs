use std::collections::HashSet;

use async_trait::async_trait;
use nanoid::nanoid;
use tokio::sync::RwLock;

use crate::db::traits::FactStore;
use crate::error::Result;
use crate::intelligence::utils::{expand_contractions, normalize_words, subject_terms};
use crate::models::{NewNode, Node};

/// Process-local fact store. Reads clone a snapshot under the read lock.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    nodes: RwLock<Vec<Node>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.nodes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.nodes.read().await.is_empty()
    }
}

#[async_trait]
impl FactStore for InMemoryStore {
    async fn create_node(&self, node: NewNode) -> Result<Node> {
        let node = Node::new(nanoid!(), node);
        self.nodes.write().await.push(node.clone());
        Ok(node)
    }

    async fn iterate_nodes(&self) -> Result<Vec<Node>> {
        Ok(self.nodes.read().await.clone())
    }

    async fn find_by_subject(&self, text: &str) -> Result<Vec<Node>> {
        let terms: HashSet<String> = subject_terms(text).into_iter().collect();
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let nodes = self.nodes.read().await;
        Ok(nodes
            .iter()
            .filter(|node| {
                normalize_words(&node.label)
                    .into_iter()
                    .chain(normalize_words(&expand_contractions(&node.value)))
                    .any(|word| terms.contains(&word))
            })
            .cloned()
            .collect())
    }
}
