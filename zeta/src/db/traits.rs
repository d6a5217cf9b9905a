use async_trait::async_trait;

use crate::error::Result;
use crate::models::{NewNode, Node};

/// The fact graph as seen by the ingestion and surfacing core.
///
/// Implementations own persistence and concurrency. Each call must observe a
/// consistent snapshot: a node is either fully visible or not at all.
#[async_trait]
pub trait FactStore: Send + Sync {
    /// Persist a new node and return its stored representation.
    async fn create_node(&self, node: NewNode) -> Result<Node>;

    /// Every node in creation order.
    async fn iterate_nodes(&self) -> Result<Vec<Node>>;

    /// Nodes whose label or value mentions any significant word of `text`,
    /// in creation order. A superset is fine; callers filter precisely.
    async fn find_by_subject(&self, text: &str) -> Result<Vec<Node>>;
}
