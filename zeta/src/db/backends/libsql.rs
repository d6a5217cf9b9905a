use async_trait::async_trait;
use nanoid::nanoid;

use crate::db::connection::Database;
use crate::db::repository::NodeRepository;
use crate::db::traits::FactStore;
use crate::error::Result;
use crate::intelligence::utils::subject_terms;
use crate::models::{NewNode, Node};

pub struct LibSqlBackend {
    db: Database,
}

impl LibSqlBackend {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FactStore for LibSqlBackend {
    async fn create_node(&self, node: NewNode) -> Result<Node> {
        let node = Node::new(nanoid!(), node);
        let conn = self.db.connect()?;
        NodeRepository::create(&conn, &node).await?;
        Ok(node)
    }

    async fn iterate_nodes(&self) -> Result<Vec<Node>> {
        let conn = self.db.connect()?;
        NodeRepository::list_all(&conn).await
    }

    async fn find_by_subject(&self, text: &str) -> Result<Vec<Node>> {
        let terms = subject_terms(text);
        let conn = self.db.connect()?;
        NodeRepository::search_terms(&conn, &terms).await
    }
}
