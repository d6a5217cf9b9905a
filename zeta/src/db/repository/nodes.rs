use chrono::{DateTime, Utc};
use libsql::{params, Connection};

use crate::error::Result;
use crate::models::Node;

const NODE_COLUMNS: &str = "id, kind, label, value, salience, created_at";

pub struct NodeRepository;

impl NodeRepository {
    pub async fn create(conn: &Connection, node: &Node) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO nodes (id, kind, label, value, salience, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                node.id.clone(),
                node.kind.to_string(),
                node.label.clone(),
                node.value.clone(),
                node.salience as f64,
                node.created_at.to_rfc3339(),
            ],
        )
        .await?;

        Ok(())
    }

    pub async fn list_all(conn: &Connection) -> Result<Vec<Node>> {
        let sql = format!("SELECT {NODE_COLUMNS} FROM nodes ORDER BY rowid");
        let mut rows = conn.query(&sql, ()).await?;

        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(Self::row_to_node(&row)?);
        }
        Ok(results)
    }

    /// Nodes whose label or value contains any of `terms` (case-insensitive).
    pub async fn search_terms(conn: &Connection, terms: &[String]) -> Result<Vec<Node>> {
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let mut clauses = Vec::with_capacity(terms.len());
        for i in 0..terms.len() {
            clauses.push(format!(
                "(lower(label) LIKE ?{n} OR lower(value) LIKE ?{n})",
                n = i + 1
            ));
        }

        let sql = format!(
            "SELECT {NODE_COLUMNS} FROM nodes WHERE {} ORDER BY rowid",
            clauses.join(" OR ")
        );
        let params: Vec<libsql::Value> = terms
            .iter()
            .map(|term| libsql::Value::from(format!("%{}%", escape_like(term))))
            .collect();

        let mut rows = conn.query(&sql, libsql::params_from_iter(params)).await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(Self::row_to_node(&row)?);
        }
        Ok(results)
    }

    pub fn row_to_node(row: &libsql::Row) -> Result<Node> {
        Ok(Node {
            id: row.get(0)?,
            kind: row.get::<String>(1)?.parse().unwrap_or_default(),
            label: row.get(2)?,
            value: row.get(3)?,
            salience: row.get::<f64>(4)? as f32,
            created_at: DateTime::parse_from_rfc3339(&row.get::<String>(5)?)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        })
    }
}

/// Subject terms are alphanumeric, so only the LIKE wildcards need guarding.
fn escape_like(term: &str) -> String {
    term.replace(['%', '_'], "")
}
