use libsql::Connection;

use crate::error::Result;

pub async fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Fact graph nodes. rowid order is creation order.
        CREATE TABLE IF NOT EXISTS nodes (
            id TEXT PRIMARY KEY,
            kind TEXT NOT NULL DEFAULT 'fact',
            label TEXT NOT NULL,
            value TEXT NOT NULL,
            salience REAL NOT NULL DEFAULT 0.5,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_nodes_kind ON nodes(kind);
        CREATE INDEX IF NOT EXISTS idx_nodes_label ON nodes(label);
        "#,
    )
    .await?;

    Ok(())
}
