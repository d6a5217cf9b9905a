use std::sync::Arc;

use libsql::{Builder, Connection};

use crate::config::DatabaseConfig;
use crate::error::Result;

use super::schema;

/// Lock wait for local files before a write gives up.
const LOCAL_BUSY_TIMEOUT_MS: u64 = 5000;

/// Where the fact database lives, decided from the configured URL.
#[derive(Debug, PartialEq)]
enum Location<'a> {
    Remote(&'a str),
    Local(&'a str),
}

impl<'a> Location<'a> {
    fn parse(url: &'a str) -> Self {
        if url.starts_with("libsql://") || url.starts_with("https://") {
            Location::Remote(url)
        } else {
            Location::Local(url.strip_prefix("file:").unwrap_or(url))
        }
    }
}

/// Shared handle to the libsql database holding the fact graph. Cloning
/// shares the underlying database.
#[derive(Clone)]
pub struct Database {
    inner: Arc<libsql::Database>,
}

impl Database {
    /// Open the database, tune local files and make sure the schema exists.
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let location = Location::parse(&config.url);
        let inner = match location {
            Location::Remote(url) => {
                let token = config.auth_token.clone().unwrap_or_default();
                Builder::new_remote(url.to_string(), token).build().await?
            }
            Location::Local(path) => Builder::new_local(path).build().await?,
        };

        let database = Self {
            inner: Arc::new(inner),
        };
        let conn = database.connect()?;
        if matches!(location, Location::Local(_)) {
            tune_local(&conn).await;
        }
        schema::init_schema(&conn).await?;

        Ok(database)
    }

    pub fn connect(&self) -> Result<Connection> {
        Ok(self.inner.connect()?)
    }
}

/// Pragmas for local files. A file that refuses one still works, so failures
/// are logged and ignored.
async fn tune_local(conn: &Connection) {
    let pragmas = [
        format!("PRAGMA busy_timeout = {LOCAL_BUSY_TIMEOUT_MS}"),
        "PRAGMA journal_mode = WAL".to_string(),
    ];
    for pragma in &pragmas {
        if let Err(error) = conn.execute_batch(pragma).await {
            tracing::warn!(pragma = %pragma, error = %error, "Failed to apply pragma");
        }
    }
}
