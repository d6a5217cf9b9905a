use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zeta::db::{Database, FactStore, InMemoryStore, LibSqlBackend};
use zeta::models::TurnOutcome;
use zeta::{Config, EmbeddingProvider, MemoryCore};

#[derive(Parser)]
#[command(name = "zeta")]
#[command(about = "Interactive fact memory: `remember: ...` stores, anything else recalls")]
struct Args {
    /// Database URL (`:memory:`, `file:<path>` or a libsql remote URL)
    #[arg(long)]
    database_url: Option<String>,

    /// Print every result as a JSON line
    #[arg(long)]
    json: bool,

    /// Run without an embedding model
    #[arg(long)]
    no_embeddings: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "zeta=info".into());
    // Logs go to stderr so stdout stays clean for results.
    if std::env::var("ZETA_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    let mut config = Config::from_env();
    if let Some(url) = args.database_url {
        config.database.url = url;
    }
    if args.no_embeddings {
        config.embeddings.enabled = false;
    }

    let store: Arc<dyn FactStore> = if config.database.is_in_process() {
        tracing::info!("Using in-process fact store");
        Arc::new(InMemoryStore::new())
    } else {
        tracing::info!(url = %config.database.url, "Initializing database...");
        let db = Database::new(&config.database).await?;
        Arc::new(LibSqlBackend::new(db))
    };

    tracing::info!("Loading embedding model: {}...", config.embeddings.model);
    let embeddings = match EmbeddingProvider::new(&config.embeddings) {
        Ok(provider) => provider,
        Err(e) => {
            tracing::warn!(error = %e, "Embedding model failed to load, continuing without it");
            EmbeddingProvider::unavailable(&e.to_string())
        }
    };

    let core = MemoryCore::new(&config, store, embeddings);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let output = if core.is_storage_command(line) {
            match core.handle_turn(line).await {
                TurnOutcome::Stored(result) if !args.json => {
                    format!("stored {} fact(s)", result.facts_created)
                }
                outcome => serde_json::to_string(&outcome)?,
            }
        } else {
            let prompt = core.prepare_generation(line).await;
            if args.json {
                serde_json::to_string(&prompt)?
            } else {
                prompt.text
            }
        };

        stdout.write_all(output.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    tracing::info!("Input closed, shutting down");
    Ok(())
}
