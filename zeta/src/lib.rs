//! Fact ingestion and surfacing core for a conversational memory graph.
//!
//! Storage commands (`remember: ...`) are turned into fact nodes; every other
//! utterance surfaces relevant stored facts, with credential-bearing facts
//! held back unless the query itself is about credentials.

pub mod config;
pub mod db;
pub mod embeddings;
pub mod error;
pub mod intelligence;
pub mod models;
pub mod services;

pub use config::Config;
pub use db::{FactStore, InMemoryStore, LibSqlBackend};
pub use embeddings::EmbeddingProvider;
pub use error::{Result, ZetaError};
pub use services::MemoryCore;
