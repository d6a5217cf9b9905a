pub mod backends;
mod connection;
mod memory;
pub mod repository;
pub(crate) mod schema;
pub mod traits;

pub use backends::libsql::LibSqlBackend;
pub use connection::Database;
pub use memory::InMemoryStore;
pub use traits::*;
