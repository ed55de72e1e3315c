//! # quire-db
//!
//! PostgreSQL persistence layer for quire.
//!
//! This crate provides:
//! - Connection pool management
//! - The owner-scoped note store
//! - Bearer session issuance, introspection, and login-code exchange
//!
//! ## Example
//!
//! ```rust,ignore
//! use quire_db::Database;
//! use quire_core::{CreateNoteRequest, NoteStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/quire").await?;
//!
//!     let note = db.notes.insert("user@example.com", CreateNoteRequest {
//!         notes: "<p>Hello, world!</p>".to_string(),
//!         title: Some("Greeting".to_string()),
//!     }).await?;
//!
//!     println!("Created note: {}", note.uuid);
//!     Ok(())
//! }
//! ```

pub mod notes;
pub mod pool;
pub mod sessions;

// Re-export core types
pub use quire_core::*;

pub use notes::PgNoteStore;
pub use pool::{create_pool, create_pool_with_config, PoolConfig};
pub use sessions::PgSessionStore;

/// Combined database context with all stores.
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Note store for owner-scoped CRUD operations.
    pub notes: PgNoteStore,
    /// Session store for bearer tokens and login codes.
    pub sessions: PgSessionStore,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            notes: PgNoteStore::new(pool.clone()),
            sessions: PgSessionStore::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}
