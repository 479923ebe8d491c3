//! Repository layer for database operations
//!
//! Every query function takes the connection or transaction it runs on.
//! Callers decide the transactional scope; nothing here holds ambient state.

pub mod books;
pub mod companies;
pub mod job_roles;
pub mod loans;
pub mod persons;

use sqlx::{pool::PoolConnection, PgPool, Postgres, Transaction};

use crate::error::AppResult;

/// Handle on the database connection pool
#[derive(Clone)]
pub struct Repository {
    pool: PgPool,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Start a transaction; it rolls back when dropped without `commit`
    pub async fn begin(&self) -> AppResult<Transaction<'static, Postgres>> {
        Ok(self.pool.begin().await?)
    }

    /// Check out a plain connection for read-only work
    pub async fn acquire(&self) -> AppResult<PoolConnection<Postgres>> {
        Ok(self.pool.acquire().await?)
    }

    /// Round-trip to the database (readiness probe)
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Apply pending schema migrations
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}
