//! # BRS DB
//!
//! PostgreSQL pool initialisation, SQL error helpers and the role/profile
//! persistence shared by the server and the CLI.
//!
//! - [`roles`]: Role-set reads and mutations
//! - [`profiles`]: Profile synchronisation after role changes
//!
//! ```ignore
//! use brs_db::{init_db_pool, roles};
//!
//! let pool = init_db_pool().await;
//! let mut tx = pool.begin().await?;
//! roles::add_roles(&mut tx, user_id, &[RoleKind::Teacher]).await?;
//! tx.commit().await?;
//! ```

use sqlx::postgres::PgPoolOptions;
use std::env;

pub mod profiles;
pub mod roles;

pub use sqlx::PgPool;

/// Initializes a PostgreSQL connection pool from `DATABASE_URL`.
///
/// `DATABASE_MAX_CONNECTIONS` caps the pool size (default 10).
///
/// # Panics
///
/// Panics if `DATABASE_URL` is not set or the database is unreachable.
/// Called once at startup, where there is nothing sensible to fall back to.
pub async fn init_db_pool() -> PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10);

    tracing::info!(max_connections, "Connecting to database");

    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database")
}

/// Whether a sqlx error is a unique-constraint violation.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

/// Whether a sqlx error is a foreign-key violation.
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_are_not_violations() {
        let err = sqlx::Error::RowNotFound;
        assert!(!is_unique_violation(&err));
        assert!(!is_foreign_key_violation(&err));
    }
}
