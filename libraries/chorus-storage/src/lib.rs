//! Chorus Storage
//!
//! `SQLite` persistence layer for Chorus: users, songs, playlists, and
//! playlist membership, plus the admin dashboard aggregation.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: each feature owns its own queries and logic
//! - **Caller-Aware Guards**: every mutation takes the request's `Caller`
//!   and applies the `chorus_core::access` checks before writing
//! - **Constraint-Backed Invariants**: uniqueness rules the guards check in
//!   application code are also enforced by the schema, so concurrent
//!   check-then-insert races cannot slip a duplicate through
//!
//! # Example
//!
//! ```rust,no_run
//! use chorus_core::Caller;
//! use chorus_storage::{create_pool, run_migrations};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://chorus.db").await?;
//! run_migrations(&pool).await?;
//!
//! // Anonymous listing: public songs only
//! let songs = chorus_storage::songs::visible(&pool, &Caller::Anonymous).await?;
//! # Ok(())
//! # }
//! ```

// Vertical slices
pub mod dashboard;
pub mod playlists;
pub mod songs;
pub mod users;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// Called once at startup to bring the schema up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://chorus.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}
