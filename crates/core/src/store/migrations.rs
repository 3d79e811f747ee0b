//! Database schema migrations.
//!
//! A version table records which migrations have been applied; each
//! migration is a SQL batch run at most once per database file, inside
//! its own transaction together with its version row.

use super::Error;
use tokio_rusqlite::{Connection, params, rusqlite};

/// A single schema step.
struct Migration {
    version: i64,
    name: &'static str,
    sql: &'static str,
}

/// Applied in ascending version order.
const MIGRATIONS: &[Migration] =
    &[Migration { version: 1, name: "stores", sql: include_str!("../../migrations/001_stores.sql") }];

/// Run any pending migrations.
///
/// # Errors
///
/// Returns an error if a migration SQL fails to execute. A failed
/// migration leaves neither its schema changes nor its version row behind.
pub async fn run(conn: &Connection) -> Result<(), Error> {
    conn.call(|conn| -> Result<(), Error> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS _migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at TEXT NOT NULL
            )",
            [],
        )?;

        let current: i64 = conn.query_row("SELECT COALESCE(MAX(version), 0) FROM _migrations", [], |row| row.get(0))?;

        for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
            apply(conn, migration)
                .map_err(|e| Error::MigrationFailed(format!("{} ({}): {e}", migration.version, migration.name)))?;
            tracing::debug!(version = migration.version, name = migration.name, "applied store migration");
        }

        Ok(())
    })
    .await
    .map_err(Error::from)
}

fn apply(conn: &mut rusqlite::Connection, migration: &Migration) -> Result<(), rusqlite::Error> {
    let tx = conn.transaction()?;
    tx.execute_batch(migration.sql)?;
    tx.execute(
        "INSERT INTO _migrations (version, name, applied_at) VALUES (?1, ?2, ?3)",
        params![migration.version, migration.name, chrono::Utc::now().to_rfc3339()],
    )?;
    tx.commit()
}
