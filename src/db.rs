// ==========================================
// Lot Cost Engine - SQLite connection setup
// ==========================================
// Every Connection::open goes through here so that foreign keys and
// busy_timeout are configured the same way on all connections
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// Default busy_timeout (milliseconds)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// schema_version written by `init_schema`
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// Schema of the records the cost engine reads.
///
/// Decimals are TEXT so that amounts round-trip exactly; dates are `YYYY-MM-DD`.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS config_scope (
    scope_id TEXT PRIMARY KEY,
    scope_type TEXT NOT NULL,
    scope_key TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE(scope_type, scope_key)
);

INSERT OR IGNORE INTO config_scope (scope_id, scope_type, scope_key)
VALUES ('global', 'GLOBAL', 'global');

CREATE TABLE IF NOT EXISTS config_kv (
    scope_id TEXT NOT NULL REFERENCES config_scope(scope_id) ON DELETE CASCADE,
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (scope_id, key)
);

CREATE TABLE IF NOT EXISTS lot (
    lot_id TEXT PRIMARY KEY,
    lot_code TEXT NOT NULL,
    start_date TEXT NOT NULL,
    close_date TEXT,
    status TEXT NOT NULL DEFAULT 'ACTIVE',
    initial_head_count INTEGER NOT NULL CHECK (initial_head_count > 0),
    initial_avg_weight TEXT NOT NULL,
    purchase_cost TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    CHECK (close_date IS NULL OR close_date >= start_date)
);

CREATE TABLE IF NOT EXISTS pen (
    pen_id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    area TEXT NOT NULL,
    active INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS pen_assignment (
    assignment_id TEXT PRIMARY KEY,
    lot_id TEXT NOT NULL REFERENCES lot(lot_id),
    pen_id TEXT NOT NULL REFERENCES pen(pen_id),
    assigned_date TEXT,
    release_date TEXT
);
CREATE INDEX IF NOT EXISTS idx_pen_assignment_lot ON pen_assignment(lot_id, release_date);

CREATE TABLE IF NOT EXISTS feed_type (
    feed_type_id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    category TEXT NOT NULL,
    cost_per_unit TEXT NOT NULL,
    weight_per_unit TEXT NOT NULL,
    active INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS feed_consumption (
    consumption_id TEXT PRIMARY KEY,
    lot_id TEXT NOT NULL REFERENCES lot(lot_id),
    feed_type_id TEXT NOT NULL REFERENCES feed_type(feed_type_id),
    date TEXT NOT NULL,
    units_consumed TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_feed_consumption_lot ON feed_consumption(lot_id);

CREATE TABLE IF NOT EXISTS direct_expense (
    expense_id TEXT PRIMARY KEY,
    lot_id TEXT NOT NULL REFERENCES lot(lot_id),
    date TEXT NOT NULL,
    concept TEXT NOT NULL,
    category TEXT NOT NULL,
    amount TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_direct_expense_lot ON direct_expense(lot_id);

CREATE TABLE IF NOT EXISTS shared_monthly_expense (
    expense_id TEXT PRIMARY KEY,
    year INTEGER NOT NULL,
    month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
    concept TEXT NOT NULL,
    category TEXT NOT NULL,
    amount TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_shared_expense_period ON shared_monthly_expense(year, month);

CREATE TABLE IF NOT EXISTS mortality_record (
    record_id TEXT PRIMARY KEY,
    lot_id TEXT NOT NULL REFERENCES lot(lot_id),
    date TEXT NOT NULL,
    count INTEGER NOT NULL CHECK (count > 0)
);

CREATE TABLE IF NOT EXISTS harvest_record (
    record_id TEXT PRIMARY KEY,
    lot_id TEXT NOT NULL REFERENCES lot(lot_id),
    date TEXT NOT NULL,
    animal_count INTEGER NOT NULL CHECK (animal_count > 0),
    total_weight TEXT NOT NULL,
    is_final INTEGER NOT NULL DEFAULT 0
);
"#;

/// Apply the shared PRAGMAs.
///
/// foreign_keys and busy_timeout are per-connection settings.
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Open a SQLite connection with the shared configuration
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// Create every table if missing and record the schema version (idempotent)
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// Read schema_version (None when the table does not exist)
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        assert_eq!(read_schema_version(&conn).unwrap(), None);
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();
        assert_eq!(read_schema_version(&conn).unwrap(), Some(CURRENT_SCHEMA_VERSION));
    }

    #[test]
    fn test_close_before_start_is_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        let result = conn.execute(
            "INSERT INTO lot (lot_id, lot_code, start_date, close_date, initial_head_count, initial_avg_weight, purchase_cost)
             VALUES ('L1', 'X', '2024-02-01', '2024-01-01', 10, '20', '100')",
            [],
        );
        assert!(result.is_err());
    }
}
