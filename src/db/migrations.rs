//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
        tracing::info!("Applied schema migration v1");
    }

    Ok(())
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- ISSUES
        -- One row per issue, grouped by project
        -- ============================================
        CREATE TABLE issues (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            project TEXT NOT NULL,
            issue_title TEXT NOT NULL,
            issue_text TEXT NOT NULL,
            created_by TEXT NOT NULL,
            assigned_to TEXT NOT NULL DEFAULT '',
            status_text TEXT NOT NULL DEFAULT '',
            open INTEGER NOT NULL DEFAULT 1,     -- boolean
            created_on TEXT NOT NULL,
            updated_on TEXT NOT NULL
        );

        CREATE INDEX idx_issues_project ON issues(project);

        -- ============================================
        -- BOOKS
        -- Personal library titles and their comments
        -- ============================================
        CREATE TABLE books (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            created_on TEXT NOT NULL
        );

        CREATE TABLE book_comments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            book_id INTEGER NOT NULL REFERENCES books(id) ON DELETE CASCADE,
            comment TEXT NOT NULL,
            created_on TEXT NOT NULL
        );

        CREATE INDEX idx_book_comments_book ON book_comments(book_id);

        -- ============================================
        -- STOCKS
        -- Last seen price per symbol, likes deduplicated per client
        -- ============================================
        CREATE TABLE stocks (
            symbol TEXT PRIMARY KEY,
            price REAL NOT NULL,
            updated_on TEXT NOT NULL
        );

        CREATE TABLE stock_likes (
            symbol TEXT NOT NULL REFERENCES stocks(symbol) ON DELETE CASCADE,
            ip_hash TEXT NOT NULL,               -- SHA-256 hex of the client address
            created_on TEXT NOT NULL,
            PRIMARY KEY (symbol, ip_hash)
        );

        -- ============================================
        -- THREADS
        -- Message board threads, grouped by board
        -- ============================================
        CREATE TABLE threads (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            board TEXT NOT NULL,
            text TEXT NOT NULL,
            delete_password TEXT NOT NULL,       -- SHA-256 hex
            reported INTEGER NOT NULL DEFAULT 0, -- boolean
            created_on TEXT NOT NULL,
            bumped_on TEXT NOT NULL
        );

        CREATE INDEX idx_threads_board_bumped ON threads(board, bumped_on);

        -- ============================================
        -- REPLIES
        -- ============================================
        CREATE TABLE replies (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            thread_id INTEGER NOT NULL REFERENCES threads(id) ON DELETE CASCADE,
            text TEXT NOT NULL,
            delete_password TEXT NOT NULL,       -- SHA-256 hex
            reported INTEGER NOT NULL DEFAULT 0, -- boolean
            created_on TEXT NOT NULL
        );

        CREATE INDEX idx_replies_thread ON replies(thread_id);
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}
