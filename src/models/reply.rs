//! Message board reply model

use rusqlite::{params, Connection, Row};
use serde::Serialize;

use crate::db::DbResult;

/// Text that replaces the body of a deleted reply
pub const DELETED_TEXT: &str = "[deleted]";

/// A reply to a thread
#[derive(Debug, Clone, Serialize)]
pub struct Reply {
    #[serde(rename = "_id")]
    pub id: i64,
    #[serde(skip)]
    pub thread_id: i64,
    pub text: String,
    pub created_on: String,
    #[serde(skip)]
    pub reported: bool,
    #[serde(skip)]
    pub delete_password: String,
}

impl Reply {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            thread_id: row.get("thread_id")?,
            text: row.get("text")?,
            created_on: row.get("created_on")?,
            reported: row.get("reported")?,
            delete_password: row.get("delete_password")?,
        })
    }

    /// Insert a reply; the caller is responsible for bumping the thread
    pub fn create(
        conn: &Connection,
        thread_id: i64,
        text: &str,
        password_hash: &str,
        created_on: &str,
    ) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO replies (thread_id, text, delete_password, reported, created_on)
            VALUES (?1, ?2, ?3, 0, ?4)
            "#,
            params![thread_id, text, password_hash, created_on],
        )?;

        let id = conn.last_insert_rowid();
        let mut stmt = conn.prepare("SELECT * FROM replies WHERE id = ?1")?;
        Ok(stmt.query_row([id], Self::from_row)?)
    }

    /// Replies of a thread in posting order
    ///
    /// With a limit, only the newest `limit` replies are returned (still
    /// oldest first).
    pub fn list_for_thread(conn: &Connection, thread_id: i64, limit: Option<i64>) -> DbResult<Vec<Self>> {
        let replies = match limit {
            Some(limit) => {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT * FROM (
                        SELECT * FROM replies WHERE thread_id = ?1 ORDER BY id DESC LIMIT ?2
                    ) ORDER BY id ASC
                    "#
                )?;
                let rows = stmt
                    .query_map(params![thread_id, limit], Self::from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
            None => {
                let mut stmt = conn.prepare(
                    "SELECT * FROM replies WHERE thread_id = ?1 ORDER BY id ASC"
                )?;
                let rows = stmt
                    .query_map([thread_id], Self::from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
        };

        Ok(replies)
    }

    /// Flag a reply as reported
    /// Returns Ok(false) unless the reply belongs to that thread on that board
    pub fn report(conn: &Connection, board: &str, thread_id: i64, reply_id: i64) -> DbResult<bool> {
        let rows = conn.execute(
            r#"
            UPDATE replies SET reported = 1
            WHERE id = ?1 AND thread_id = ?2
              AND EXISTS (SELECT 1 FROM threads t WHERE t.id = ?2 AND t.board = ?3)
            "#,
            params![reply_id, thread_id, board],
        )?;
        Ok(rows > 0)
    }

    /// Replace a reply's text with [`DELETED_TEXT`] if its own password digest matches
    pub fn soft_delete(
        conn: &Connection,
        board: &str,
        thread_id: i64,
        reply_id: i64,
        password_hash: &str,
    ) -> DbResult<bool> {
        let rows = conn.execute(
            r#"
            UPDATE replies SET text = ?1
            WHERE id = ?2 AND thread_id = ?3 AND delete_password = ?4
              AND EXISTS (SELECT 1 FROM threads t WHERE t.id = ?3 AND t.board = ?5)
            "#,
            params![DELETED_TEXT, reply_id, thread_id, password_hash, board],
        )?;
        Ok(rows > 0)
    }
}
