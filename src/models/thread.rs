//! Message board thread model
//!
//! Threads live on a named board and carry their replies. The `reported`
//! flag and the delete password digest are never serialized.

use rusqlite::{params, Connection, Row};
use serde::Serialize;

use crate::db::{now_timestamp, DbResult};
use super::Reply;

/// A thread together with (some of) its replies
#[derive(Debug, Clone, Serialize)]
pub struct Thread {
    #[serde(rename = "_id")]
    pub id: i64,
    #[serde(skip)]
    pub board: String,
    pub text: String,
    pub created_on: String,
    pub bumped_on: String,
    #[serde(skip)]
    pub reported: bool,
    #[serde(skip)]
    pub delete_password: String,
    pub replies: Vec<Reply>,
}

impl Thread {
    /// Create from a database row; replies are attached separately
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            board: row.get("board")?,
            text: row.get("text")?,
            created_on: row.get("created_on")?,
            bumped_on: row.get("bumped_on")?,
            reported: row.get("reported")?,
            delete_password: row.get("delete_password")?,
            replies: Vec::new(),
        })
    }

    /// Start a new thread; `bumped_on` starts equal to `created_on`
    pub fn create(conn: &Connection, board: &str, text: &str, password_hash: &str) -> DbResult<Self> {
        let now = now_timestamp();
        conn.execute(
            r#"
            INSERT INTO threads (board, text, delete_password, reported, created_on, bumped_on)
            VALUES (?1, ?2, ?3, 0, ?4, ?4)
            "#,
            params![board, text, password_hash, now],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, board, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a thread without its replies
    pub fn get_by_id(conn: &Connection, board: &str, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM threads WHERE board = ?1 AND id = ?2")?;

        let result = stmt.query_row(params![board, id], Self::from_row);
        match result {
            Ok(thread) => Ok(Some(thread)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get a thread with every reply
    pub fn get_with_replies(conn: &Connection, board: &str, id: i64) -> DbResult<Option<Self>> {
        match Self::get_by_id(conn, board, id)? {
            Some(mut thread) => {
                thread.replies = Reply::list_for_thread(conn, id, None)?;
                Ok(Some(thread))
            }
            None => Ok(None),
        }
    }

    /// Most recently bumped threads on a board, each with its latest replies
    pub fn list_recent(
        conn: &Connection,
        board: &str,
        limit: i64,
        reply_limit: i64,
    ) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM threads
            WHERE board = ?1
            ORDER BY bumped_on DESC, id DESC
            LIMIT ?2
            "#
        )?;

        let mut threads = stmt
            .query_map(params![board, limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        for thread in &mut threads {
            thread.replies = Reply::list_for_thread(conn, thread.id, Some(reply_limit))?;
        }

        Ok(threads)
    }

    /// Set `bumped_on`
    pub fn bump(conn: &Connection, board: &str, id: i64, at: &str) -> DbResult<bool> {
        let rows = conn.execute(
            "UPDATE threads SET bumped_on = ?1 WHERE board = ?2 AND id = ?3",
            params![at, board, id],
        )?;
        Ok(rows > 0)
    }

    /// Flag a thread as reported
    /// Returns Ok(false) if the thread does not exist on the board
    pub fn report(conn: &Connection, board: &str, id: i64) -> DbResult<bool> {
        let rows = conn.execute(
            "UPDATE threads SET reported = 1 WHERE board = ?1 AND id = ?2",
            params![board, id],
        )?;
        Ok(rows > 0)
    }

    /// Delete a thread and its replies if the password digest matches
    pub fn delete(conn: &Connection, board: &str, id: i64, password_hash: &str) -> DbResult<bool> {
        let rows = conn.execute(
            "DELETE FROM threads WHERE board = ?1 AND id = ?2 AND delete_password = ?3",
            params![board, id, password_hash],
        )?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[test]
    fn test_list_recent_orders_by_bump() {
        let db = Database::in_memory().unwrap();
        let conn = db.get_conn().unwrap();

        let first = Thread::create(&conn, "b", "first", "pw").unwrap();
        let second = Thread::create(&conn, "b", "second", "pw").unwrap();
        Thread::create(&conn, "other", "elsewhere", "pw").unwrap();

        let threads = Thread::list_recent(&conn, "b", 10, 3).unwrap();
        assert_eq!(threads.len(), 2);
        assert_eq!(threads[0].id, second.id);

        Thread::bump(&conn, "b", first.id, "9999-01-01T00:00:00.000Z").unwrap();
        let threads = Thread::list_recent(&conn, "b", 10, 3).unwrap();
        assert_eq!(threads[0].id, first.id);
    }

    #[test]
    fn test_list_recent_limit() {
        let db = Database::in_memory().unwrap();
        let conn = db.get_conn().unwrap();

        for i in 0..12 {
            Thread::create(&conn, "b", &format!("thread {}", i), "pw").unwrap();
        }
        assert_eq!(Thread::list_recent(&conn, "b", 10, 3).unwrap().len(), 10);
    }

    #[test]
    fn test_delete_requires_password() {
        let db = Database::in_memory().unwrap();
        let conn = db.get_conn().unwrap();

        let thread = Thread::create(&conn, "b", "text", "right").unwrap();
        assert!(!Thread::delete(&conn, "b", thread.id, "wrong").unwrap());
        assert!(!Thread::delete(&conn, "c", thread.id, "right").unwrap());
        assert!(Thread::delete(&conn, "b", thread.id, "right").unwrap());
    }

    #[test]
    fn test_hidden_fields_not_serialized() {
        let db = Database::in_memory().unwrap();
        let conn = db.get_conn().unwrap();

        let thread = Thread::create(&conn, "b", "text", "secret").unwrap();
        Thread::report(&conn, "b", thread.id).unwrap();
        let thread = Thread::get_with_replies(&conn, "b", thread.id).unwrap().unwrap();
        assert!(thread.reported);

        let json = serde_json::to_value(&thread).unwrap();
        assert!(json.get("reported").is_none());
        assert!(json.get("delete_password").is_none());
        assert!(json.get("board").is_none());
        assert!(json.get("_id").is_some());
    }
}
