//! Book model
//!
//! A title in the personal library and the comments left on it.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{now_timestamp, DbResult};

/// A book row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "_id")]
    pub id: i64,
    pub title: String,
    #[serde(skip)]
    pub created_on: String,
}

/// Book with its comment count, for listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSummary {
    #[serde(rename = "_id")]
    pub id: i64,
    pub title: String,
    pub commentcount: i64,
}

/// Book with every comment, oldest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookDetail {
    #[serde(rename = "_id")]
    pub id: i64,
    pub title: String,
    pub comments: Vec<String>,
}

impl Book {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            title: row.get("title")?,
            created_on: row.get("created_on")?,
        })
    }

    /// Insert a new book
    pub fn create(conn: &Connection, title: &str) -> DbResult<Self> {
        conn.execute(
            "INSERT INTO books (title, created_on) VALUES (?1, ?2)",
            params![title, now_timestamp()],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a book by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM books WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(book) => Ok(Some(book)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get a book with all of its comments
    pub fn get_detail(conn: &Connection, id: i64) -> DbResult<Option<BookDetail>> {
        let book = match Self::get_by_id(conn, id)? {
            Some(book) => book,
            None => return Ok(None),
        };

        let mut stmt = conn.prepare(
            "SELECT comment FROM book_comments WHERE book_id = ?1 ORDER BY id ASC"
        )?;
        let comments = stmt
            .query_map([id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(Some(BookDetail {
            id: book.id,
            title: book.title,
            comments,
        }))
    }

    /// List every book with its comment count
    pub fn list(conn: &Connection) -> DbResult<Vec<BookSummary>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT b.id, b.title, COUNT(c.id) AS commentcount
            FROM books b
            LEFT JOIN book_comments c ON c.book_id = b.id
            GROUP BY b.id
            ORDER BY b.id ASC
            "#
        )?;

        let books = stmt
            .query_map([], |row| {
                Ok(BookSummary {
                    id: row.get("id")?,
                    title: row.get("title")?,
                    commentcount: row.get("commentcount")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(books)
    }

    /// Append a comment to a book
    /// Returns Ok(false) if the book does not exist
    pub fn add_comment(conn: &Connection, id: i64, comment: &str) -> DbResult<bool> {
        if Self::get_by_id(conn, id)?.is_none() {
            return Ok(false);
        }

        conn.execute(
            "INSERT INTO book_comments (book_id, comment, created_on) VALUES (?1, ?2, ?3)",
            params![id, comment, now_timestamp()],
        )?;
        Ok(true)
    }

    /// Delete a book and its comments
    /// Returns Ok(true) if deleted, Ok(false) if not found
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM books WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    /// Delete every book, returning how many were removed
    pub fn delete_all(conn: &Connection) -> DbResult<usize> {
        let rows = conn.execute("DELETE FROM books", [])?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[test]
    fn test_comment_count_and_detail() {
        let db = Database::in_memory().unwrap();
        let conn = db.get_conn().unwrap();

        let book = Book::create(&conn, "Dune").unwrap();
        Book::create(&conn, "Emma").unwrap();
        assert!(Book::add_comment(&conn, book.id, "spice").unwrap());
        assert!(Book::add_comment(&conn, book.id, "worms").unwrap());

        let list = Book::list(&conn).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].commentcount, 2);
        assert_eq!(list[1].commentcount, 0);

        let detail = Book::get_detail(&conn, book.id).unwrap().unwrap();
        assert_eq!(detail.comments, vec!["spice", "worms"]);
    }

    #[test]
    fn test_comment_on_missing_book() {
        let db = Database::in_memory().unwrap();
        let conn = db.get_conn().unwrap();
        assert!(!Book::add_comment(&conn, 7, "hello").unwrap());
    }

    #[test]
    fn test_delete_cascades_comments() {
        let db = Database::in_memory().unwrap();
        let conn = db.get_conn().unwrap();

        let book = Book::create(&conn, "Dune").unwrap();
        Book::add_comment(&conn, book.id, "spice").unwrap();
        assert!(Book::delete(&conn, book.id).unwrap());
        assert!(!Book::delete(&conn, book.id).unwrap());

        let orphans: i64 = conn
            .query_row("SELECT COUNT(*) FROM book_comments", [], |r| r.get(0))
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[test]
    fn test_delete_all() {
        let db = Database::in_memory().unwrap();
        let conn = db.get_conn().unwrap();

        Book::create(&conn, "A").unwrap();
        Book::create(&conn, "B").unwrap();
        assert_eq!(Book::delete_all(&conn).unwrap(), 2);
        assert!(Book::list(&conn).unwrap().is_empty());
    }
}
