//! Personal library service

use std::fmt;

use crate::db::Database;
use crate::models::{Book, BookDetail, BookSummary};

use super::{parse_id, present};

/// Reply text for a book lookup that found nothing
pub const NO_BOOK_EXISTS: &str = "no book exists";

/// Result of adding a book
#[derive(Debug)]
pub enum AddBookOutcome {
    Added(Book),
    MissingTitle,
}

/// Result of commenting on a book
#[derive(Debug)]
pub enum CommentOutcome {
    Commented(BookDetail),
    MissingIdOrComment,
    NoBook,
}

/// Result of deleting one book
#[derive(Debug, PartialEq, Eq)]
pub enum DeleteBookOutcome {
    Deleted,
    NoBook,
}

impl fmt::Display for DeleteBookOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeleteBookOutcome::Deleted => f.write_str("delete successful"),
            DeleteBookOutcome::NoBook => f.write_str(NO_BOOK_EXISTS),
        }
    }
}

/// List every book with its comment count
pub fn list_books(db: &Database) -> Result<Vec<BookSummary>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    Book::list(&conn).map_err(|e| format!("Failed to list books: {}", e))
}

/// Add a book by title
pub fn add_book(db: &Database, title: Option<&str>) -> Result<AddBookOutcome, String> {
    let title = match present(title) {
        Some(title) => title,
        None => return Ok(AddBookOutcome::MissingTitle),
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let book = Book::create(&conn, title).map_err(|e| format!("Failed to add book: {}", e))?;

    tracing::info!("Added book {} '{}'", book.id, book.title);
    Ok(AddBookOutcome::Added(book))
}

/// Remove every book and comment
pub fn delete_all_books(db: &Database) -> Result<usize, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let removed = Book::delete_all(&conn).map_err(|e| format!("Failed to delete books: {}", e))?;

    tracing::info!("Deleted all {} books", removed);
    Ok(removed)
}

/// Get a book with its comments
pub fn get_book(db: &Database, id: &str) -> Result<Option<BookDetail>, String> {
    let id = match parse_id(id) {
        Some(id) => id,
        None => return Ok(None),
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    Book::get_detail(&conn, id).map_err(|e| format!("Failed to get book: {}", e))
}

/// Add a comment to a book
pub fn add_comment(db: &Database, id: &str, comment: Option<&str>) -> Result<CommentOutcome, String> {
    let comment = match (present(Some(id)), present(comment)) {
        (Some(_), Some(comment)) => comment,
        _ => return Ok(CommentOutcome::MissingIdOrComment),
    };

    let id = match parse_id(id) {
        Some(id) => id,
        None => return Ok(CommentOutcome::NoBook),
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let added = Book::add_comment(&conn, id, comment)
        .map_err(|e| format!("Failed to add comment: {}", e))?;
    if !added {
        return Ok(CommentOutcome::NoBook);
    }

    match Book::get_detail(&conn, id).map_err(|e| format!("Failed to get book: {}", e))? {
        Some(detail) => Ok(CommentOutcome::Commented(detail)),
        None => Ok(CommentOutcome::NoBook),
    }
}

/// Delete one book
pub fn delete_book(db: &Database, id: &str) -> Result<DeleteBookOutcome, String> {
    let id = match parse_id(id) {
        Some(id) => id,
        None => return Ok(DeleteBookOutcome::NoBook),
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let deleted = Book::delete(&conn, id).map_err(|e| format!("Failed to delete book: {}", e))?;

    if deleted {
        tracing::info!("Deleted book {}", id);
        Ok(DeleteBookOutcome::Deleted)
    } else {
        Ok(DeleteBookOutcome::NoBook)
    }
}
