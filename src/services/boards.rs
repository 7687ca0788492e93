//! Anonymous message board service
//!
//! Threads and replies are posted with a delete password, which is hashed
//! before it reaches storage. Deleting a reply keeps it in place with its
//! text replaced by [`DELETED_TEXT`](crate::models::DELETED_TEXT).

use std::fmt;

use crate::db::{now_timestamp, Database};
use crate::models::{Reply, Thread};

use super::{parse_id, present, sha256_hex, MISSING_REQUIRED_FIELDS};

/// Threads shown on a board page
pub const BOARD_THREAD_LIMIT: i64 = 10;

/// Replies shown under each thread on a board page
pub const BOARD_REPLY_LIMIT: i64 = 3;

/// Reply text for a thread lookup that found nothing
pub const NO_THREAD_EXISTS: &str = "no thread exists";

/// Result of a board write
#[derive(Debug)]
pub enum BoardOutcome {
    ThreadCreated(Thread),
    ReplyCreated { thread_id: i64, reply: Reply },
    Success,
    MissingRequiredFields,
    CouldNotUpdateThread(String),
    IncorrectThreadCredentials,
    IncorrectReplyId,
    IncorrectReplyCredentials,
}

impl fmt::Display for BoardOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardOutcome::ThreadCreated(thread) => write!(f, "created thread {}", thread.id),
            BoardOutcome::ReplyCreated { thread_id, reply } => {
                write!(f, "created reply {} on thread {}", reply.id, thread_id)
            }
            BoardOutcome::Success => f.write_str("success"),
            BoardOutcome::MissingRequiredFields => f.write_str(MISSING_REQUIRED_FIELDS),
            BoardOutcome::CouldNotUpdateThread(id) => write!(f, "could not update thread {}", id),
            BoardOutcome::IncorrectThreadCredentials => {
                f.write_str("incorrect board, thread_id or password")
            }
            BoardOutcome::IncorrectReplyId => f.write_str("incorrect board, thread_id or reply_id"),
            BoardOutcome::IncorrectReplyCredentials => {
                f.write_str("incorrect board, thread_id, reply_id or password")
            }
        }
    }
}

// ============================================================================
// Threads
// ============================================================================

/// The most recently bumped threads of a board with their latest replies
pub fn list_threads(db: &Database, board: &str) -> Result<Vec<Thread>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    Thread::list_recent(&conn, board, BOARD_THREAD_LIMIT, BOARD_REPLY_LIMIT)
        .map_err(|e| format!("Failed to list threads: {}", e))
}

/// Start a thread
pub fn create_thread(
    db: &Database,
    board: &str,
    text: Option<&str>,
    delete_password: Option<&str>,
) -> Result<BoardOutcome, String> {
    let (text, password) = match (present(text), present(delete_password)) {
        (Some(text), Some(password)) => (text, password),
        _ => return Ok(BoardOutcome::MissingRequiredFields),
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let thread = Thread::create(&conn, board, text, &sha256_hex(password))
        .map_err(|e| format!("Failed to create thread: {}", e))?;

    tracing::info!("Created thread {} on board '{}'", thread.id, board);
    Ok(BoardOutcome::ThreadCreated(thread))
}

/// Report a thread
pub fn report_thread(db: &Database, board: &str, thread_id: Option<&str>) -> Result<BoardOutcome, String> {
    let raw_id = match present(thread_id) {
        Some(raw) => raw,
        None => return Ok(BoardOutcome::MissingRequiredFields),
    };

    let id = match parse_id(raw_id) {
        Some(id) => id,
        None => return Ok(BoardOutcome::CouldNotUpdateThread(raw_id.to_string())),
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let reported = Thread::report(&conn, board, id)
        .map_err(|e| format!("Failed to report thread: {}", e))?;

    if reported {
        tracing::info!("Thread {} on board '{}' reported", id, board);
        Ok(BoardOutcome::Success)
    } else {
        Ok(BoardOutcome::CouldNotUpdateThread(raw_id.to_string()))
    }
}

/// Delete a thread and its replies
pub fn delete_thread(
    db: &Database,
    board: &str,
    thread_id: Option<&str>,
    delete_password: Option<&str>,
) -> Result<BoardOutcome, String> {
    let (raw_id, password) = match (present(thread_id), present(delete_password)) {
        (Some(raw), Some(password)) => (raw, password),
        _ => return Ok(BoardOutcome::MissingRequiredFields),
    };

    let id = match parse_id(raw_id) {
        Some(id) => id,
        None => return Ok(BoardOutcome::IncorrectThreadCredentials),
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let deleted = Thread::delete(&conn, board, id, &sha256_hex(password))
        .map_err(|e| format!("Failed to delete thread: {}", e))?;

    if deleted {
        tracing::info!("Deleted thread {} from board '{}'", id, board);
        Ok(BoardOutcome::Success)
    } else {
        Ok(BoardOutcome::IncorrectThreadCredentials)
    }
}

// ============================================================================
// Replies
// ============================================================================

/// A whole thread with every reply
pub fn get_thread(db: &Database, board: &str, thread_id: Option<&str>) -> Result<Option<Thread>, String> {
    let id = match present(thread_id).and_then(parse_id) {
        Some(id) => id,
        None => return Ok(None),
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    Thread::get_with_replies(&conn, board, id).map_err(|e| format!("Failed to get thread: {}", e))
}

/// Reply to a thread, bumping it to the top of the board
pub fn create_reply(
    db: &Database,
    board: &str,
    thread_id: Option<&str>,
    text: Option<&str>,
    delete_password: Option<&str>,
) -> Result<BoardOutcome, String> {
    let (raw_id, text, password) = match (present(thread_id), present(text), present(delete_password)) {
        (Some(raw), Some(text), Some(password)) => (raw, text, password),
        _ => return Ok(BoardOutcome::MissingRequiredFields),
    };

    let id = match parse_id(raw_id) {
        Some(id) => id,
        None => return Ok(BoardOutcome::CouldNotUpdateThread(raw_id.to_string())),
    };

    let password_hash = sha256_hex(password);

    let reply = db
        .with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            if Thread::get_by_id(&tx, board, id)?.is_none() {
                return Ok(None);
            }

            let created_on = now_timestamp();
            let reply = Reply::create(&tx, id, text, &password_hash, &created_on)?;
            Thread::bump(&tx, board, id, &created_on)?;

            tx.commit()?;
            Ok(Some(reply))
        })
        .map_err(|e| format!("Failed to add reply: {}", e))?;

    match reply {
        Some(reply) => {
            tracing::info!("Added reply {} to thread {} on board '{}'", reply.id, id, board);
            Ok(BoardOutcome::ReplyCreated { thread_id: id, reply })
        }
        None => Ok(BoardOutcome::CouldNotUpdateThread(raw_id.to_string())),
    }
}

/// Report a reply
pub fn report_reply(
    db: &Database,
    board: &str,
    thread_id: Option<&str>,
    reply_id: Option<&str>,
) -> Result<BoardOutcome, String> {
    let (thread_id, reply_id) = match (present(thread_id), present(reply_id)) {
        (Some(thread_id), Some(reply_id)) => (thread_id, reply_id),
        _ => return Ok(BoardOutcome::MissingRequiredFields),
    };

    let (thread_id, reply_id) = match (parse_id(thread_id), parse_id(reply_id)) {
        (Some(thread_id), Some(reply_id)) => (thread_id, reply_id),
        _ => return Ok(BoardOutcome::IncorrectReplyId),
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let reported = Reply::report(&conn, board, thread_id, reply_id)
        .map_err(|e| format!("Failed to report reply: {}", e))?;

    if reported {
        tracing::info!("Reply {} on thread {} reported", reply_id, thread_id);
        Ok(BoardOutcome::Success)
    } else {
        Ok(BoardOutcome::IncorrectReplyId)
    }
}

/// Mark a reply as deleted
pub fn delete_reply(
    db: &Database,
    board: &str,
    thread_id: Option<&str>,
    reply_id: Option<&str>,
    delete_password: Option<&str>,
) -> Result<BoardOutcome, String> {
    let (thread_id, reply_id, password) =
        match (present(thread_id), present(reply_id), present(delete_password)) {
            (Some(thread_id), Some(reply_id), Some(password)) => (thread_id, reply_id, password),
            _ => return Ok(BoardOutcome::MissingRequiredFields),
        };

    let (thread_id, reply_id) = match (parse_id(thread_id), parse_id(reply_id)) {
        (Some(thread_id), Some(reply_id)) => (thread_id, reply_id),
        _ => return Ok(BoardOutcome::IncorrectReplyCredentials),
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let deleted = Reply::soft_delete(&conn, board, thread_id, reply_id, &sha256_hex(password))
        .map_err(|e| format!("Failed to delete reply: {}", e))?;

    if deleted {
        tracing::info!("Reply {} on thread {} deleted", reply_id, thread_id);
        Ok(BoardOutcome::Success)
    } else {
        Ok(BoardOutcome::IncorrectReplyCredentials)
    }
}
