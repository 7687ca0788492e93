//! Stock model
//!
//! Last fetched price per symbol and the set of clients that liked it.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{now_timestamp, DbResult};

/// A stock with its like count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stock {
    pub symbol: String,
    pub price: f64,
    pub likes: i64,
    pub updated_on: String,
}

impl Stock {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            symbol: row.get("symbol")?,
            price: row.get("price")?,
            likes: row.get("likes")?,
            updated_on: row.get("updated_on")?,
        })
    }

    /// Get a stock by symbol
    pub fn get(conn: &Connection, symbol: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT s.symbol, s.price, s.updated_on,
                   (SELECT COUNT(*) FROM stock_likes l WHERE l.symbol = s.symbol) AS likes
            FROM stocks s
            WHERE s.symbol = ?1
            "#
        )?;

        let result = stmt.query_row([symbol], Self::from_row);
        match result {
            Ok(stock) => Ok(Some(stock)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Insert or refresh the stored price for a symbol
    pub fn upsert_price(conn: &Connection, symbol: &str, price: f64) -> DbResult<()> {
        conn.execute(
            r#"
            INSERT INTO stocks (symbol, price, updated_on) VALUES (?1, ?2, ?3)
            ON CONFLICT(symbol) DO UPDATE SET price = excluded.price, updated_on = excluded.updated_on
            "#,
            params![symbol, price, now_timestamp()],
        )?;
        Ok(())
    }

    /// Record a like from a client
    /// Returns Ok(false) if this client already liked the symbol
    pub fn add_like(conn: &Connection, symbol: &str, ip_hash: &str) -> DbResult<bool> {
        let rows = conn.execute(
            "INSERT OR IGNORE INTO stock_likes (symbol, ip_hash, created_on) VALUES (?1, ?2, ?3)",
            params![symbol, ip_hash, now_timestamp()],
        )?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[test]
    fn test_upsert_refreshes_price() {
        let db = Database::in_memory().unwrap();
        let conn = db.get_conn().unwrap();

        Stock::upsert_price(&conn, "GOOG", 100.0).unwrap();
        Stock::upsert_price(&conn, "GOOG", 101.5).unwrap();

        let stock = Stock::get(&conn, "GOOG").unwrap().unwrap();
        assert_eq!(stock.price, 101.5);
        assert_eq!(stock.likes, 0);
    }

    #[test]
    fn test_likes_are_deduplicated() {
        let db = Database::in_memory().unwrap();
        let conn = db.get_conn().unwrap();

        Stock::upsert_price(&conn, "AAPL", 10.0).unwrap();
        assert!(Stock::add_like(&conn, "AAPL", "abc").unwrap());
        assert!(!Stock::add_like(&conn, "AAPL", "abc").unwrap());
        assert!(Stock::add_like(&conn, "AAPL", "def").unwrap());

        assert_eq!(Stock::get(&conn, "AAPL").unwrap().unwrap().likes, 2);
    }

    #[test]
    fn test_unknown_symbol() {
        let db = Database::in_memory().unwrap();
        let conn = db.get_conn().unwrap();
        assert!(Stock::get(&conn, "NOPE").unwrap().is_none());
    }
}
