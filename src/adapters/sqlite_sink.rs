//! SQLite persistence sink.
//!
//! Schema:
//! - `news`: one row per approved item
//! - `categories`: unique by exact (case-sensitive) name
//! - `news_categories`: many-to-many association

use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use super::{NewsSink, PersistedId, SinkError};
use crate::domain::NewsItem;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS news (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    source TEXT NOT NULL,
    relevance_score REAL NOT NULL,
    language TEXT NOT NULL,
    summary TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS news_categories (
    news_id INTEGER NOT NULL REFERENCES news(id) ON DELETE CASCADE,
    category_id INTEGER NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
    PRIMARY KEY (news_id, category_id)
);
"#;

/// SQLite-backed sink
pub struct SqliteSink {
    conn: Connection,
}

impl SqliteSink {
    /// Open (or create) a database file and ensure the schema exists
    pub fn open(path: &Path) -> Result<Self, SinkError> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// In-memory database (tests, dry runs)
    pub fn open_in_memory() -> Result<Self, SinkError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, SinkError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Number of stored news rows
    pub fn news_count(&self) -> Result<usize, SinkError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM news", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Number of distinct categories
    pub fn category_count(&self) -> Result<usize, SinkError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Category names linked to a news row, ordered by category id
    pub fn categories_for(&self, news_id: PersistedId) -> Result<Vec<String>, SinkError> {
        let mut stmt = self.conn.prepare(
            "SELECT c.name FROM categories c
             JOIN news_categories nc ON nc.category_id = c.id
             WHERE nc.news_id = ?1
             ORDER BY c.id",
        )?;
        let names = stmt
            .query_map(params![news_id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }

    /// Stored content of a news row
    pub fn content_of(&self, news_id: PersistedId) -> Result<Option<String>, SinkError> {
        let content = self
            .conn
            .query_row(
                "SELECT content FROM news WHERE id = ?1",
                params![news_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(content)
    }
}

fn insert_news_row(conn: &Connection, item: &NewsItem) -> Result<PersistedId, SinkError> {
    if !(0.0..=1.0).contains(&item.relevance_score) {
        return Err(SinkError::InvalidItem(format!(
            "relevance score out of range ({})",
            item.relevance_score
        )));
    }

    conn.execute(
        "INSERT INTO news (title, content, source, relevance_score, language, summary, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            item.title,
            item.content,
            item.source,
            item.relevance_score,
            item.language,
            item.summary,
            Utc::now().to_rfc3339(),
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

fn upsert_category(conn: &Connection, name: &str) -> Result<PersistedId, SinkError> {
    conn.execute(
        "INSERT OR IGNORE INTO categories (name) VALUES (?1)",
        params![name],
    )?;
    let id = conn.query_row(
        "SELECT id FROM categories WHERE name = ?1",
        params![name],
        |row| row.get(0),
    )?;
    Ok(id)
}

impl NewsSink for SqliteSink {
    fn insert_news(&mut self, item: &NewsItem) -> Result<PersistedId, SinkError> {
        insert_news_row(&self.conn, item)
    }

    fn insert_category(&mut self, name: &str) -> Result<PersistedId, SinkError> {
        upsert_category(&self.conn, name)
    }

    fn persist(&mut self, item: &NewsItem) -> Result<PersistedId, SinkError> {
        let tx = self.conn.transaction()?;

        let news_id = insert_news_row(&tx, item)?;
        for name in &item.categories {
            let category_id = upsert_category(&tx, name)?;
            tx.execute(
                "INSERT OR IGNORE INTO news_categories (news_id, category_id) VALUES (?1, ?2)",
                params![news_id, category_id],
            )?;
        }

        tx.commit()?;
        debug!(news_id, categories = item.categories.len(), "Persisted news item");

        Ok(news_id)
    }
}
