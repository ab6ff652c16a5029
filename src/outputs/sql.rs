//! Relational storage on SQLite.
//!
//! Each entry type has its own table named after the type (`Post`,
//! `Article`, `News`), created on connect if absent. Every [`Sink::add`]
//! is a single autocommitted `INSERT`; the row id is assigned by SQLite.

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::{debug, info, instrument};

use super::Sink;
use crate::error::SinkWriteError;
use crate::models::{Category, Entry};

const POST_COLUMNS: &str = "
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    date TEXT NOT NULL,
    author_link TEXT NOT NULL,
    author_name TEXT NOT NULL,
    tags TEXT NOT NULL,
    description TEXT NOT NULL";

const HEADING_COLUMNS: &str = ",
    reading_time TEXT NOT NULL,
    title TEXT NOT NULL,
    link TEXT NOT NULL";

/// Writes each entry as one row of its type's table.
pub struct SqlSink {
    pool: SqlitePool,
}

impl SqlSink {
    /// Connect and create the entry tables.
    ///
    /// # Example URLs
    /// - `sqlite://data.db?mode=rwc` - file database, created if missing
    /// - `sqlite::memory:` - in-memory database
    pub async fn connect(database_url: &str) -> Result<Self, SinkWriteError> {
        // One connection: an in-memory database is private to its connection.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await?;
        let sink = Self { pool };
        sink.create_tables().await?;
        info!(database_url, "Connected relational sink");
        Ok(sink)
    }

    async fn create_tables(&self) -> Result<(), SinkWriteError> {
        for category in Category::ALL {
            let extra = match category {
                Category::Posts => "",
                Category::Articles | Category::News => HEADING_COLUMNS,
            };
            let ddl = format!(
                r#"CREATE TABLE IF NOT EXISTS "{}" ({POST_COLUMNS}{extra})"#,
                category.type_name()
            );
            sqlx::query(&ddl).execute(&self.pool).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Sink for SqlSink {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    #[instrument(level = "debug", skip_all, fields(table = entry.type_name()))]
    async fn add(&self, entry: &Entry) -> Result<(), SinkWriteError> {
        let table = entry.type_name();
        let result = match entry.kind.heading() {
            None => {
                let sql = format!(
                    r#"INSERT INTO "{table}" (date, author_link, author_name, tags, description)
                       VALUES (?, ?, ?, ?, ?)"#
                );
                sqlx::query(&sql)
                    .bind(entry.date)
                    .bind(&entry.author_link)
                    .bind(&entry.author_name)
                    .bind(&entry.tags)
                    .bind(&entry.description)
                    .execute(&self.pool)
                    .await?
            }
            Some(heading) => {
                let sql = format!(
                    r#"INSERT INTO "{table}"
                       (date, author_link, author_name, tags, description, reading_time, title, link)
                       VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#
                );
                sqlx::query(&sql)
                    .bind(entry.date)
                    .bind(&entry.author_link)
                    .bind(&entry.author_name)
                    .bind(&entry.tags)
                    .bind(&entry.description)
                    .bind(&heading.reading_time)
                    .bind(&heading.title)
                    .bind(&heading.link)
                    .execute(&self.pool)
                    .await?
            }
        };
        debug!(id = result.last_insert_rowid(), "Inserted entry");
        Ok(())
    }
}
