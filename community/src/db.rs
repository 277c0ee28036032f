use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Result;
use std::path::Path;
use tracing::info;

pub type DbPool = r2d2::Pool<SqliteConnectionManager>;

/// Connection manager with foreign keys enforced on every pooled connection,
/// so deleting a post removes its answers.
pub fn manager(path: &Path) -> SqliteConnectionManager {
    SqliteConnectionManager::file(path).with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"))
}

/// Creates the forum tables if they do not exist yet.
pub fn init_db(pool: &DbPool) -> anyhow::Result<()> {
    let conn = pool.get()?;
    create_tables(&conn)?;
    info!("[Community-DB] Database initialized; 'posts' and 'answers' tables ready.");
    Ok(())
}

fn create_tables(conn: &rusqlite::Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS posts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            author TEXT NOT NULL DEFAULT '',
            question TEXT NOT NULL DEFAULT '',
            timestamp DATETIME NOT NULL
        );
        CREATE TABLE IF NOT EXISTS answers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            post_id INTEGER NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
            author TEXT NOT NULL DEFAULT '',
            answer TEXT NOT NULL DEFAULT '',
            timestamp DATETIME NOT NULL,
            upvotes INTEGER NOT NULL DEFAULT 0
        );
        CREATE INDEX IF NOT EXISTS idx_answers_post_id ON answers(post_id);",
    )
}
