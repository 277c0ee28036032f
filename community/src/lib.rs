// community/src/lib.rs

//! Farmer community forum: questions, answers, and their SQLite storage.

mod db;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use r2d2::Pool;
use rusqlite::{params, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use crate::db::DbPool;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub id: i64,
    pub author: String,
    pub answer: String,
    pub timestamp: DateTime<Utc>,
    pub upvotes: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub author: String,
    pub question: String,
    pub timestamp: DateTime<Utc>,
    /// Newest first.
    pub answers: Vec<Answer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewPost {
    pub author: String,
    pub question: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewAnswer {
    pub author: String,
    pub answer: String,
}

/// Handle to the forum database. Cheap to clone; clones share the pool.
///
/// All methods block on SQLite, so async callers should run them on a
/// blocking thread.
#[derive(Clone)]
pub struct CommunityForum {
    pool: DbPool,
}

impl CommunityForum {
    pub fn open(path: &Path) -> Result<Self, anyhow::Error> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let pool = Pool::new(db::manager(path))?;
        db::init_db(&pool)?;
        info!("[Community] Forum database opened at {}", path.display());
        Ok(Self { pool })
    }

    /// Opens `~/.kisan_advisor/community.db`.
    pub fn open_default() -> Result<Self, anyhow::Error> {
        let home_dir = dirs::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
        Self::open(&home_dir.join(".kisan_advisor").join("community.db"))
    }

    /// Every post, newest first, each with its answers.
    pub fn list_posts(&self) -> Result<Vec<Post>, anyhow::Error> {
        let conn = self.pool.get()?;

        let mut answers: HashMap<i64, Vec<Answer>> = HashMap::new();
        let mut stmt = conn.prepare(
            "SELECT post_id, id, author, answer, timestamp, upvotes FROM answers
             ORDER BY timestamp DESC, id DESC",
        )?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, i64>(0)?, answer_from_row(row, 1)?)))?;
        for row in rows {
            let (post_id, answer) = row?;
            answers.entry(post_id).or_default().push(answer);
        }

        let mut stmt =
            conn.prepare("SELECT id, author, question, timestamp FROM posts ORDER BY timestamp DESC, id DESC")?;
        let posts = stmt
            .query_map([], post_from_row)?
            .map(|row| {
                row.map(|mut post| {
                    post.answers = answers.remove(&post.id).unwrap_or_default();
                    post
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(posts)
    }

    pub fn get_post(&self, id: i64) -> Result<Option<Post>, anyhow::Error> {
        let conn = self.pool.get()?;
        let post = conn
            .query_row(
                "SELECT id, author, question, timestamp FROM posts WHERE id = ?1",
                params![id],
                post_from_row,
            )
            .optional()?;

        let Some(mut post) = post else {
            return Ok(None);
        };

        let mut stmt = conn.prepare(
            "SELECT id, author, answer, timestamp, upvotes FROM answers
             WHERE post_id = ?1 ORDER BY timestamp DESC, id DESC",
        )?;
        post.answers = stmt
            .query_map(params![id], |row| answer_from_row(row, 0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(post))
    }

    pub fn create_post(&self, new_post: NewPost) -> Result<Post, anyhow::Error> {
        let conn = self.pool.get()?;
        let now = Utc::now();
        conn.execute(
            "INSERT INTO posts (author, question, timestamp) VALUES (?1, ?2, ?3)",
            params![new_post.author, new_post.question, now],
        )?;
        let id = conn.last_insert_rowid();
        info!("[Community] Created post {} by '{}'", id, new_post.author);

        Ok(Post {
            id,
            author: new_post.author,
            question: new_post.question,
            timestamp: now,
            answers: Vec::new(),
        })
    }

    /// Adds an answer in front of the existing ones and returns the
    /// refreshed post, or `None` when the post does not exist.
    pub fn add_answer(&self, post_id: i64, new_answer: NewAnswer) -> Result<Option<Post>, anyhow::Error> {
        {
            let conn = self.pool.get()?;
            let exists = conn
                .query_row("SELECT 1 FROM posts WHERE id = ?1", params![post_id], |_| Ok(()))
                .optional()?
                .is_some();
            if !exists {
                return Ok(None);
            }

            conn.execute(
                "INSERT INTO answers (post_id, author, answer, timestamp) VALUES (?1, ?2, ?3, ?4)",
                params![post_id, new_answer.author, new_answer.answer, Utc::now()],
            )?;
            info!("[Community] Added answer {} to post {}", conn.last_insert_rowid(), post_id);
        }

        self.get_post(post_id)
    }

    /// Removes a post and its answers. `false` when there was nothing to delete.
    pub fn delete_post(&self, id: i64) -> Result<bool, anyhow::Error> {
        let conn = self.pool.get()?;
        let deleted = conn.execute("DELETE FROM posts WHERE id = ?1", params![id])?;
        if deleted > 0 {
            info!("[Community] Deleted post {}", id);
        }
        Ok(deleted > 0)
    }
}

fn post_from_row(row: &Row<'_>) -> rusqlite::Result<Post> {
    Ok(Post {
        id: row.get(0)?,
        author: row.get(1)?,
        question: row.get(2)?,
        timestamp: row.get(3)?,
        answers: Vec::new(),
    })
}

fn answer_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Answer> {
    Ok(Answer {
        id: row.get(offset)?,
        author: row.get(offset + 1)?,
        answer: row.get(offset + 2)?,
        timestamp: row.get(offset + 3)?,
        upvotes: row.get(offset + 4)?,
    })
}
