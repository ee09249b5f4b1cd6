//! SQLite persistence for projects and feedback.
//!
//! One connection shared behind a mutex; every call is a single statement or
//! a short transaction, so holding the lock across it is fine.

use crate::error::{FeedbackError, Result};
use crate::models::{Feedback, NewFeedback, NewProject, Project, Vote};
use crate::recommendation::FeedbackType;
use chrono::Utc;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

/// Current schema version
pub const SCHEMA_VERSION: i64 = 1;

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS projects (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    url TEXT,
    feedback_type TEXT NOT NULL CHECK (feedback_type IN ('hustler', 'hipster', 'hacker')),
    owner_token TEXT NOT NULL,
    notification_email TEXT,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_projects_created ON projects(created_at);

CREATE TABLE IF NOT EXISTS feedback (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL,
    feedback TEXT NOT NULL,
    type TEXT NOT NULL CHECK (type IN ('hustler', 'hipster', 'hacker')),
    helpful INTEGER NOT NULL DEFAULT 0,
    not_helpful INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE
);
CREATE INDEX IF NOT EXISTS idx_feedback_project ON feedback(project_id);
";

const PROJECT_COLUMNS: &str =
    "id, title, description, url, feedback_type, owner_token, notification_email, created_at";
const FEEDBACK_COLUMNS: &str = "id, project_id, feedback, type, helpful, not_helpful, created_at";

impl ToSql for FeedbackType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for FeedbackType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

fn project_from_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        url: row.get(3)?,
        feedback_type: row.get(4)?,
        owner_token: row.get(5)?,
        notification_email: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn feedback_from_row(row: &Row<'_>) -> rusqlite::Result<Feedback> {
    Ok(Feedback {
        id: row.get(0)?,
        project_id: row.get(1)?,
        feedback: row.get(2)?,
        feedback_type: row.get(3)?,
        helpful: row.get(4)?,
        not_helpful: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Handle to the project/feedback database
#[derive(Debug, Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
    path: String,
}

impl Store {
    /// Open or create a database at `path` (":memory:" for a private in-memory one)
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let conn = if path_str == ":memory:" {
            Connection::open_in_memory()?
        } else {
            Connection::open(&path_str)?
        };
        init_schema(&conn)?;
        info!("Opened feedback store at {}", path_str);
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: path_str,
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::open(":memory:")
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| FeedbackError::Internal {
            message: "store connection mutex poisoned".into(),
        })
    }

    /// All projects, newest first
    pub fn list_projects(&self) -> Result<Vec<Project>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY created_at DESC, rowid DESC"
        ))?;
        let rows = stmt.query_map([], project_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn get_project(&self, id: &str) -> Result<Option<Project>> {
        let conn = self.lock()?;
        let project = conn
            .query_row(
                &format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?1"),
                [id],
                project_from_row,
            )
            .optional()?;
        Ok(project)
    }

    pub fn create_project(&self, new: NewProject) -> Result<Project> {
        let project = Project {
            id: generate_id(),
            title: new.title,
            description: new.description,
            url: new.url,
            feedback_type: new.feedback_type,
            created_at: Utc::now(),
            owner_token: new.owner_token,
            notification_email: new.notification_email,
        };
        let conn = self.lock()?;
        conn.execute(
            &format!("INSERT INTO projects ({PROJECT_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"),
            params![
                project.id,
                project.title,
                project.description,
                project.url,
                project.feedback_type,
                project.owner_token,
                project.notification_email,
                project.created_at,
            ],
        )?;
        debug!("Inserted project {}", project.id);
        Ok(project)
    }

    /// Insert feedback; `NotFound` when the project does not exist
    pub fn create_feedback(&self, new: NewFeedback) -> Result<Feedback> {
        let feedback = Feedback {
            id: generate_id(),
            project_id: new.project_id,
            feedback: new.feedback,
            feedback_type: new.feedback_type,
            helpful: 0,
            not_helpful: 0,
            created_at: Utc::now(),
        };
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let exists: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM projects WHERE id = ?1)",
            [&feedback.project_id],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(FeedbackError::not_found("Project"));
        }
        tx.execute(
            &format!("INSERT INTO feedback ({FEEDBACK_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
            params![
                feedback.id,
                feedback.project_id,
                feedback.feedback,
                feedback.feedback_type,
                feedback.helpful,
                feedback.not_helpful,
                feedback.created_at,
            ],
        )?;
        tx.commit()?;
        debug!(
            "Inserted feedback {} for project {}",
            feedback.id, feedback.project_id
        );
        Ok(feedback)
    }

    /// Feedback for one project, newest first
    pub fn feedback_for_project(&self, project_id: &str) -> Result<Vec<Feedback>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {FEEDBACK_COLUMNS} FROM feedback WHERE project_id = ?1 \
             ORDER BY created_at DESC, rowid DESC"
        ))?;
        let rows = stmt.query_map([project_id], feedback_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn get_feedback(&self, id: &str) -> Result<Option<Feedback>> {
        let conn = self.lock()?;
        let feedback = conn
            .query_row(
                &format!("SELECT {FEEDBACK_COLUMNS} FROM feedback WHERE id = ?1"),
                [id],
                feedback_from_row,
            )
            .optional()?;
        Ok(feedback)
    }

    /// Increment one vote counter; None when the feedback id is unknown
    pub fn vote(&self, id: &str, vote: Vote) -> Result<Option<Feedback>> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let column = vote.column();
        let changed = tx.execute(
            &format!("UPDATE feedback SET {column} = {column} + 1 WHERE id = ?1"),
            [id],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        let updated = tx.query_row(
            &format!("SELECT {FEEDBACK_COLUMNS} FROM feedback WHERE id = ?1"),
            [id],
            feedback_from_row,
        )?;
        tx.commit()?;
        Ok(Some(updated))
    }

    /// (projects, feedback) row counts
    pub fn counts(&self) -> Result<(u64, u64)> {
        let conn = self.lock()?;
        let projects: i64 = conn.query_row("SELECT COUNT(*) FROM projects", [], |r| r.get(0))?;
        let feedback: i64 = conn.query_row("SELECT COUNT(*) FROM feedback", [], |r| r.get(0))?;
        Ok((projects.max(0) as u64, feedback.max(0) as u64))
    }
}

/// Create tables if missing and record the schema version
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = 5000;",
    )?;
    conn.execute_batch(SCHEMA_SQL)?;

    let count: i64 = conn.query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))?;
    if count == 0 {
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            [SCHEMA_VERSION],
        )?;
    }
    Ok(())
}
