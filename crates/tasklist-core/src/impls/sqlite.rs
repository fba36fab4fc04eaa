//! SQLite database implementation.
//!
//! # スキーマ
//! - `tasks`: id (AUTOINCREMENT なので再利用されない), title, due_date
//! - `dones`: task_id が主キー（1 タスク 1 マーカー）、tasks への外部キーで ON DELETE CASCADE
//!
//! Session は `BEGIN IMMEDIATE` のトランザクション。commit されずに drop されたら ROLLBACK する。

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, Row, params};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::{NewTask, Task, TaskError, TaskId, TaskView};
use crate::ports::{CompletionLedger, Database, Session, TaskQuery, TaskStore};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS tasks (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      title TEXT,
      due_date TEXT
    );

    CREATE TABLE IF NOT EXISTS dones (
      task_id INTEGER PRIMARY KEY REFERENCES tasks(id) ON DELETE CASCADE
    );
"#;

fn storage(err: rusqlite::Error) -> TaskError {
    TaskError::storage(err)
}

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: TaskId::new(row.get(0)?),
        title: row.get(1)?,
        due_date: row.get(2)?,
    })
}

fn view_from_row(row: &Row<'_>) -> rusqlite::Result<TaskView> {
    let task = task_from_row(row)?;
    let done: bool = row.get(3)?;
    Ok(TaskView::new(task, done))
}

/// SQLite-backed database.
///
/// One connection, shared behind a tokio Mutex; a session owns it exclusively.
pub struct SqliteDatabase {
    path: Option<PathBuf>,
    conn: Arc<Mutex<Connection>>,
}

impl SqliteDatabase {
    /// Open (or create) a database file and migrate it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TaskError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(TaskError::storage)?;
        }
        let conn = Connection::open(&path).map_err(storage)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(storage)?;
        tracing::debug!(path = %path.display(), "opened sqlite database");
        Self::migrate(conn, Some(path))
    }

    /// Private in-memory database (lives as long as this value).
    pub fn open_in_memory() -> Result<Self, TaskError> {
        let conn = Connection::open_in_memory().map_err(storage)?;
        Self::migrate(conn, None)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn migrate(conn: Connection, path: Option<PathBuf>) -> Result<Self, TaskError> {
        // foreign_keys はトランザクション外でしか切り替えられない
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(storage)?;
        conn.execute_batch(SCHEMA).map_err(storage)?;
        Ok(Self {
            path,
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

#[async_trait]
impl Database for SqliteDatabase {
    async fn begin(&self) -> Result<Box<dyn Session>, TaskError> {
        let conn = Arc::clone(&self.conn).lock_owned().await;
        conn.execute_batch("BEGIN IMMEDIATE;").map_err(storage)?;
        Ok(Box::new(SqliteSession {
            conn,
            finished: false,
        }))
    }

    fn backend(&self) -> &'static str {
        "sqlite"
    }
}

/// One `BEGIN IMMEDIATE` transaction.
struct SqliteSession {
    conn: OwnedMutexGuard<Connection>,
    finished: bool,
}

impl Session for SqliteSession {
    fn tasks(&mut self) -> Box<dyn TaskStore + '_> {
        Box::new(SqliteTasks { conn: &self.conn })
    }

    fn ledger(&mut self) -> Box<dyn CompletionLedger + '_> {
        Box::new(SqliteLedger { conn: &self.conn })
    }

    fn query(&self) -> Box<dyn TaskQuery + '_> {
        Box::new(SqliteQuery { conn: &self.conn })
    }

    fn commit(mut self: Box<Self>) -> Result<(), TaskError> {
        self.conn.execute_batch("COMMIT;").map_err(storage)?;
        self.finished = true;
        Ok(())
    }
}

impl Drop for SqliteSession {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Err(err) = self.conn.execute_batch("ROLLBACK;") {
            tracing::error!(error = %err, "rollback failed");
        }
    }
}

struct SqliteTasks<'a> {
    conn: &'a Connection,
}

impl TaskStore for SqliteTasks<'_> {
    fn create(&mut self, task: NewTask) -> Result<Task, TaskError> {
        self.conn
            .execute(
                "INSERT INTO tasks (title, due_date) VALUES (?1, ?2)",
                params![task.title, task.due_date],
            )
            .map_err(storage)?;
        Ok(Task {
            id: TaskId::new(self.conn.last_insert_rowid()),
            title: task.title,
            due_date: task.due_date,
        })
    }

    fn get(&self, id: TaskId) -> Result<Option<Task>, TaskError> {
        self.conn
            .query_row(
                "SELECT id, title, due_date FROM tasks WHERE id = ?1",
                params![id.get()],
                task_from_row,
            )
            .optional()
            .map_err(storage)
    }

    fn update(&mut self, id: TaskId, title: Option<String>) -> Result<Task, TaskError> {
        let changed = self
            .conn
            .execute(
                "UPDATE tasks SET title = ?1 WHERE id = ?2",
                params![title, id.get()],
            )
            .map_err(storage)?;
        if changed == 0 {
            return Err(TaskError::TaskNotFound(id));
        }
        self.get(id)?.ok_or(TaskError::TaskNotFound(id))
    }

    fn delete(&mut self, id: TaskId) -> Result<(), TaskError> {
        // dones は外部キーの ON DELETE CASCADE で消える
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id.get()])
            .map_err(storage)?;
        if changed == 0 {
            return Err(TaskError::TaskNotFound(id));
        }
        Ok(())
    }

    fn list(&self) -> Result<Vec<Task>, TaskError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title, due_date FROM tasks ORDER BY id")
            .map_err(storage)?;
        let rows = stmt.query_map([], task_from_row).map_err(storage)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(storage)
    }
}

struct SqliteLedger<'a> {
    conn: &'a Connection,
}

impl CompletionLedger for SqliteLedger<'_> {
    fn mark(&mut self, task_id: TaskId) -> Result<(), TaskError> {
        let inserted = self
            .conn
            .execute(
                "INSERT INTO dones (task_id) VALUES (?1) ON CONFLICT(task_id) DO NOTHING",
                params![task_id.get()],
            )
            .map_err(storage)?;
        if inserted == 0 {
            return Err(TaskError::AlreadyDone(task_id));
        }
        Ok(())
    }

    fn unmark(&mut self, task_id: TaskId) -> Result<(), TaskError> {
        let removed = self
            .conn
            .execute("DELETE FROM dones WHERE task_id = ?1", params![task_id.get()])
            .map_err(storage)?;
        if removed == 0 {
            return Err(TaskError::NotDone(task_id));
        }
        Ok(())
    }

    fn is_done(&self, task_id: TaskId) -> Result<bool, TaskError> {
        self.conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM dones WHERE task_id = ?1)",
                params![task_id.get()],
                |row| row.get(0),
            )
            .map_err(storage)
    }
}

struct SqliteQuery<'a> {
    conn: &'a Connection,
}

const SELECT_WITH_DONE: &str = "SELECT tasks.id, tasks.title, tasks.due_date, dones.task_id IS NOT NULL
     FROM tasks
     LEFT OUTER JOIN dones ON dones.task_id = tasks.id";

impl TaskQuery for SqliteQuery<'_> {
    fn list_with_done(&self) -> Result<Vec<TaskView>, TaskError> {
        let sql = format!("{SELECT_WITH_DONE} ORDER BY tasks.id");
        let mut stmt = self.conn.prepare(&sql).map_err(storage)?;
        let rows = stmt.query_map([], view_from_row).map_err(storage)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(storage)
    }

    fn get_with_done(&self, id: TaskId) -> Result<Option<TaskView>, TaskError> {
        let sql = format!("{SELECT_WITH_DONE} WHERE tasks.id = ?1");
        self.conn
            .query_row(&sql, params![id.get()], view_from_row)
            .optional()
            .map_err(storage)
    }
}
