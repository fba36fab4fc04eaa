//! Task records and the joined view.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{DueDate, TaskId};

/// A persisted task row.
///
/// Completion is not stored here. The `done` flag only exists on `TaskView`,
/// which is produced by joining tasks with the completion ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: Option<String>,
    pub due_date: Option<NaiveDate>,
}

/// Input for `TaskStore::create`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: Option<String>,
    pub due_date: Option<NaiveDate>,
}

impl NewTask {
    pub fn new(title: Option<String>, due_date: Option<DueDate>) -> Self {
        Self {
            title,
            due_date: due_date.map(NaiveDate::from),
        }
    }

    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            due_date: None,
        }
    }
}

/// Task + done flag (left outer join の 1 行分)。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskView {
    pub id: TaskId,
    pub title: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub done: bool,
}

impl TaskView {
    pub fn new(task: Task, done: bool) -> Self {
        Self {
            id: task.id,
            title: task.title,
            due_date: task.due_date,
            done,
        }
    }
}
