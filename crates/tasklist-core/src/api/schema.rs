//! Request / response bodies.
//!
//! 入力の検証はここで完結する。コアに届く `NewTask` の日付は常に正しい暦日。

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{DueDate, DueDateError, ErrorKind, NewTask, Task, TaskId, TaskView};

/// RequestError は境界での入力エラー（すべて Unprocessable）
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("invalid request body: {0}")]
    Body(#[from] serde_json::Error),

    #[error(transparent)]
    DueDate(#[from] DueDateError),
}

impl RequestError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Unprocessable
    }
}

/// Body of create and update requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCreate {
    pub title: Option<String>,
    pub due_date: Option<DueDate>,
}

impl TaskCreate {
    pub fn from_json(body: &str) -> Result<Self, RequestError> {
        Ok(serde_json::from_str(body)?)
    }

    /// Build from loose parts (CLI flags and the like).
    pub fn from_parts(title: Option<String>, due_date: Option<&str>) -> Result<Self, RequestError> {
        let due_date = due_date.map(str::parse::<DueDate>).transpose()?;
        Ok(Self { title, due_date })
    }

    pub fn into_new_task(self) -> NewTask {
        NewTask::new(self.title, self.due_date)
    }
}

/// Response of create and update: the row without the done flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCreateResponse {
    pub id: TaskId,
    pub title: Option<String>,
    pub due_date: Option<NaiveDate>,
}

impl From<Task> for TaskCreateResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            due_date: task.due_date,
        }
    }
}

/// One element of the list response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResponse {
    pub id: TaskId,
    pub title: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub done: bool,
}

impl From<TaskView> for TaskResponse {
    fn from(view: TaskView) -> Self {
        Self {
            id: view.id,
            title: view.title,
            due_date: view.due_date,
            done: view.done,
        }
    }
}
