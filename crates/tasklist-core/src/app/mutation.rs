//! TaskMutationService - Task の作成・更新・削除と一覧
//!
//! 更新・削除は同じ Session の中で存在確認してから行う。

use std::sync::Arc;

use crate::domain::{NewTask, Task, TaskError, TaskId, TaskView};
use crate::observability::TaskCounts;
use crate::ports::Database;

pub struct TaskMutationService {
    db: Arc<dyn Database>,
}

impl TaskMutationService {
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }

    #[tracing::instrument(skip_all, fields(backend = self.db.backend()))]
    pub async fn create(&self, task: NewTask) -> Result<Task, TaskError> {
        let mut session = self.db.begin().await?;
        let created = session.tasks().create(task)?;
        session.commit()?;
        tracing::info!(task_id = %created.id, "task created");
        Ok(created)
    }

    /// Overwrite the title. `TaskNotFound` if the task does not exist.
    #[tracing::instrument(skip(self, title), fields(backend = self.db.backend()))]
    pub async fn update(&self, task_id: TaskId, title: Option<String>) -> Result<Task, TaskError> {
        let mut session = self.db.begin().await?;
        if session.tasks().get(task_id)?.is_none() {
            tracing::warn!("update of unknown task");
            return Err(TaskError::TaskNotFound(task_id));
        }
        let updated = session.tasks().update(task_id, title)?;
        session.commit()?;
        tracing::info!("task updated");
        Ok(updated)
    }

    /// Delete the task and its completion marker.
    #[tracing::instrument(skip(self), fields(backend = self.db.backend()))]
    pub async fn delete(&self, task_id: TaskId) -> Result<(), TaskError> {
        let mut session = self.db.begin().await?;
        if session.tasks().get(task_id)?.is_none() {
            tracing::warn!("delete of unknown task");
            return Err(TaskError::TaskNotFound(task_id));
        }
        session.tasks().delete(task_id)?;
        session.commit()?;
        tracing::info!("task deleted");
        Ok(())
    }

    /// Every task with its done flag, ordered by id.
    pub async fn list_all(&self) -> Result<Vec<TaskView>, TaskError> {
        let session = self.db.begin().await?;
        let views = session.query().list_with_done()?;
        tracing::debug!(count = views.len(), "listed tasks");
        Ok(views)
    }

    pub async fn get(&self, task_id: TaskId) -> Result<TaskView, TaskError> {
        let session = self.db.begin().await?;
        session
            .query()
            .get_with_done(task_id)?
            .ok_or(TaskError::TaskNotFound(task_id))
    }

    pub async fn counts_by_state(&self) -> Result<TaskCounts, TaskError> {
        let views = self.list_all().await?;
        Ok(TaskCounts::from_views(&views))
    }
}
