//! TaskApi - 境界の操作表
//!
//! | operation | success | failure |
//! |---|---|---|
//! | list_tasks | `Vec<TaskResponse>` | none |
//! | create_task | `TaskCreateResponse` | 422（本文の検証、コア到達前） |
//! | update_task | `TaskCreateResponse` | 404 Task not found |
//! | delete_task | `()` | 404 Task not found |
//! | mark_task_as_done | `()` | 404 Task not found / 400 Done already exists |
//! | unmark_task_as_done | `()` | 404 Done not found |

use super::{ApiError, TaskCreate, TaskCreateResponse, TaskResponse};
use crate::app::App;
use crate::domain::TaskId;
use crate::observability::TaskCounts;

pub type ApiResult<T> = Result<T, ApiError>;

pub struct TaskApi {
    app: App,
}

impl TaskApi {
    pub fn new(app: App) -> Self {
        Self { app }
    }

    pub async fn list_tasks(&self) -> ApiResult<Vec<TaskResponse>> {
        let views = self.app.tasks.list_all().await?;
        Ok(views.into_iter().map(TaskResponse::from).collect())
    }

    pub async fn get_task(&self, task_id: TaskId) -> ApiResult<TaskResponse> {
        Ok(self.app.tasks.get(task_id).await?.into())
    }

    pub async fn create_task(&self, body: TaskCreate) -> ApiResult<TaskCreateResponse> {
        let task = self.app.tasks.create(body.into_new_task()).await?;
        Ok(task.into())
    }

    /// Validate a raw JSON body, then create.
    pub async fn create_task_json(&self, body: &str) -> ApiResult<TaskCreateResponse> {
        let body = TaskCreate::from_json(body)?;
        self.create_task(body).await
    }

    /// Only the title is written; `due_date` in the body is validated and ignored.
    pub async fn update_task(
        &self,
        task_id: TaskId,
        body: TaskCreate,
    ) -> ApiResult<TaskCreateResponse> {
        let task = self.app.tasks.update(task_id, body.title).await?;
        Ok(task.into())
    }

    pub async fn update_task_json(
        &self,
        task_id: TaskId,
        body: &str,
    ) -> ApiResult<TaskCreateResponse> {
        let body = TaskCreate::from_json(body)?;
        self.update_task(task_id, body).await
    }

    pub async fn delete_task(&self, task_id: TaskId) -> ApiResult<()> {
        Ok(self.app.tasks.delete(task_id).await?)
    }

    pub async fn mark_task_as_done(&self, task_id: TaskId) -> ApiResult<()> {
        self.app.completion.mark_done(task_id).await?;
        Ok(())
    }

    pub async fn unmark_task_as_done(&self, task_id: TaskId) -> ApiResult<()> {
        self.app.completion.unmark_done(task_id).await?;
        Ok(())
    }

    pub async fn stats(&self) -> ApiResult<TaskCounts> {
        Ok(self.app.tasks.counts_by_state().await?)
    }
}
