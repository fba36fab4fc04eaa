//! TaskStore port - Task 行の正本
//!
//! Task 行を所有するのはこの port だけ。完了マーカーには触れない
//! （削除時のカスケードはストレージの参照整合性として扱う）。

use crate::domain::{NewTask, Task, TaskError, TaskId};

/// TaskStore は Task 行の CRUD を提供
///
/// # 前提
/// - update / delete は呼び出し側が存在確認を済ませている
/// - delete は同じ unit of work 内で該当 ID の完了マーカーも消す
pub trait TaskStore {
    /// Insert a row and return it with its assigned id.
    fn create(&mut self, task: NewTask) -> Result<Task, TaskError>;

    /// Point lookup. Absence is `Ok(None)`, not an error.
    fn get(&self, id: TaskId) -> Result<Option<Task>, TaskError>;

    /// Overwrite the title of an existing row.
    fn update(&mut self, id: TaskId, title: Option<String>) -> Result<Task, TaskError>;

    /// Remove the row and its completion marker.
    fn delete(&mut self, id: TaskId) -> Result<(), TaskError>;

    /// All rows, ordered by id.
    fn list(&self) -> Result<Vec<Task>, TaskError>;
}
