//! CompletionLedger port - 完了マーカーの集合
//!
//! マーカーがある = done、ない = not done。ペイロードは持たない。

use crate::domain::{TaskError, TaskId};

/// CompletionLedger は task_id ごとに高々 1 つのマーカーを管理
///
/// タスクの存在確認はしない。それは呼び出し側（状態機械）の責務。
pub trait CompletionLedger {
    /// Insert a marker. `AlreadyDone` if one exists.
    fn mark(&mut self, task_id: TaskId) -> Result<(), TaskError>;

    /// Delete the marker. `NotDone` if none exists.
    fn unmark(&mut self, task_id: TaskId) -> Result<(), TaskError>;

    fn is_done(&self, task_id: TaskId) -> Result<bool, TaskError>;
}
