//! TaskQuery port - Task と完了マーカーの合成
//!
//! done は列ではなく別の台帳なので、外から見える `TaskView { .., done }` は
//! left outer join でしか作れない。両方のリレーションを読むのはこの port だけ。

use crate::domain::{TaskError, TaskId, TaskView};

pub trait TaskQuery {
    /// Every task exactly once, ordered by id; `done = false` when no marker exists.
    fn list_with_done(&self) -> Result<Vec<TaskView>, TaskError>;

    /// Single-record variant of the same join.
    fn get_with_done(&self, id: TaskId) -> Result<Option<TaskView>, TaskError>;
}
