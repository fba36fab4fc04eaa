//! In-memory database implementation.
//!
//! 開発・テスト用。SQLite 実装と同じ契約を満たす：
//! - ID は単調増加で再利用しない
//! - 完了マーカーは task_id の集合（重複不可）
//! - Task 削除時にマーカーも消える（ON DELETE CASCADE 相当）
//! - Session はコピーオンライトで、commit しなければ何も残らない

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::{NewTask, Task, TaskError, TaskId, TaskView};
use crate::ports::{CompletionLedger, Database, Session, TaskQuery, TaskStore};

/// Stored columns of a task (the id is the map key).
#[derive(Debug, Clone)]
struct TaskRow {
    title: Option<String>,
    due_date: Option<NaiveDate>,
}

impl TaskRow {
    fn to_task(&self, id: TaskId) -> Task {
        Task {
            id,
            title: self.title.clone(),
            due_date: self.due_date,
        }
    }
}

/// In-memory database state.
#[derive(Debug, Clone)]
struct InMemoryState {
    /// Task rows (single source of truth for tasks), ordered by id.
    tasks: BTreeMap<TaskId, TaskRow>,

    /// Completion markers.
    dones: BTreeSet<TaskId>,

    /// Next task ID to assign. Never goes backwards.
    next_task_id: i64,
}

impl InMemoryState {
    fn new() -> Self {
        Self {
            tasks: BTreeMap::new(),
            dones: BTreeSet::new(),
            next_task_id: 1,
        }
    }

    /// Allocate a new TaskId.
    fn allocate_task_id(&mut self) -> TaskId {
        let id = TaskId::new(self.next_task_id);
        self.next_task_id += 1;
        id
    }
}

/// In-memory database.
pub struct InMemoryDatabase {
    state: Arc<Mutex<InMemoryState>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(InMemoryState::new())),
        }
    }
}

impl Default for InMemoryDatabase {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Database for InMemoryDatabase {
    async fn begin(&self) -> Result<Box<dyn Session>, TaskError> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        Ok(Box::new(InMemorySession {
            guard,
            staged: None,
        }))
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// Session for InMemoryDatabase.
///
/// The guard is held for the whole unit of work. Writes go to `staged`,
/// a copy taken on the first write, and replace the shared state on commit.
struct InMemorySession {
    guard: OwnedMutexGuard<InMemoryState>,
    staged: Option<InMemoryState>,
}

impl InMemorySession {
    fn state(&self) -> &InMemoryState {
        self.staged.as_ref().unwrap_or(&*self.guard)
    }

    fn state_mut(&mut self) -> &mut InMemoryState {
        let committed = &self.guard;
        self.staged.get_or_insert_with(|| (**committed).clone())
    }
}

impl Session for InMemorySession {
    fn tasks(&mut self) -> Box<dyn TaskStore + '_> {
        Box::new(InMemoryTasks {
            state: self.state_mut(),
        })
    }

    fn ledger(&mut self) -> Box<dyn CompletionLedger + '_> {
        Box::new(InMemoryLedger {
            dones: &mut self.state_mut().dones,
        })
    }

    fn query(&self) -> Box<dyn TaskQuery + '_> {
        Box::new(InMemoryQuery {
            state: self.state(),
        })
    }

    fn commit(self: Box<Self>) -> Result<(), TaskError> {
        let InMemorySession { mut guard, staged } = *self;
        if let Some(staged) = staged {
            *guard = staged;
        }
        Ok(())
    }
}

struct InMemoryTasks<'a> {
    state: &'a mut InMemoryState,
}

impl TaskStore for InMemoryTasks<'_> {
    fn create(&mut self, task: NewTask) -> Result<Task, TaskError> {
        let id = self.state.allocate_task_id();
        let row = TaskRow {
            title: task.title,
            due_date: task.due_date,
        };
        let created = row.to_task(id);
        self.state.tasks.insert(id, row);
        Ok(created)
    }

    fn get(&self, id: TaskId) -> Result<Option<Task>, TaskError> {
        Ok(self.state.tasks.get(&id).map(|row| row.to_task(id)))
    }

    fn update(&mut self, id: TaskId, title: Option<String>) -> Result<Task, TaskError> {
        let row = self
            .state
            .tasks
            .get_mut(&id)
            .ok_or(TaskError::TaskNotFound(id))?;
        row.title = title;
        Ok(row.to_task(id))
    }

    fn delete(&mut self, id: TaskId) -> Result<(), TaskError> {
        if self.state.tasks.remove(&id).is_none() {
            return Err(TaskError::TaskNotFound(id));
        }
        // ON DELETE CASCADE
        self.state.dones.remove(&id);
        Ok(())
    }

    fn list(&self) -> Result<Vec<Task>, TaskError> {
        Ok(self
            .state
            .tasks
            .iter()
            .map(|(id, row)| row.to_task(*id))
            .collect())
    }
}

struct InMemoryLedger<'a> {
    dones: &'a mut BTreeSet<TaskId>,
}

impl CompletionLedger for InMemoryLedger<'_> {
    fn mark(&mut self, task_id: TaskId) -> Result<(), TaskError> {
        if !self.dones.insert(task_id) {
            return Err(TaskError::AlreadyDone(task_id));
        }
        Ok(())
    }

    fn unmark(&mut self, task_id: TaskId) -> Result<(), TaskError> {
        if !self.dones.remove(&task_id) {
            return Err(TaskError::NotDone(task_id));
        }
        Ok(())
    }

    fn is_done(&self, task_id: TaskId) -> Result<bool, TaskError> {
        Ok(self.dones.contains(&task_id))
    }
}

struct InMemoryQuery<'a> {
    state: &'a InMemoryState,
}

impl TaskQuery for InMemoryQuery<'_> {
    fn list_with_done(&self) -> Result<Vec<TaskView>, TaskError> {
        Ok(self
            .state
            .tasks
            .iter()
            .map(|(id, row)| TaskView::new(row.to_task(*id), self.state.dones.contains(id)))
            .collect())
    }

    fn get_with_done(&self, id: TaskId) -> Result<Option<TaskView>, TaskError> {
        Ok(self
            .state
            .tasks
            .get(&id)
            .map(|row| TaskView::new(row.to_task(id), self.state.dones.contains(&id))))
    }
}
