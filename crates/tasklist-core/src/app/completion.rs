//! CompletionService - 完了状態の遷移
//!
//! 状態は保存しない。マーカーの有無から `CompletionState` を導き、
//! 遷移規則を適用してから台帳を書き換える（同じ Session の中で）。
//!
//! 冪等ではない：done 済みへの mark_done、not done への unmark_done はどちらも拒否される。

use std::sync::Arc;

use crate::domain::{CompletionState, TaskError, TaskId};
use crate::ports::{Database, Session};

pub struct CompletionService {
    db: Arc<dyn Database>,
}

fn log_rejection(err: &TaskError) {
    match err {
        TaskError::Storage(source) => {
            tracing::error!(error = %source, "completion transition failed")
        }
        other => tracing::warn!(error = %other, "completion transition rejected"),
    }
}

fn apply_mark(session: &mut dyn Session, task_id: TaskId) -> Result<CompletionState, TaskError> {
    let view = session
        .query()
        .get_with_done(task_id)?
        .ok_or(TaskError::TaskNotFound(task_id))?;
    let next = CompletionState::from_marker(view.done).mark_done(task_id)?;
    session.ledger().mark(task_id)?;
    Ok(next)
}

fn apply_unmark(session: &mut dyn Session, task_id: TaskId) -> Result<CompletionState, TaskError> {
    let current = CompletionState::from_marker(session.ledger().is_done(task_id)?);
    let next = current.unmark_done(task_id)?;
    session.ledger().unmark(task_id)?;
    Ok(next)
}

impl CompletionService {
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }

    /// NotDone -> Done.
    ///
    /// - task がなければ `TaskNotFound`
    /// - すでに Done なら `AlreadyDone`（状態は変わらない）
    #[tracing::instrument(skip(self), fields(backend = self.db.backend()))]
    pub async fn mark_done(&self, task_id: TaskId) -> Result<CompletionState, TaskError> {
        let mut session = self.db.begin().await?;
        let next = apply_mark(session.as_mut(), task_id).inspect_err(log_rejection)?;
        session.commit()?;
        tracing::info!("task marked done");
        Ok(next)
    }

    /// Done -> NotDone.
    ///
    /// マーカーがなければ（タスク自体がなくても）`NotDone`。
    /// 境界では「完了リソースが見つからない」として扱われる。
    #[tracing::instrument(skip(self), fields(backend = self.db.backend()))]
    pub async fn unmark_done(&self, task_id: TaskId) -> Result<CompletionState, TaskError> {
        let mut session = self.db.begin().await?;
        let next = apply_unmark(session.as_mut(), task_id).inspect_err(log_rejection)?;
        session.commit()?;
        tracing::info!("task unmarked");
        Ok(next)
    }

    /// Current state of an existing task.
    pub async fn state(&self, task_id: TaskId) -> Result<CompletionState, TaskError> {
        let session = self.db.begin().await?;
        let view = session
            .query()
            .get_with_done(task_id)?
            .ok_or(TaskError::TaskNotFound(task_id))?;
        Ok(CompletionState::from_marker(view.done))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Backend;
    use crate::domain::NewTask;
    use rstest::rstest;

    async fn setup(backend: Backend) -> (Arc<dyn Database>, CompletionService, TaskId) {
        let db = backend.open(None).unwrap();
        let mut session = db.begin().await.unwrap();
        let task = session.tasks().create(NewTask::titled("buy milk")).unwrap();
        session.commit().unwrap();
        let service = CompletionService::new(Arc::clone(&db));
        (db, service, task.id)
    }

    #[rstest]
    #[case::memory(Backend::Memory)]
    #[case::sqlite(Backend::Sqlite)]
    #[tokio::test]
    async fn mark_twice_is_rejected(#[case] backend: Backend) {
        let (_db, service, id) = setup(backend).await;

        assert_eq!(service.mark_done(id).await.unwrap(), CompletionState::Done);
        assert!(matches!(
            service.mark_done(id).await,
            Err(TaskError::AlreadyDone(got)) if got == id
        ));
        assert_eq!(service.state(id).await.unwrap(), CompletionState::Done);
    }

    #[rstest]
    #[case::memory(Backend::Memory)]
    #[case::sqlite(Backend::Sqlite)]
    #[tokio::test]
    async fn unmark_never_marked_is_not_done(#[case] backend: Backend) {
        let (_db, service, id) = setup(backend).await;

        assert!(matches!(
            service.unmark_done(id).await,
            Err(TaskError::NotDone(got)) if got == id
        ));
        assert_eq!(service.state(id).await.unwrap(), CompletionState::NotDone);
    }

    #[rstest]
    #[case::memory(Backend::Memory)]
    #[case::sqlite(Backend::Sqlite)]
    #[tokio::test]
    async fn mark_unmark_round_trip(#[case] backend: Backend) {
        let (_db, service, id) = setup(backend).await;

        service.mark_done(id).await.unwrap();
        assert_eq!(
            service.unmark_done(id).await.unwrap(),
            CompletionState::NotDone
        );
        assert!(matches!(
            service.unmark_done(id).await,
            Err(TaskError::NotDone(_))
        ));

        // reversible: can be marked again
        service.mark_done(id).await.unwrap();
        assert_eq!(service.state(id).await.unwrap(), CompletionState::Done);
    }

    #[rstest]
    #[case::memory(Backend::Memory)]
    #[case::sqlite(Backend::Sqlite)]
    #[tokio::test]
    async fn missing_task(#[case] backend: Backend) {
        let (_db, service, id) = setup(backend).await;
        let missing = TaskId::new(id.get() + 100);

        assert!(matches!(
            service.mark_done(missing).await,
            Err(TaskError::TaskNotFound(got)) if got == missing
        ));
        // unmark only looks at the completion resource
        assert!(matches!(
            service.unmark_done(missing).await,
            Err(TaskError::NotDone(got)) if got == missing
        ));
        assert!(matches!(
            service.state(missing).await,
            Err(TaskError::TaskNotFound(_))
        ));
    }

    #[rstest]
    #[case::memory(Backend::Memory)]
    #[case::sqlite(Backend::Sqlite)]
    #[tokio::test]
    async fn rejection_leaves_ledger_unchanged(#[case] backend: Backend) {
        let (db, service, id) = setup(backend).await;
        service.mark_done(id).await.unwrap();
        let _ = service.mark_done(id).await;

        let mut session = db.begin().await.unwrap();
        assert!(session.ledger().is_done(id).unwrap());
        assert_eq!(session.query().list_with_done().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn concurrent_marks_admit_exactly_one() {
        let db = Backend::Memory.open(None).unwrap();
        let mut session = db.begin().await.unwrap();
        let id = session.tasks().create(NewTask::titled("race")).unwrap().id;
        session.commit().unwrap();
        let service = Arc::new(CompletionService::new(db));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move { service.mark_done(id).await }));
        }

        let mut ok = 0;
        let mut already = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => ok += 1,
                Err(TaskError::AlreadyDone(_)) => already += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!((ok, already), (1, 7));
    }
}
