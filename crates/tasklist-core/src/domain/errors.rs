//! Errors - エラー型と分類
//!
//! コアは型付きのエラーを返すだけで、リトライはしない（すべてローカルな状態チェック）。
//! 失敗した操作は以前の状態を変更しない。
//! transport のステータスへの変換は境界（`api`）の責務。

use super::TaskId;

/// Boxed source for storage-layer faults.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// ErrorKind はエラーの運用上の分類
///
/// # 分類
/// - NotFound: 参照先が存在しない（タスク、または完了マーカー）
/// - BadRequest: リソースは存在するが現在の状態では不正な操作
/// - Unprocessable: 入力の形式・範囲が不正（境界で弾く）
/// - Infrastructure: ストレージの障害
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    BadRequest,
    Unprocessable,
    Infrastructure,
}

impl ErrorKind {
    /// HTTP 相当のステータスコード
    pub fn status_code(self) -> u16 {
        match self {
            ErrorKind::NotFound => 404,
            ErrorKind::BadRequest => 400,
            ErrorKind::Unprocessable => 422,
            ErrorKind::Infrastructure => 500,
        }
    }
}

/// TaskError はコアのドメインエラー
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("task {0} not found")]
    TaskNotFound(TaskId),

    #[error("task {0} is already done")]
    AlreadyDone(TaskId),

    /// 完了マーカーそのものが存在しない（タスクの有無は問わない）
    #[error("task {0} is not done")]
    NotDone(TaskId),

    #[error("storage failure: {0}")]
    Storage(#[source] BoxError),
}

impl TaskError {
    pub fn storage(err: impl Into<BoxError>) -> Self {
        TaskError::Storage(err.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            TaskError::TaskNotFound(_) | TaskError::NotDone(_) => ErrorKind::NotFound,
            TaskError::AlreadyDone(_) => ErrorKind::BadRequest,
            TaskError::Storage(_) => ErrorKind::Infrastructure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::task_not_found(TaskError::TaskNotFound(TaskId::new(1)), ErrorKind::NotFound, 404)]
    #[case::already_done(TaskError::AlreadyDone(TaskId::new(1)), ErrorKind::BadRequest, 400)]
    #[case::not_done(TaskError::NotDone(TaskId::new(1)), ErrorKind::NotFound, 404)]
    #[case::storage(TaskError::storage("disk gone"), ErrorKind::Infrastructure, 500)]
    fn errors_are_classified(
        #[case] err: TaskError,
        #[case] kind: ErrorKind,
        #[case] status: u16,
    ) {
        assert_eq!(err.kind(), kind);
        assert_eq!(err.kind().status_code(), status);
    }

    #[test]
    fn storage_error_keeps_source() {
        let err = TaskError::storage("disk gone");
        assert_eq!(err.to_string(), "storage failure: disk gone");
        assert!(std::error::Error::source(&err).is_some());
    }
}
