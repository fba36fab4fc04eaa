//! ApiError - コアのエラーを transport のステータスへ変換

use serde::{Deserialize, Serialize};

use super::schema::RequestError;
use crate::domain::TaskError;

/// Transport-level error: status code plus a client-safe detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{status} {detail}")]
pub struct ApiError {
    pub status: u16,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: u16, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }
}

impl From<TaskError> for ApiError {
    fn from(err: TaskError) -> Self {
        let status = err.kind().status_code();
        match err {
            TaskError::TaskNotFound(_) => Self::new(status, "Task not found"),
            TaskError::AlreadyDone(_) => Self::new(status, "Done already exists"),
            // 完了マーカーを「削除対象のリソース」とみなす
            TaskError::NotDone(_) => Self::new(status, "Done not found"),
            TaskError::Storage(source) => {
                tracing::error!(error = %source, "storage failure");
                Self::new(status, "Internal server error")
            }
        }
    }
}

impl From<RequestError> for ApiError {
    fn from(err: RequestError) -> Self {
        Self::new(err.kind().status_code(), err.to_string())
    }
}
