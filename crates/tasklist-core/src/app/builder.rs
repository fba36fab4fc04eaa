//! AppBuilder - アプリケーションの構築とワイヤリング
//!
//! Database を 1 つ受け取り、両サービスに同じハンドルを配る。
//! Database が渡されていなければ build() で失敗する（Fail-fast）。

use std::sync::Arc;

use super::{CompletionService, TaskMutationService};
use crate::config::Config;
use crate::domain::TaskError;
use crate::ports::Database;

/// AppBuilder はアプリケーションを構築
///
/// # 使用例
/// ```ignore
/// let app = AppBuilder::new()
///     .database(Arc::new(InMemoryDatabase::new()))
///     .build()?;
/// app.tasks.create(NewTask::titled("buy milk")).await?;
/// ```
#[derive(Default)]
pub struct AppBuilder {
    database: Option<Arc<dyn Database>>,
}

/// BuildError はアプリケーション構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("no database configured")]
    MissingDatabase,

    #[error("failed to open database: {0}")]
    Open(#[from] TaskError),
}

impl AppBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn database(mut self, database: Arc<dyn Database>) -> Self {
        self.database = Some(database);
        self
    }

    /// Open the database described by `config`.
    pub fn config(self, config: &Config) -> Result<Self, BuildError> {
        let database = config.open_database()?;
        Ok(self.database(database))
    }

    pub fn build(self) -> Result<App, BuildError> {
        let database = self.database.ok_or(BuildError::MissingDatabase)?;
        tracing::debug!(backend = database.backend(), "app built");
        Ok(App {
            tasks: TaskMutationService::new(Arc::clone(&database)),
            completion: CompletionService::new(database),
        })
    }
}

/// App はサービスの束
pub struct App {
    pub tasks: TaskMutationService,
    pub completion: CompletionService,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewTask;
    use crate::impls::InMemoryDatabase;

    #[test]
    fn test_build_without_database() {
        let app = AppBuilder::new().build();
        assert!(matches!(app, Err(BuildError::MissingDatabase)));
    }

    #[tokio::test]
    async fn test_services_share_database() {
        let app = AppBuilder::new()
            .database(Arc::new(InMemoryDatabase::new()))
            .build()
            .unwrap();

        let task = app.tasks.create(NewTask::titled("shared")).await.unwrap();
        app.completion.mark_done(task.id).await.unwrap();
        assert!(app.tasks.get(task.id).await.unwrap().done);
    }

    #[tokio::test]
    async fn test_build_from_config() {
        let app = AppBuilder::new()
            .config(&Config::default())
            .unwrap()
            .build()
            .unwrap();
        assert!(app.tasks.list_all().await.unwrap().is_empty());
    }
}
