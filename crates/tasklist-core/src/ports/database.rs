//! Database port - unit of work の取得
//!
//! 外から見える操作 1 回 = Session 1 つ。
//! - `begin()` でストレージハンドルを排他的に取得する（await はここだけ）
//! - Session 内の操作はすべて同期なので、存在確認と変更の間に他の操作が割り込まない
//! - `commit()` しないまま drop された Session はロールバックされる

use async_trait::async_trait;

use super::{CompletionLedger, TaskQuery, TaskStore};
use crate::domain::TaskError;

/// Session is one atomic unit of work over the store.
///
/// The three accessors hand out stateless facades; none of them holds state
/// of its own beyond a borrow of the session.
pub trait Session: Send {
    fn tasks(&mut self) -> Box<dyn TaskStore + '_>;

    fn ledger(&mut self) -> Box<dyn CompletionLedger + '_>;

    fn query(&self) -> Box<dyn TaskQuery + '_>;

    /// Make the effects of this session visible and release the handle.
    fn commit(self: Box<Self>) -> Result<(), TaskError>;
}

/// Database port (interface).
/// InMemory と SQLite の 2 実装がある。
#[async_trait]
pub trait Database: Send + Sync {
    /// Acquire the storage handle for one operation.
    async fn begin(&self) -> Result<Box<dyn Session>, TaskError>;

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}
