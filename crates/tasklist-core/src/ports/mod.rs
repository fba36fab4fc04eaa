//! Ports - 抽象化レイヤー
//!
//! Hexagonal Architecture の「ポート」。
//! 実装（`impls`）は InMemory と SQLite。
//!
//! # 設計原則
//! - Task 行は TaskStore、完了マーカーは CompletionLedger が排他的に所有する
//! - 両者を合成するのは TaskQuery だけ
//! - すべての操作は Database が払い出す Session（unit of work）の中で行う

pub mod completion_ledger;
pub mod database;
pub mod task_query;
pub mod task_store;

pub use self::completion_ledger::CompletionLedger;
pub use self::database::{Database, Session};
pub use self::task_query::TaskQuery;
pub use self::task_store::TaskStore;
