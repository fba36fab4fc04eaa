//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **InMemoryDatabase**: 開発用・テスト用（プロセス内のみ）
//! - **SqliteDatabase**: 本番用（ファイル、またはインメモリ SQLite）

pub mod memory;
pub mod sqlite;

pub use self::memory::InMemoryDatabase;
pub use self::sqlite::SqliteDatabase;
