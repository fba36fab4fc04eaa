//! App - アプリケーション層
//!
//! ports を組み合わせてユースケースを実装します。
//!
//! # 主要コンポーネント
//! - **AppBuilder**: Database のワイヤリング
//! - **TaskMutationService**: 作成・更新・削除・一覧
//! - **CompletionService**: done / undone の状態遷移

pub mod builder;
pub mod completion;
pub mod mutation;

pub use self::builder::{App, AppBuilder, BuildError};
pub use self::completion::CompletionService;
pub use self::mutation::TaskMutationService;
