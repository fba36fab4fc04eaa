//! API - 境界層
//!
//! ルーティングそのものは持たない。transport 側はここの関数を呼び、
//! `ApiError { status, detail }` をそのままレスポンスにすればよい。
//!
//! - **schema**: リクエスト・レスポンスの型（日付の厳密な検証はここ）
//! - **error**: TaskError / RequestError → ApiError
//! - **handlers**: 操作表（TaskApi）

pub mod error;
pub mod handlers;
pub mod schema;

pub use self::error::ApiError;
pub use self::handlers::{ApiResult, TaskApi};
pub use self::schema::{RequestError, TaskCreate, TaskCreateResponse, TaskResponse};
