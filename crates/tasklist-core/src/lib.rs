//! tasklist-core
//!
//! Core building blocks for the tasklist backend.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, task, due_date, state, errors）
//! - **ports**: 抽象化レイヤー（TaskStore, CompletionLedger, TaskQuery, Database/Session）
//! - **impls**: 実装（InMemoryDatabase, SqliteDatabase）
//! - **app**: ユースケース（TaskMutationService, CompletionService, AppBuilder）
//! - **api**: 境界層（リクエスト検証、ステータスへの変換、操作表）
//! - **config**: 環境変数からの設定
//! - **observability**: ログ初期化、状態別カウント
//!
//! 完了状態は Task の列ではなく別の台帳（done マーカーの集合）で表し、
//! 一覧は left outer join で `done` を導く。

pub mod api;
pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod observability;
pub mod ports;
