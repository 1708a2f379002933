//! 永続ログの実装
//!
//! ## 概要
//!
//! このモジュールは `MessageLog` trait の具体的な実装を提供します。
//!
//! ## 実装
//!
//! - `inmemory`: インメモリ実装（開発・テスト用）
//! - 将来的に: RDB やドキュメントストアを使った実装

pub mod inmemory;

pub use inmemory::InMemoryMessageLog;
