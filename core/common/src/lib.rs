//! recwrap 共通ライブラリ
//!
//! `recwrap` バイナリから使う共通機能（エラー型・Outbound ポート・標準アダプター）を提供します。

/// エラーハンドリング
pub mod error;

/// Outbound ポート定義
pub mod ports;

/// 標準アダプター実装
pub mod adapter;
