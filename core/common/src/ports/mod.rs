//! Ports & Adapters のポート定義
//!
//! - outbound: アプリが外界（FS・時刻・プロセス・ログ）を使うための trait

pub mod outbound;
