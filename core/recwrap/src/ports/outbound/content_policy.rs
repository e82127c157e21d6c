//! コンテンツセキュリティポリシー Outbound ポート
//!
//! ホスト全体の CSP 設定に `media-src 'self'` を一度だけ追加するための抽象。
//! 埋め込み動画がホストの既定ポリシーでブロックされないようにする。
//! check-then-set は非アトミック（同一ホスト上の無関係な録画とは競合し得るが、
//! 冪等な widen-only の変更として許容する）。

use common::error::Error;

/// CSP 拡張サービスの抽象（Outbound ポート）
pub trait ContentPolicy: Send + Sync {
    /// 現在のポリシーが media-src を既に含むか
    fn has_media_src(&self) -> bool;

    /// 現在のポリシー文字列
    fn current(&self) -> String;

    /// `media-src 'self';` を追記し、新しいポリシー文字列を返す
    fn append_media_src(&self) -> Result<String, Error>;
}
