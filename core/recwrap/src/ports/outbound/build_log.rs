//! ビルドコンソール Outbound ポート
//!
//! オペレーター向けのコンソール出力（進行メッセージ・警告・ハイパーリンク）を抽象化する。
//! 構造化ログ（common::ports::outbound::Log）とは別チャネル。

/// ビルドコンソール抽象（Outbound ポート）
pub trait BuildLog: Send + Sync {
    /// 通常の 1 行を出力する
    fn println(&self, line: &str);

    /// エラー行を出力する
    fn error(&self, line: &str);

    /// クリック可能なリンクを出力する（url はアーカイブ相対）
    fn hyperlink(&self, url: &str, label: &str);
}
