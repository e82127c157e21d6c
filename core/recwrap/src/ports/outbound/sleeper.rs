//! スリープ Outbound ポート
//!
//! ウォームアップ待ち（仮想ディスプレイの起動待ち）とドレイン待ち（出力ファイルの
//! フラッシュ待ち）は呼び出しスレッド上のブロッキングスリープ。テストでは Noop を注入する。

/// ブロッキングスリープの抽象（Outbound ポート）
pub trait Sleeper: Send + Sync {
    fn sleep_ms(&self, ms: u64);
}
