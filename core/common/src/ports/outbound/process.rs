//! サブプロセス実行 Outbound ポート
//!
//! ラップ対象のビルドコマンド実行を trait で抽象化する。
//! キャプチャプロセス（stdin を開いたまま持つ長命プロセス）は別ポート（recwrap 側）で扱う。

use crate::error::Error;
use std::path::Path;

/// サブプロセス実行の抽象
///
/// 実装は `common::adapter::StdProcess`（std::process::Command）など。
pub trait Process: Send + Sync {
    /// プログラムを引数付きで実行し、終了コードを返す。cwd はワークスペース。
    fn run(&self, program: &Path, args: &[String], cwd: &Path) -> Result<i32, Error>;
}
