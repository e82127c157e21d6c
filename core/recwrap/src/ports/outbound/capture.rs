//! キャプチャプロセス Outbound ポート
//!
//! 長命の外部キャプチャプロセス（stdin を開いたまま保持し、stdout/stderr を捕捉する）の
//! 起動と操作を抽象化する。ハンドルは Supervisor が排他的に所有し、teardown 完了で破棄する。

use common::error::Error;
use std::path::Path;

/// 起動済みキャプチャプロセスのハンドル
///
/// 3 本のストリームの所有権を含む。drop で全ハンドルを解放する（例外経路を含む全経路で）。
pub trait CaptureChild: Send {
    /// OS プロセス ID
    fn id(&self) -> u32;

    /// 非ブロッキングの生存確認（wait せず状態だけ見る）
    fn is_alive(&mut self) -> bool;

    /// stdin へ書き込む（graceful stop の "q" 送信に使う）
    fn write_stdin(&mut self, data: &[u8]) -> Result<(), Error>;

    /// stdin をフラッシュする
    fn flush_stdin(&mut self) -> Result<(), Error>;

    /// stdin を閉じる（以後の write は失敗する）
    fn close_stdin(&mut self);

    /// stdout を最後まで読み切って文字列化する（プロセス停止後にのみ呼ぶこと）
    fn read_stdout_to_string(&mut self) -> Result<String, Error>;

    /// stderr を最後まで読み切って文字列化する（プロセス停止後にのみ呼ぶこと）
    fn read_stderr_to_string(&mut self) -> Result<String, Error>;
}

/// キャプチャプロセスを起動する抽象（Outbound ポート）
///
/// stdin はパイプで開いたまま、stdout/stderr はパイプで捕捉して起動する。
/// cwd はラップ対象のワークスペース。
pub trait CaptureLauncher: Send + Sync {
    fn launch(&self, argv: &[String], cwd: &Path) -> Result<Box<dyn CaptureChild>, Error>;
}
