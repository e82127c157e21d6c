//! アダプター（外界の I/O の標準実装）
//!
//! usecase は ports::outbound の trait 経由でのみファイル・時刻・プロセスに触れる。
//! 本番は標準実装（Std*）、テストはモックを注入する。

pub mod file_json_log;
pub mod std_clock;
pub mod std_fs;
pub mod std_process;
pub mod stderr_log;

pub use file_json_log::{FileJsonLog, NoopLog};
pub use std_clock::StdClock;
pub use std_fs::StdFileSystem;
pub use std_process::StdProcess;
pub use stderr_log::StderrLog;
