//! Outbound ポート: アプリが外界（FS・時刻・プロセス・ログ）を使うための trait

pub mod clock;
pub mod fs;
pub mod log;
pub mod process;

pub use clock::Clock;
pub use fs::{FileMetadata, FileSystem};
pub use log::{now_iso8601, Log, LogLevel, LogRecord};
pub use process::Process;
