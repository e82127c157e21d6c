//! アダプター（Outbound ポートの標準実装）
//!
//! usecase は ports::outbound の trait 経由でのみ外界に触れる。
//! 本番はこのモジュールの実装、テストは tests 内のモックを注入する。

pub mod console_build_log;
pub mod fs_artifact_store;
pub mod global_content_policy;
pub mod std_build_env;
pub mod std_capture;
pub mod std_sleeper;

pub use console_build_log::ConsoleBuildLog;
pub use fs_artifact_store::FsArtifactStore;
pub use global_content_policy::GlobalContentPolicy;
pub use std_build_env::StdBuildEnv;
pub use std_capture::StdCaptureLauncher;
pub use std_sleeper::StdSleeper;
