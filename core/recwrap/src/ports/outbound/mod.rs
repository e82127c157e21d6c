//! Outbound ポート: アプリが外界を使うための trait
//!
//! 周辺コラボレーター（環境解決・アーティファクトストア・ビルドコンソール）へは
//! 必ずこの trait 群を経由する。

pub mod artifact_store;
pub mod build_env;
pub mod build_log;
pub mod capture;
pub mod content_policy;
pub mod sleeper;

pub use artifact_store::ArtifactStore;
pub use build_env::BuildEnv;
pub use build_log::BuildLog;
pub use capture::{CaptureChild, CaptureLauncher};
pub use content_policy::ContentPolicy;
pub use sleeper::Sleeper;
