//! ビルド環境解決 Outbound ポート
//!
//! ジョブ名・ビルド番号・ワークスペース等のマクロ値は外部（ホスト）が供給する。
//! usecase はこの trait 経由でのみ環境変数にアクセスする。

use std::collections::BTreeMap;
use std::path::PathBuf;

/// マクロ置換に使うキー（存在するものだけ macro_map に入る）
pub const MACRO_KEYS: &[&str] = &["JOB_NAME", "BUILD_NUMBER", "WORKSPACE", "JENKINS_HOME"];

/// ビルド環境解決の抽象（Outbound ポート）
///
/// 実装は `adapter::StdBuildEnv`（std::env を委譲）やテスト用の固定マップなど。
pub trait BuildEnv: Send + Sync {
    /// マクロ置換用のキー・値マップ（未設定のキーは含まない）
    fn macro_map(&self) -> BTreeMap<String, String>;

    /// ワークスペースディレクトリ（WORKSPACE、未設定ならカレントディレクトリ）
    fn workspace_dir(&self) -> PathBuf;

    /// ビルド番号（BUILD_NUMBER、未設定なら "0"）
    fn build_number(&self) -> String;
}
