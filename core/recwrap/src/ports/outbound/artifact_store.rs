//! アーティファクトストア Outbound ポート
//!
//! ビルドの恒久アーカイブへの保存と、検証用のサイズ問い合わせを抽象化する。

use common::error::Error;
use std::path::{Path, PathBuf};

/// アーティファクトストア抽象（Outbound ポート）
///
/// 実装は `adapter::FsArtifactStore`（アーカイブディレクトリへのコピー）やテスト用のメモリ実装など。
pub trait ArtifactStore: Send + Sync {
    /// ワークスペース相対パス rel_path のファイルを論理名 logical_name でアーカイブする
    fn archive(
        &self,
        workspace_root: &Path,
        logical_name: &str,
        rel_path: &str,
    ) -> Result<(), Error>;

    /// アーカイブ済みファイルのバイト長（サイズ検証に使う）
    fn archived_len(&self, logical_name: &str) -> Result<u64, Error>;

    /// アーカイブのルートディレクトリ（ビューワー HTML の設置先）
    fn root_dir(&self) -> PathBuf;
}
