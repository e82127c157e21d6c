//! ドメイン型
//!
//! 録画 1 回分のデータモデル。CaptureSpec は setup 時に一度だけ構築し、以後不変。
//! TeardownOutcome が Artifact Finalizer と Policy Gate の両方を駆動する。

pub mod command;
pub mod policy;
pub mod viewer;

use std::path::PathBuf;

pub use command::ResolvedCommand;

/// 解決済みキャプチャ仕様（setup 時に一度だけ構築、以後不変）
#[derive(Debug, Clone)]
pub struct CaptureSpec {
    /// トークン化済みコマンド（最終引数に出力パスを含む）
    pub argv: Vec<String>,
    /// マクロ展開済みのコマンド文字列（出力パスなし。手動再実行の案内に使う）
    pub display_command: String,
    /// 出力ファイルパス（ワークスペース相対の場合あり）
    pub output_path: PathBuf,
    /// 構築時刻（ミリ秒、Unix epoch）
    pub created_at_ms: u64,
}

impl CaptureSpec {
    pub fn new(resolved: ResolvedCommand, created_at_ms: u64) -> Self {
        Self {
            argv: resolved.argv,
            display_command: resolved.display_command,
            output_path: resolved.output_path,
            created_at_ms,
        }
    }

    /// アーカイブ上の論理名（出力パスのファイル名）
    pub fn logical_name(&self) -> String {
        self.output_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "recording.mp4".to_string())
    }

    /// ビューワー HTML のファイル名（論理名の拡張子を html に差し替え）
    pub fn viewer_name(&self) -> String {
        let name = self.logical_name();
        match name.rsplit_once('.') {
            Some((stem, _)) => format!("{}.html", stem),
            None => format!("{}.html", name),
        }
    }
}

/// アーカイブ検証レコード
///
/// 不変条件: `lengths_match()` が真のときだけワークスペースのコピーを削除してよい。
/// 不一致時は両方のコピーを残す（唯一の正常コピーを失わないため）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveRecord {
    pub logical_name: String,
    pub archived_len: u64,
    pub workspace_len: u64,
}

impl ArchiveRecord {
    pub fn lengths_match(&self) -> bool {
        self.archived_len == self.workspace_len
    }
}

/// teardown の結果（全分岐を網羅する tagged variant）
///
/// `ArchivedArtifact` は graceful stop 完了時にワークスペースのコピーが
/// 存在した場合にのみ到達する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeardownOutcome {
    /// graceful stop 後にアーカイブまで完了した
    ArchivedArtifact(ArchiveRecord),
    /// graceful stop はしたが出力ファイルが現れなかった
    NoArtifactProduced,
    /// teardown 時点でプロセスが生きていなかった（即死または起動失敗）
    NeverStarted { diagnostics: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(output: &str) -> CaptureSpec {
        CaptureSpec {
            argv: vec!["ffmpeg".to_string(), output.to_string()],
            display_command: "ffmpeg".to_string(),
            output_path: PathBuf::from(output),
            created_at_ms: 0,
        }
    }

    #[test]
    fn test_logical_name_is_file_name() {
        let s = spec("/ws/job_12.mp4");
        assert_eq!(s.logical_name(), "job_12.mp4");
    }

    #[test]
    fn test_viewer_name_swaps_extension() {
        assert_eq!(spec("/ws/job_12.mp4").viewer_name(), "job_12.html");
        assert_eq!(spec("/ws/noext").viewer_name(), "noext.html");
    }

    #[test]
    fn test_lengths_match() {
        let rec = ArchiveRecord {
            logical_name: "a.mp4".to_string(),
            archived_len: 1000,
            workspace_len: 1000,
        };
        assert!(rec.lengths_match());
        let rec = ArchiveRecord {
            archived_len: 999,
            ..rec
        };
        assert!(!rec.lengths_match());
    }
}
