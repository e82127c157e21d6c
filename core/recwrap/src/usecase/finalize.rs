//! Artifact Finalizer（アーカイブ・検証・ビューワー生成）
//!
//! 前提: Supervisor が Stopped に達し、プロセスの非生存が確認済みであること。
//! アーカイブは 1 回だけ行い、サイズ検証が一致した場合にのみワークスペースの
//! コピーを削除する（不一致時は唯一の正常コピーを守るため両方残す）。

use crate::domain::viewer::viewer_html;
use crate::domain::{ArchiveRecord, CaptureSpec};
use crate::ports::outbound::{ArtifactStore, BuildLog, ContentPolicy};
use common::error::Error;
use common::ports::outbound::{now_iso8601, FileSystem, Log, LogLevel, LogRecord};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// ミリ秒時刻を秒精度の表示文字列にする（ハイパーリンクのラベル用）
pub fn format_ts(ms: u64) -> String {
    chrono::DateTime::<chrono::Utc>::from_timestamp_millis(ms as i64)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// アーティファクトの後始末（アーカイブ・検証・削除・ビューワー・リンク）
pub struct ArtifactFinalizer {
    fs: Arc<dyn FileSystem>,
    store: Arc<dyn ArtifactStore>,
    build_log: Arc<dyn BuildLog>,
    logger: Arc<dyn Log>,
    content_policy: Arc<dyn ContentPolicy>,
}

impl ArtifactFinalizer {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        store: Arc<dyn ArtifactStore>,
        build_log: Arc<dyn BuildLog>,
        logger: Arc<dyn Log>,
        content_policy: Arc<dyn ContentPolicy>,
    ) -> Self {
        Self {
            fs,
            store,
            build_log,
            logger,
            content_policy,
        }
    }

    /// ワークスペース上の出力ファイルの絶対パス
    pub fn workspace_file(&self, spec: &CaptureSpec, workspace_root: &Path) -> PathBuf {
        if spec.output_path.is_absolute() {
            spec.output_path.clone()
        } else {
            workspace_root.join(&spec.output_path)
        }
    }

    /// ホスト全体の CSP に media-src を一度だけ追加する
    ///
    /// 埋め込み動画の再生がホストの既定ポリシーでブロックされないようにする。
    /// check-then-set は非アトミック（widen-only の変更として許容）。
    pub fn ensure_media_csp(&self) {
        if self.content_policy.has_media_src() {
            return;
        }
        let old = self.content_policy.current();
        match self.content_policy.append_media_src() {
            Ok(new) => {
                self.build_log.println(
                    "Enabling embedded video: adding media-src 'self' to the content security policy",
                );
                self.build_log.println(&format!("Old value: {}", old));
                self.build_log.println(&format!("New value: {}", new));
            }
            Err(e) => {
                let _ = self.logger.log(&LogRecord {
                    ts: now_iso8601(),
                    level: LogLevel::Warn,
                    message: format!("failed to extend content security policy: {}", e),
                    layer: Some("usecase".to_string()),
                    kind: Some("archive".to_string()),
                    fields: None,
                });
            }
        }
    }

    /// アーカイブと検証を行い、ビューワーとハイパーリンクを出力する
    ///
    /// ビューワー HTML とハイパーリンクはサイズ検証の結果に関係なく常に出力する。
    pub fn finalize(
        &self,
        spec: &CaptureSpec,
        workspace_root: &Path,
        from_ms: u64,
        to_ms: u64,
    ) -> Result<ArchiveRecord, Error> {
        let logical_name = spec.logical_name();
        let ws_file = self.workspace_file(spec, workspace_root);

        self.store.archive(
            workspace_root,
            &logical_name,
            &spec.output_path.to_string_lossy(),
        )?;
        let workspace_len = self.fs.metadata(&ws_file)?.len();
        let archived_len = self.store.archived_len(&logical_name)?;
        let record = ArchiveRecord {
            logical_name: logical_name.clone(),
            archived_len,
            workspace_len,
        };

        if record.lengths_match() {
            self.fs.remove_file(&ws_file)?;
        } else {
            // 部分アーカイブの疑い。ローカルコピーは消さない
            let e = Error::ArchiveSizeMismatch {
                logical_name: logical_name.clone(),
                archived_len,
                workspace_len,
            };
            self.build_log.error(&e.to_string());
            let _ = self.logger.log(&LogRecord {
                ts: now_iso8601(),
                level: LogLevel::Error,
                message: e.to_string(),
                layer: Some("usecase".to_string()),
                kind: Some("archive".to_string()),
                fields: None,
            });
        }

        let viewer_name = spec.viewer_name();
        let html = viewer_html(&logical_name, &logical_name);
        self.fs
            .write(&self.store.root_dir().join(&viewer_name), &html)?;
        self.build_log.hyperlink(
            &format!("artifact/{}", viewer_name),
            &format!("Video from {} to {}", format_ts(from_ms), format_ts(to_ms)),
        );

        let _ = self.logger.log(&LogRecord {
            ts: now_iso8601(),
            level: LogLevel::Info,
            message: "recording archived".to_string(),
            layer: Some("usecase".to_string()),
            kind: Some("archive".to_string()),
            fields: {
                let mut m = std::collections::BTreeMap::new();
                m.insert("logical_name".to_string(), serde_json::json!(logical_name));
                m.insert("archived_len".to_string(), serde_json::json!(archived_len));
                m.insert("workspace_len".to_string(), serde_json::json!(workspace_len));
                Some(m)
            },
        });
        Ok(record)
    }
}
