//! 配線: 標準アダプタで UseCase を組み立てる

use std::path::PathBuf;
use std::sync::Arc;

use common::adapter::{FileJsonLog, NoopLog, StdClock, StdFileSystem, StdProcess, StderrLog};
use common::ports::outbound::{Clock, FileSystem, Log, Process};

use crate::adapter::{
    ConsoleBuildLog, FsArtifactStore, GlobalContentPolicy, StdBuildEnv, StdCaptureLauncher,
    StdSleeper,
};
use crate::cli::Config;
use crate::domain::command::substitute_macros;
use crate::ports::outbound::{ArtifactStore, BuildEnv, BuildLog, ContentPolicy};
use crate::usecase::{ArtifactFinalizer, RecordUseCase};

/// ホスト規約に沿ったアーカイブディレクトリのテンプレート
const ARCHIVE_DIR_TEMPLATE: &str = "${JENKINS_HOME}/jobs/${JOB_NAME}/builds/${BUILD_NUMBER}/archive";

/// 配線で組み立てたポート群（main の Runner で利用）
pub struct App {
    pub record_use_case: RecordUseCase,
    /// 構造化ログ（ファイルへ JSONL）。main で lifecycle に利用。
    pub logger: Arc<dyn Log>,
}

/// アーカイブディレクトリを解決する
///
/// --archive-dir 指定が最優先。なければホスト規約テンプレートをマクロ展開し、
/// 未解決マクロが残る場合（ホスト外での実行）はワークスペース配下に退避する。
fn resolve_archive_dir(config: &Config, build_env: &dyn BuildEnv) -> PathBuf {
    if let Some(dir) = &config.archive_dir {
        return PathBuf::from(dir);
    }
    let resolved = substitute_macros(ARCHIVE_DIR_TEMPLATE, &build_env.macro_map());
    if resolved.contains("${") {
        build_env.workspace_dir().join(".recwrap").join("archive")
    } else {
        PathBuf::from(resolved)
    }
}

/// 構造化ログの出力先を解決する
///
/// RECWRAP_LOG_FILE があれば JSONL ファイルへ。なければ verbose 時のみ stderr、
/// それ以外は出力しない。
fn resolve_logger(
    log_file: Option<String>,
    verbose: bool,
    fs: &Arc<dyn FileSystem>,
) -> Arc<dyn Log> {
    match log_file.filter(|s| !s.is_empty()) {
        Some(path) => Arc::new(FileJsonLog::new(Arc::clone(fs), path)),
        None if verbose => Arc::new(StderrLog),
        None => Arc::new(NoopLog),
    }
}

/// 配線: 標準アダプタで App を組み立てる
pub fn wire_recwrap(config: &Config) -> App {
    let fs: Arc<dyn FileSystem> = Arc::new(StdFileSystem);
    let logger = resolve_logger(
        std::env::var("RECWRAP_LOG_FILE").ok(),
        config.verbose,
        &fs,
    );
    let clock: Arc<dyn Clock> = Arc::new(StdClock);
    let process: Arc<dyn Process> = Arc::new(StdProcess);
    let build_env: Arc<dyn BuildEnv> = Arc::new(StdBuildEnv);
    let build_log: Arc<dyn BuildLog> = Arc::new(ConsoleBuildLog);
    let content_policy: Arc<dyn ContentPolicy> = Arc::new(GlobalContentPolicy);
    let store: Arc<dyn ArtifactStore> = Arc::new(FsArtifactStore::new(
        Arc::clone(&fs),
        resolve_archive_dir(config, build_env.as_ref()),
    ));
    let finalizer = ArtifactFinalizer::new(
        Arc::clone(&fs),
        Arc::clone(&store),
        Arc::clone(&build_log),
        Arc::clone(&logger),
        Arc::clone(&content_policy),
    );
    let record_use_case = RecordUseCase::new(
        Arc::clone(&fs),
        clock,
        process,
        Arc::clone(&logger),
        build_log,
        build_env,
        Arc::new(StdCaptureLauncher),
        Arc::new(StdSleeper),
        store,
        finalizer,
    );
    App {
        record_use_case,
        logger,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::ports::outbound::{now_iso8601, LogLevel, LogRecord};

    fn record() -> LogRecord {
        LogRecord {
            ts: now_iso8601(),
            level: LogLevel::Info,
            message: "wiring check".to_string(),
            layer: Some("wiring".to_string()),
            kind: Some("lifecycle".to_string()),
            fields: None,
        }
    }

    #[test]
    fn test_resolve_logger_verbose_writes_to_stderr() {
        let fs: Arc<dyn FileSystem> = Arc::new(StdFileSystem);
        let logger = resolve_logger(None, true, &fs);
        assert!(logger.log(&record()).is_ok());
    }

    #[test]
    fn test_resolve_logger_silent_without_file_and_verbose() {
        let fs: Arc<dyn FileSystem> = Arc::new(StdFileSystem);
        let logger = resolve_logger(None, false, &fs);
        assert!(logger.log(&record()).is_ok());
        let logger = resolve_logger(Some(String::new()), false, &fs);
        assert!(logger.log(&record()).is_ok());
    }

    #[test]
    fn test_resolve_logger_prefers_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recwrap.jsonl");
        let fs: Arc<dyn FileSystem> = Arc::new(StdFileSystem);
        let logger = resolve_logger(Some(path.to_string_lossy().into_owned()), true, &fs);
        logger.log(&record()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"wiring check\""));
    }
}
