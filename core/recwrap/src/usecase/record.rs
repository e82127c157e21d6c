//! 録画付きビルド実行（オーケストレーション）
//!
//! setup（コマンド解決・キャプチャ起動）→ ラップ対象コマンドの実行 →
//! teardown（graceful stop・アーカイブ・判定）の順に束ねる。
//! teardown は必ず走り、エラーを返さない。キャプチャの失敗でビルドの
//! 結果を握りつぶさないため、失敗の扱いは最後の Policy Gate に集約する。

use crate::cli::Config;
use crate::domain::{command, policy, CaptureSpec, TeardownOutcome};
use crate::ports::outbound::{ArtifactStore, BuildEnv, BuildLog, CaptureLauncher, Sleeper};
use crate::usecase::finalize::ArtifactFinalizer;
use crate::usecase::supervisor::Supervisor;
use common::error::Error;
use common::ports::outbound::{now_iso8601, Clock, FileSystem, Log, LogLevel, LogRecord, Process};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// 録画付きビルド実行ユースケース
pub struct RecordUseCase {
    fs: Arc<dyn FileSystem>,
    clock: Arc<dyn Clock>,
    process: Arc<dyn Process>,
    logger: Arc<dyn Log>,
    build_log: Arc<dyn BuildLog>,
    build_env: Arc<dyn BuildEnv>,
    launcher: Arc<dyn CaptureLauncher>,
    sleeper: Arc<dyn Sleeper>,
    store: Arc<dyn ArtifactStore>,
    finalizer: ArtifactFinalizer,
}

impl RecordUseCase {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        fs: Arc<dyn FileSystem>,
        clock: Arc<dyn Clock>,
        process: Arc<dyn Process>,
        logger: Arc<dyn Log>,
        build_log: Arc<dyn BuildLog>,
        build_env: Arc<dyn BuildEnv>,
        launcher: Arc<dyn CaptureLauncher>,
        sleeper: Arc<dyn Sleeper>,
        store: Arc<dyn ArtifactStore>,
        finalizer: ArtifactFinalizer,
    ) -> Self {
        Self {
            fs,
            clock,
            process,
            logger,
            build_log,
            build_env,
            launcher,
            sleeper,
            store,
            finalizer,
        }
    }

    /// setup → ビルド実行 → teardown を実行し、プロセス終了コードを返す
    ///
    /// ビルド自体の終了コードが非ゼロならそれを優先する。ビルドが成功していても
    /// Policy Gate が失敗と判定した場合は 1 を返す。
    pub fn run(&self, config: &Config) -> Result<i32, Error> {
        if config.build_argv.is_empty() {
            return Err(Error::invalid_argument(
                "no build command given (expected: recwrap [options] -- <command...>)",
            ));
        }

        let macros = self.build_env.macro_map();
        let workspace = self.build_env.workspace_dir();
        let build_number = self.build_env.build_number();
        let resolved = command::resolve(
            &config.command,
            &config.default_command,
            &config.output_template,
            &macros,
            &build_number,
        );
        let spec = CaptureSpec::new(resolved, self.clock.now_ms());

        let archive_root = self.store.root_dir();
        if let Err(e) = self.fs.create_dir_all(&archive_root) {
            self.build_log
                .error(&format!("Can't create {}: {}", archive_root.display(), e));
        }

        let mut supervisor = Supervisor::new(
            self.launcher.clone(),
            self.sleeper.clone(),
            self.logger.clone(),
            config.warmup_ms,
            config.drain_ms,
        );
        let from_ms = self.clock.now_ms();
        match supervisor.start(&spec, &workspace) {
            Ok(()) => self.finalizer.ensure_media_csp(),
            Err(e) => {
                self.build_log
                    .error(&format!("Video recording failed to start: {}", e));
                if config.fail_on_error() {
                    return Err(e);
                }
            }
        }

        let build_exit = self.run_build(&config.build_argv, &workspace);

        let outcome = self.teardown(&mut supervisor, &spec, &workspace, from_ms);
        let should_fail = policy::build_should_fail(&outcome, config.fail_on_error());
        if !matches!(outcome, TeardownOutcome::ArchivedArtifact(_)) {
            self.build_log.println(&format!(
                "recwrap: video recording failed, try to run '{}' on the command line, in the target system",
                spec.display_command
            ));
            if should_fail {
                self.build_log.println(
                    "recwrap: failing the build because video recording failed (disable with --no-fail-on-error)",
                );
            } else {
                self.build_log.println(
                    "recwrap: continuing although video recording failed (--no-fail-on-error is set)",
                );
            }
        }
        self.log_outcome(&outcome, build_exit, should_fail);

        if build_exit != 0 {
            Ok(build_exit)
        } else if should_fail {
            Ok(1)
        } else {
            Ok(0)
        }
    }

    /// ラップ対象コマンドを実行する。起動失敗もビルドの終了コードに畳み込む
    fn run_build(&self, build_argv: &[String], workspace: &Path) -> i32 {
        let program = PathBuf::from(&build_argv[0]);
        let args = &build_argv[1..];
        match self.process.run(&program, args, workspace) {
            Ok(code) => code,
            Err(e) => {
                self.build_log.error(&e.to_string());
                e.exit_code()
            }
        }
    }

    /// teardown（必ず実行、エラーを返さない）
    ///
    /// プロセスが生きていなければ診断を集めて NeverStarted。生きていれば
    /// graceful stop の後、出力ファイルがあればアーカイブに回す。
    fn teardown(
        &self,
        supervisor: &mut Supervisor,
        spec: &CaptureSpec,
        workspace: &Path,
        from_ms: u64,
    ) -> TeardownOutcome {
        if !supervisor.is_alive() {
            let diagnostics = supervisor.diagnostics();
            self.build_log
                .error(&format!("Video recording failed: {}", diagnostics));
            return TeardownOutcome::NeverStarted { diagnostics };
        }
        supervisor.request_stop();

        let to_ms = self.clock.now_ms();
        let ws_file = self.finalizer.workspace_file(spec, workspace);
        if self.fs.exists(&ws_file) {
            match self.finalizer.finalize(spec, workspace, from_ms, to_ms) {
                Ok(record) => TeardownOutcome::ArchivedArtifact(record),
                Err(e) => {
                    self.build_log
                        .error(&format!("Failed to archive video recording: {}", e));
                    TeardownOutcome::NoArtifactProduced
                }
            }
        } else {
            let diagnostics = supervisor.diagnostics();
            if !diagnostics.is_empty() {
                self.build_log
                    .error(&format!("Video recording failed: {}", diagnostics));
            }
            TeardownOutcome::NoArtifactProduced
        }
    }

    fn log_outcome(&self, outcome: &TeardownOutcome, build_exit: i32, should_fail: bool) {
        let mut fields = BTreeMap::new();
        let label = match outcome {
            TeardownOutcome::ArchivedArtifact(record) => {
                fields.insert(
                    "logical_name".to_string(),
                    serde_json::json!(record.logical_name),
                );
                "archived"
            }
            TeardownOutcome::NoArtifactProduced => "no_artifact",
            TeardownOutcome::NeverStarted { .. } => "never_started",
        };
        fields.insert("outcome".to_string(), serde_json::json!(label));
        fields.insert("build_exit".to_string(), serde_json::json!(build_exit));
        fields.insert("should_fail".to_string(), serde_json::json!(should_fail));
        let _ = self.logger.log(&LogRecord {
            ts: now_iso8601(),
            level: if should_fail {
                LogLevel::Error
            } else {
                LogLevel::Info
            },
            message: "recording teardown finished".to_string(),
            layer: Some("usecase".to_string()),
            kind: Some("record".to_string()),
            fields: Some(fields),
        });
    }
}
