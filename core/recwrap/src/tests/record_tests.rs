//! RecordUseCase の setup / build / teardown の一気通貫テスト

use crate::cli::Config;
use crate::ports::outbound::{ArtifactStore, BuildEnv, BuildLog, ContentPolicy};
use crate::tests::supervisor_tests::{ChildState, LaunchBehavior, MockLauncher, RecordingSleeper};
use crate::usecase::{ArtifactFinalizer, RecordUseCase};
use common::adapter::{NoopLog, StdClock, StdFileSystem};
use common::error::Error;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct RecordingBuildLog {
    lines: Mutex<Vec<(String, String)>>,
}

impl RecordingBuildLog {
    fn contains(&self, kind: &str, needle: &str) -> bool {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .any(|(k, line)| k == kind && line.contains(needle))
    }
}

impl BuildLog for RecordingBuildLog {
    fn println(&self, line: &str) {
        self.lines
            .lock()
            .unwrap()
            .push(("out".to_string(), line.to_string()));
    }

    fn error(&self, line: &str) {
        self.lines
            .lock()
            .unwrap()
            .push(("err".to_string(), line.to_string()));
    }

    fn hyperlink(&self, url: &str, label: &str) {
        self.lines
            .lock()
            .unwrap()
            .push(("link".to_string(), format!("{}: {}", label, url)));
    }
}

struct FixedBuildEnv {
    workspace: PathBuf,
}

impl BuildEnv for FixedBuildEnv {
    fn macro_map(&self) -> BTreeMap<String, String> {
        let mut m = BTreeMap::new();
        m.insert("JOB_NAME".to_string(), "web".to_string());
        m.insert("BUILD_NUMBER".to_string(), "7".to_string());
        m.insert(
            "WORKSPACE".to_string(),
            self.workspace.to_string_lossy().into_owned(),
        );
        m
    }

    fn workspace_dir(&self) -> PathBuf {
        self.workspace.clone()
    }

    fn build_number(&self) -> String {
        "7".to_string()
    }
}

struct MockProcess {
    exit_code: i32,
    calls: Mutex<Vec<Vec<String>>>,
}

impl MockProcess {
    fn new(exit_code: i32) -> Self {
        Self {
            exit_code,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl common::ports::outbound::Process for MockProcess {
    fn run(&self, program: &Path, args: &[String], _cwd: &Path) -> Result<i32, Error> {
        let mut argv = vec![program.to_string_lossy().into_owned()];
        argv.extend(args.iter().cloned());
        self.calls.lock().unwrap().push(argv);
        Ok(self.exit_code)
    }
}

struct LocalContentPolicy {
    value: Mutex<String>,
}

impl LocalContentPolicy {
    fn new(initial: &str) -> Self {
        Self {
            value: Mutex::new(initial.to_string()),
        }
    }
}

impl ContentPolicy for LocalContentPolicy {
    fn has_media_src(&self) -> bool {
        self.value.lock().unwrap().contains("media-src")
    }

    fn current(&self) -> String {
        self.value.lock().unwrap().clone()
    }

    fn append_media_src(&self) -> Result<String, Error> {
        let mut v = self.value.lock().unwrap();
        if !v.contains("media-src") {
            v.push_str(";media-src 'self';");
        }
        Ok(v.clone())
    }
}

/// 実ファイルでアーカイブするテスト用ストア。報告サイズを上書きできる
struct TestStore {
    root: PathBuf,
    reported_len: Option<u64>,
}

impl ArtifactStore for TestStore {
    fn archive(
        &self,
        workspace_root: &Path,
        logical_name: &str,
        rel_path: &str,
    ) -> Result<(), Error> {
        std::fs::create_dir_all(&self.root).map_err(|e| Error::io_msg(e.to_string()))?;
        std::fs::copy(workspace_root.join(rel_path), self.root.join(logical_name))
            .map_err(|e| Error::io_msg(e.to_string()))?;
        Ok(())
    }

    fn archived_len(&self, logical_name: &str) -> Result<u64, Error> {
        if let Some(len) = self.reported_len {
            return Ok(len);
        }
        std::fs::metadata(self.root.join(logical_name))
            .map(|m| m.len())
            .map_err(|e| Error::io_msg(e.to_string()))
    }

    fn root_dir(&self) -> PathBuf {
        self.root.clone()
    }
}

struct Harness {
    _dir: tempfile::TempDir,
    workspace: PathBuf,
    archive: PathBuf,
    build_log: Arc<RecordingBuildLog>,
    policy: Arc<LocalContentPolicy>,
    process: Arc<MockProcess>,
    use_case: RecordUseCase,
}

fn harness(behavior: LaunchBehavior, build_exit: i32, reported_len: Option<u64>) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let workspace = dir.path().join("ws");
    let archive = dir.path().join("archive");
    std::fs::create_dir_all(&workspace).unwrap();

    let fs = Arc::new(StdFileSystem);
    let logger = Arc::new(NoopLog);
    let build_log = Arc::new(RecordingBuildLog::default());
    let policy = Arc::new(LocalContentPolicy::new("default-src 'self'"));
    let process = Arc::new(MockProcess::new(build_exit));
    let store = Arc::new(TestStore {
        root: archive.clone(),
        reported_len,
    });
    let finalizer = ArtifactFinalizer::new(
        fs.clone(),
        store.clone(),
        build_log.clone(),
        logger.clone(),
        policy.clone(),
    );
    let use_case = RecordUseCase::new(
        fs,
        Arc::new(StdClock),
        process.clone(),
        logger,
        build_log.clone(),
        Arc::new(FixedBuildEnv {
            workspace: workspace.clone(),
        }),
        Arc::new(MockLauncher { behavior }),
        Arc::new(RecordingSleeper::default()),
        store,
        finalizer,
    );
    Harness {
        _dir: dir,
        workspace,
        archive,
        build_log,
        policy,
        process,
        use_case,
    }
}

fn config(build_argv: &[&str]) -> Config {
    Config {
        warmup_ms: 0,
        drain_ms: 0,
        build_argv: build_argv.iter().map(|s| s.to_string()).collect(),
        ..Default::default()
    }
}

fn alive_child() -> Arc<Mutex<ChildState>> {
    Arc::new(Mutex::new(ChildState {
        alive: true,
        ..Default::default()
    }))
}

#[test]
fn test_happy_path_archives_and_deletes_workspace_copy() {
    let state = alive_child();
    let h = harness(LaunchBehavior::Succeed(state), 0, None);
    std::fs::write(h.workspace.join("web_7.mp4"), vec![0u8; 1000]).unwrap();

    let code = h.use_case.run(&config(&["build.sh"])).unwrap();

    assert_eq!(code, 0);
    assert_eq!(
        std::fs::metadata(h.archive.join("web_7.mp4")).unwrap().len(),
        1000
    );
    assert!(!h.workspace.join("web_7.mp4").exists());
    let viewer = std::fs::read_to_string(h.archive.join("web_7.html")).unwrap();
    assert!(viewer.contains("<video"));
    assert!(h.build_log.contains("link", "Video from"));
    assert_eq!(h.process.calls.lock().unwrap().len(), 1);
}

#[test]
fn test_happy_path_widens_content_policy_once() {
    let state = alive_child();
    let h = harness(LaunchBehavior::Succeed(state), 0, None);
    std::fs::write(h.workspace.join("web_7.mp4"), vec![0u8; 10]).unwrap();

    h.use_case.run(&config(&["build.sh"])).unwrap();

    assert!(h.policy.has_media_src());
    assert!(h.build_log.contains("out", "Enabling embedded video"));
    assert!(h.build_log.contains("out", "Old value: default-src 'self'"));
    assert!(h
        .build_log
        .contains("out", "New value: default-src 'self';media-src 'self';"));
}

#[test]
fn test_build_exit_code_is_propagated() {
    let state = alive_child();
    let h = harness(LaunchBehavior::Succeed(state), 3, None);
    std::fs::write(h.workspace.join("web_7.mp4"), vec![0u8; 10]).unwrap();

    let code = h.use_case.run(&config(&["build.sh"])).unwrap();

    assert_eq!(code, 3);
    // ビルドが失敗しても録画はアーカイブされる
    assert!(h.archive.join("web_7.mp4").exists());
}

#[test]
fn test_launch_failure_with_fail_on_error_skips_build() {
    let h = harness(LaunchBehavior::Fail("no display".to_string()), 0, None);

    let result = h.use_case.run(&config(&["build.sh"]));

    assert!(result.is_err());
    assert!(h.build_log.contains("err", "Video recording failed to start"));
    assert_eq!(h.process.calls.lock().unwrap().len(), 0);
}

#[test]
fn test_launch_failure_without_fail_on_error_runs_build() {
    let h = harness(LaunchBehavior::Fail("no display".to_string()), 0, None);
    let mut cfg = config(&["build.sh"]);
    cfg.no_fail_on_error = true;

    let code = h.use_case.run(&cfg).unwrap();

    assert_eq!(code, 0);
    assert_eq!(h.process.calls.lock().unwrap().len(), 1);
    assert!(h
        .build_log
        .contains("out", "video recording failed, try to run"));
    assert!(h.build_log.contains(
        "out",
        "continuing although video recording failed (--no-fail-on-error is set)"
    ));
}

#[test]
fn test_dead_process_fails_build_with_diagnostics() {
    let state = Arc::new(Mutex::new(ChildState {
        alive: false,
        stderr: "x11grab: cannot open display\n".to_string(),
        ..Default::default()
    }));
    let h = harness(LaunchBehavior::Succeed(state), 0, None);

    let code = h.use_case.run(&config(&["build.sh"])).unwrap();

    assert_eq!(code, 1);
    assert!(h
        .build_log
        .contains("err", "Video recording failed: x11grab"));
    assert!(h.build_log.contains(
        "out",
        "failing the build because video recording failed (disable with --no-fail-on-error)"
    ));
    // ビルド自体は実行されている
    assert_eq!(h.process.calls.lock().unwrap().len(), 1);
}

#[test]
fn test_missing_output_file_fails_build_when_fail_on_error() {
    let state = alive_child();
    let h = harness(LaunchBehavior::Succeed(state), 0, None);
    // 出力ファイルを作らない

    let code = h.use_case.run(&config(&["build.sh"])).unwrap();

    assert_eq!(code, 1);
    assert!(h
        .build_log
        .contains("out", "video recording failed, try to run"));
}

#[test]
fn test_size_mismatch_keeps_workspace_copy() {
    let state = alive_child();
    let h = harness(LaunchBehavior::Succeed(state), 0, Some(999));
    std::fs::write(h.workspace.join("web_7.mp4"), vec![0u8; 1000]).unwrap();

    let code = h.use_case.run(&config(&["build.sh"])).unwrap();

    // アーカイブ自体は成立しているのでビルドは成功扱い
    assert_eq!(code, 0);
    assert!(h.workspace.join("web_7.mp4").exists());
    assert!(h.build_log.contains("err", "archive size mismatch"));
    // ビューワーとリンクは出力される
    assert!(h.archive.join("web_7.html").exists());
    assert!(h.build_log.contains("link", "Video from"));
}

#[test]
fn test_build_failure_takes_precedence_over_recording_failure() {
    let state = Arc::new(Mutex::new(ChildState {
        alive: false,
        ..Default::default()
    }));
    let h = harness(LaunchBehavior::Succeed(state), 5, None);

    let code = h.use_case.run(&config(&["build.sh"])).unwrap();

    assert_eq!(code, 5);
}

#[test]
fn test_empty_build_command_is_usage_error() {
    let state = alive_child();
    let h = harness(LaunchBehavior::Succeed(state), 0, None);

    let result = h.use_case.run(&config(&[]));

    assert!(result.is_err());
    assert_eq!(result.unwrap_err().exit_code(), 64);
}
