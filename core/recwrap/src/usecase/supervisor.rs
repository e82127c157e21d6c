//! Process Supervisor（キャプチャプロセスの状態機械）
//!
//! 状態遷移: NotStarted → Running → StoppingRequested → Stopped（終端）。
//! 起動失敗時は NotStarted → FailedToStart（終端）。
//! プロセスハンドルは Supervisor が排他所有し、再利用・再試行はしない。

use crate::domain::CaptureSpec;
use crate::ports::outbound::{CaptureChild, CaptureLauncher, Sleeper};
use common::error::Error;
use common::ports::outbound::{now_iso8601, Log, LogLevel, LogRecord};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// ウォームアップ待ちの既定値（協調する仮想ディスプレイの起動待ち）
pub const DEFAULT_WARMUP_MS: u64 = 3000;

/// graceful stop 後のドレイン待ちの既定値（大きな動画ほどフラッシュに時間がかかる）
pub const DEFAULT_DRAIN_MS: u64 = 1000;

/// Supervisor の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    NotStarted,
    Running,
    StoppingRequested,
    Stopped,
    FailedToStart,
}

/// キャプチャプロセスの Supervisor
///
/// start / request_stop / is_alive / diagnostics を提供する。
/// request_stop は冪等で、"q" の送信は最大 1 回しか行わない。
pub struct Supervisor {
    launcher: Arc<dyn CaptureLauncher>,
    sleeper: Arc<dyn Sleeper>,
    logger: Arc<dyn Log>,
    warmup_ms: u64,
    drain_ms: u64,
    state: SupervisorState,
    child: Option<Box<dyn CaptureChild>>,
}

impl Supervisor {
    pub fn new(
        launcher: Arc<dyn CaptureLauncher>,
        sleeper: Arc<dyn Sleeper>,
        logger: Arc<dyn Log>,
        warmup_ms: u64,
        drain_ms: u64,
    ) -> Self {
        Self {
            launcher,
            sleeper,
            logger,
            warmup_ms,
            drain_ms,
            state: SupervisorState::NotStarted,
            child: None,
        }
    }

    pub fn state(&self) -> SupervisorState {
        self.state
    }

    /// キャプチャプロセスを起動する
    ///
    /// 起動前にウォームアップ時間だけスリープする。これは仮想ディスプレイが
    /// 先に立ち上がるのを待つための既知の近似であり、完了検出ではない。
    pub fn start(&mut self, spec: &CaptureSpec, cwd: &Path) -> Result<(), Error> {
        if self.state != SupervisorState::NotStarted {
            return Err(Error::system("supervisor already started"));
        }
        self.sleeper.sleep_ms(self.warmup_ms);
        match self.launcher.launch(&spec.argv, cwd) {
            Ok(child) => {
                self.log(LogLevel::Info, "capture process started", {
                    let mut m = BTreeMap::new();
                    m.insert("pid".to_string(), serde_json::json!(child.id()));
                    m.insert("command".to_string(), serde_json::json!(spec.display_command));
                    m
                });
                self.child = Some(child);
                self.state = SupervisorState::Running;
                Ok(())
            }
            Err(e) => {
                self.log(LogLevel::Error, "capture process failed to start", {
                    let mut m = BTreeMap::new();
                    m.insert("error".to_string(), serde_json::json!(e.to_string()));
                    m
                });
                self.state = SupervisorState::FailedToStart;
                Err(e)
            }
        }
    }

    /// 非ブロッキングの生存確認
    pub fn is_alive(&mut self) -> bool {
        match self.child.as_mut() {
            Some(child) => child.is_alive(),
            None => false,
        }
    }

    /// graceful stop を要求する（冪等）
    ///
    /// 生存中なら "q" + 改行を stdin へ 1 回だけ書き、flush して閉じる。
    /// その後ドレイン時間だけスリープして Stopped へ遷移する。このスリープは
    /// 出力ファイルのフラッシュ完了の近似であり、厳密な完了検出ではない。
    pub fn request_stop(&mut self) {
        if self.state != SupervisorState::Running {
            return;
        }
        if self.is_alive() {
            self.state = SupervisorState::StoppingRequested;
            if let Some(child) = self.child.as_mut() {
                if let Err(e) = child
                    .write_stdin(b"q\n")
                    .and_then(|_| child.flush_stdin())
                {
                    // 停止要求中にプロセスが死んだ場合など。診断は best-effort
                    let _ = self.logger.log(&LogRecord {
                        ts: now_iso8601(),
                        level: LogLevel::Warn,
                        message: format!("failed to send quit to capture process: {}", e),
                        layer: Some("usecase".to_string()),
                        kind: Some("supervisor".to_string()),
                        fields: None,
                    });
                }
                child.close_stdin();
            }
            self.sleeper.sleep_ms(self.drain_ms);
        }
        self.state = SupervisorState::Stopped;
        self.log(LogLevel::Info, "capture process stopped", BTreeMap::new());
    }

    /// エラー・出力チャネルから失敗診断を組み立てる
    ///
    /// stderr 全文に、stdout が複数行に分かれる場合は末尾 2 行（キャプチャツールが
    /// 最終統計やエラー要約を stdout に出す位置）を追記する。
    /// チャネルの読み取り失敗はログに残して握りつぶす。teardown を止めない。
    pub fn diagnostics(&mut self) -> String {
        let child = match self.child.as_mut() {
            Some(child) => child,
            None => return String::new(),
        };
        let mut report = match child.read_stderr_to_string() {
            Ok(text) => text,
            Err(e) => {
                Self::log_drain_failure(&self.logger, "stderr", &e);
                String::new()
            }
        };
        match child.read_stdout_to_string() {
            Ok(out) => {
                let trimmed = out.trim_end_matches('\n');
                let lines: Vec<&str> = trimmed.split('\n').collect();
                if lines.len() > 1 {
                    report.push_str(lines[lines.len() - 2]);
                    report.push('\n');
                }
                if !trimmed.is_empty() {
                    report.push_str(lines[lines.len() - 1]);
                    report.push('\n');
                }
            }
            Err(e) => Self::log_drain_failure(&self.logger, "stdout", &e),
        }
        report
    }

    fn log_drain_failure(logger: &Arc<dyn Log>, channel: &str, e: &Error) {
        let _ = logger.log(&LogRecord {
            ts: now_iso8601(),
            level: LogLevel::Warn,
            message: format!("failed to drain capture {}: {}", channel, e),
            layer: Some("usecase".to_string()),
            kind: Some("supervisor".to_string()),
            fields: None,
        });
    }

    fn log(&self, level: LogLevel, message: &str, fields: BTreeMap<String, serde_json::Value>) {
        let _ = self.logger.log(&LogRecord {
            ts: now_iso8601(),
            level,
            message: message.to_string(),
            layer: Some("usecase".to_string()),
            kind: Some("supervisor".to_string()),
            fields: if fields.is_empty() { None } else { Some(fields) },
        });
    }
}
