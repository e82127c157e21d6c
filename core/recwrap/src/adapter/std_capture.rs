//! 標準キャプチャプロセス実装（std::process::Command を委譲）
//!
//! stdin はパイプで開いたまま保持し、stdout/stderr はパイプで捕捉する。
//! drop 時に try_wait で終了済みプロセスを回収する（wait はしない）。

use crate::ports::outbound::{CaptureChild, CaptureLauncher};
use common::error::Error;
use std::io::{Read, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, Command, Stdio};

/// 標準ライブラリの Command でキャプチャプロセスを起動する実装
#[derive(Debug, Clone, Default)]
pub struct StdCaptureLauncher;

impl CaptureLauncher for StdCaptureLauncher {
    fn launch(&self, argv: &[String], cwd: &Path) -> Result<Box<dyn CaptureChild>, Error> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| Error::launch("capture command is empty"))?;
        let mut child = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::launch(format!("Failed to start '{}': {}", program, e)))?;
        let stdin = child.stdin.take();
        Ok(Box::new(StdCaptureChild { child, stdin }))
    }
}

/// 起動済みキャプチャプロセスのハンドル（Supervisor が排他所有する）
struct StdCaptureChild {
    child: Child,
    stdin: Option<ChildStdin>,
}

impl CaptureChild for StdCaptureChild {
    fn id(&self) -> u32 {
        self.child.id()
    }

    fn is_alive(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    fn write_stdin(&mut self, data: &[u8]) -> Result<(), Error> {
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| Error::io_msg("capture stdin is already closed"))?;
        stdin
            .write_all(data)
            .map_err(|e| Error::io_msg(format!("Failed to write to capture stdin: {}", e)))
    }

    fn flush_stdin(&mut self) -> Result<(), Error> {
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| Error::io_msg("capture stdin is already closed"))?;
        stdin
            .flush()
            .map_err(|e| Error::io_msg(format!("Failed to flush capture stdin: {}", e)))
    }

    fn close_stdin(&mut self) {
        // drop でパイプの書き込み側が閉じる
        self.stdin.take();
    }

    fn read_stdout_to_string(&mut self) -> Result<String, Error> {
        let mut out = self
            .child
            .stdout
            .take()
            .ok_or_else(|| Error::io_msg("capture stdout is already drained"))?;
        let mut buf = String::new();
        out.read_to_string(&mut buf)
            .map_err(|e| Error::io_msg(format!("Failed to read capture stdout: {}", e)))?;
        Ok(buf)
    }

    fn read_stderr_to_string(&mut self) -> Result<String, Error> {
        let mut err = self
            .child
            .stderr
            .take()
            .ok_or_else(|| Error::io_msg("capture stderr is already drained"))?;
        let mut buf = String::new();
        err.read_to_string(&mut buf)
            .map_err(|e| Error::io_msg(format!("Failed to read capture stderr: {}", e)))?;
        Ok(buf)
    }
}

impl Drop for StdCaptureChild {
    fn drop(&mut self) {
        self.stdin.take();
        // 終了済みならゾンビを回収する。生きているプロセスは殺さない
        // （graceful stop の後始末は Supervisor の責務）。
        let _ = self.child.try_wait();
    }
}
