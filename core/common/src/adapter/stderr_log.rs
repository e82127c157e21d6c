//! 人間向け stderr ログ実装（verbose 実行用）
//!
//! 既存のロガー（tracing / log）に接続せず、LogRecord を 1 行に整形して stderr に
//! 出力する。ファイルへの JSONL 出力（FileJsonLog）とは別の、その場で読むためのログ。

use crate::error::Error;
use crate::ports::outbound::{Log, LogLevel, LogRecord};

fn level_label(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
    }
}

/// LogRecord を stderr 用の 1 行に整形する
fn format_record(record: &LogRecord) -> String {
    let mut line = format!("[{}] {}", record.ts, level_label(record.level));
    if let (Some(layer), Some(kind)) = (&record.layer, &record.kind) {
        line.push_str(&format!(" {}/{}", layer, kind));
    }
    line.push(' ');
    line.push_str(&record.message);
    if let Some(fields) = &record.fields {
        if let Ok(json) = serde_json::to_string(fields) {
            line.push(' ');
            line.push_str(&json);
        }
    }
    line
}

/// stderr に整形済みの 1 行を出力する Log 実装
#[derive(Debug, Clone, Default)]
pub struct StderrLog;

impl Log for StderrLog {
    fn log(&self, record: &LogRecord) -> Result<(), Error> {
        eprintln!("{}", format_record(record));
        Ok(())
    }
}
